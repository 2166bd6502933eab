use actix_web::{http::StatusCode, test, web, App};
use httpmock::prelude::*;
use lotus_ink_api::{
    config::{GeminiSettings, StaticCredentials},
    models::{ConciergeReply, HealthResponse},
    routes::{api_routes, openapi_route},
    services::ConciergeService,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn concierge(base_url: String, credentials: StaticCredentials) -> web::Data<ConciergeService> {
    let settings = GeminiSettings {
        base_url,
        model: "gemini-test".to_string(),
        timeout_secs: 5,
        credential_env: "LOTUS_INK_UNUSED".to_string(),
    };
    web::Data::new(ConciergeService::new(settings, Arc::new(credentials)).unwrap())
}

#[actix_web::test]
async fn health_check_reports_ok() {
    let app = test::init_service(
        App::new()
            .app_data(concierge(
                "http://127.0.0.1:1".to_string(),
                StaticCredentials::missing(),
            ))
            .service(api_routes()),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: HealthResponse = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body.status, "ok");
    assert!(!body.timestamp.is_empty());
}

#[actix_web::test]
async fn blank_preference_is_rejected() {
    let app = test::init_service(
        App::new()
            .app_data(concierge(
                "http://127.0.0.1:1".to_string(),
                StaticCredentials::new("test-key"),
            ))
            .service(api_routes()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/concierge")
        .set_json(json!({ "preference": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid input: Preference cannot be empty");
}

#[actix_web::test]
async fn undecodable_body_gets_json_error() {
    let app = test::init_service(
        App::new()
            .app_data(concierge(
                "http://127.0.0.1:1".to_string(),
                StaticCredentials::new("test-key"),
            ))
            .service(api_routes()),
    )
    .await;

    let missing_field = test::TestRequest::post()
        .uri("/api/concierge")
        .set_json(json!({ "query": "poetry" }))
        .to_request();
    let not_json = test::TestRequest::post()
        .uri("/api/concierge")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{ preference:")
        .to_request();

    for req in [missing_field, not_json] {
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        let error = body["error"].as_str().expect("error message");
        assert!(error.starts_with("Invalid input:"), "got {:?}", error);
    }
}

#[actix_web::test]
async fn concierge_returns_recommendations() {
    let server = MockServer::start_async().await;
    let payload = json!({
        "intro": "From our shelves in Little Tokyo",
        "books": [
            {"title": "Pachinko", "author": "Min Jin Lee", "reason": "A sweeping family saga"}
        ]
    })
    .to_string();
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent")
                .body_contains("family saga");
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": payload}]}}]
            }));
        })
        .await;

    let app = test::init_service(
        App::new()
            .app_data(concierge(server.base_url(), StaticCredentials::new("test-key")))
            .service(api_routes()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/concierge")
        .set_json(json!({ "preference": "a family saga" }))
        .to_request();
    let reply: ConciergeReply = test::call_and_read_body_json(&app, req).await;

    let recommendations = reply.recommendations.expect("recommendations");
    assert_eq!(recommendations.intro, "From our shelves in Little Tokyo");
    assert_eq!(recommendations.books[0].author, "Min Jin Lee");
}

#[actix_web::test]
async fn concierge_failure_is_null_result() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent");
            then.status(500).body("upstream exploded");
        })
        .await;

    let app = test::init_service(
        App::new()
            .app_data(concierge(server.base_url(), StaticCredentials::new("test-key")))
            .service(api_routes()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/concierge")
        .set_json(json!({ "preference": "anything" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "recommendations": null }));
}

#[actix_web::test]
async fn openapi_document_lists_concierge() {
    let app = test::init_service(App::new().service(openapi_route())).await;

    let req = test::TestRequest::get()
        .uri("/api-docs/openapi.json")
        .to_request();
    let doc: Value = test::call_and_read_body_json(&app, req).await;

    assert!(doc["paths"]["/api/concierge"]["post"].is_object());
    assert!(doc["paths"]["/api/health"]["get"].is_object());
}
