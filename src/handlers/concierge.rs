use crate::{
    error::ApiError,
    models::{ConciergeReply, ErrorResponse, RecommendationRequest},
    services::ConciergeService,
};
use actix_web::{
    web::{self, Json},
    HttpResponse,
};
use log::{error, info};

pub fn concierge_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/concierge")
            .app_data(json_config())
            .route(web::post().to(get_concierge_recommendations)),
    );
}

/// Report undecodable bodies with the same JSON error shape as other 400s
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into())
}

/// Ask the book concierge for recommendations
#[utoipa::path(
    post,
    path = "/api/concierge",
    tag = "Concierge",
    request_body = RecommendationRequest,
    responses(
        (status = 200, description = "Recommendations, or null when none could be produced", body = ConciergeReply),
        (status = 400, description = "Blank preference", body = ErrorResponse),
    ),
    summary = "Get book recommendations from the concierge",
    description = "Forwards the preference to a generative model and returns three validated book suggestions. A null `recommendations` field means the request should simply be retried."
)]
pub async fn get_concierge_recommendations(
    request: Json<RecommendationRequest>,
    concierge: web::Data<ConciergeService>,
) -> Result<HttpResponse, ApiError> {
    let preference = request.into_inner().preference;

    if preference.trim().is_empty() {
        return Err(ApiError::InvalidInput(
            "Preference cannot be empty".to_string(),
        ));
    }

    // Spawned so a client disconnect does not abort the upstream call.
    let task = actix_web::rt::spawn(async move {
        concierge.get_book_recommendations(&preference).await
    });

    let recommendations = match task.await {
        Ok(result) => result,
        Err(e) => {
            error!("Concierge task failed to complete: {}", e);
            None
        }
    };

    info!(
        "Concierge request finished with {}",
        if recommendations.is_some() {
            "recommendations"
        } else {
            "no result"
        }
    );

    Ok(HttpResponse::Ok().json(ConciergeReply { recommendations }))
}
