use crate::{
    config::{Config, EnvCredentials},
    error::Result,
    handlers,
    models::{
        BookSuggestion, ConciergeReply, ErrorResponse, HealthResponse, RecommendationRequest,
        RecommendationResponse,
    },
    routes::{api_routes, openapi_route},
    services::ConciergeService,
};
use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Context;
use log::info;
use std::{net::TcpListener, sync::Arc};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::concierge::get_concierge_recommendations,
    ),
    components(schemas(
        RecommendationRequest,
        RecommendationResponse,
        BookSuggestion,
        ConciergeReply,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Concierge", description = "AI book concierge"),
        (name = "System", description = "Service health")
    ),
    info(title = "Lotus & Ink API", description = "Book concierge for the Lotus & Ink website")
)]
pub struct ApiDoc;

pub struct Application {
    port: u16,
    host: String,
    config: Config,
}

impl Application {
    /// Create a new application instance
    pub fn new(config: &Config) -> Self {
        Self {
            port: config.port,
            host: config.host.clone(),
            config: config.clone(),
        }
    }

    /// Build and run the server
    pub async fn run(&self) -> Result<()> {
        let bind_address = format!("{}:{}", self.host, self.port);
        let listener = TcpListener::bind(&bind_address)
            .with_context(|| format!("Failed to bind {}", bind_address))?;
        info!("Starting server at http://{}", bind_address);

        self.run_with_listener(listener).await
    }

    /// Run the server with a specific TCP listener
    /// This is useful for testing where we want to use a random port
    pub async fn run_with_listener(&self, listener: TcpListener) -> Result<()> {
        let credentials = Arc::new(EnvCredentials::new(
            self.config.gemini.credential_env.clone(),
        ));
        let concierge = web::Data::new(ConciergeService::new(
            self.config.gemini.clone(),
            credentials,
        )?);

        HttpServer::new(move || {
            let cors = Cors::default()
                .allow_any_origin()
                .allow_any_method()
                .allow_any_header();

            App::new()
                .wrap(cors)
                .wrap(Logger::default())
                .app_data(concierge.clone())
                .service(api_routes())
                .service(openapi_route())
        })
        .listen(listener)?
        .run()
        .await?;

        Ok(())
    }
}
