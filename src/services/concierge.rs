use crate::{
    config::{CredentialProvider, GeminiSettings},
    error::{ConciergeError, Result},
    models::RecommendationResponse,
    services::{gemini::GeminiClient, normalizer, schema},
};
use reqwest::Client;
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

/// The book concierge: one model call per query, no caching, no retries.
#[derive(Clone)]
pub struct ConciergeService {
    http: Client,
    settings: GeminiSettings,
    credentials: Arc<dyn CredentialProvider>,
}

impl ConciergeService {
    pub fn new(settings: GeminiSettings, credentials: Arc<dyn CredentialProvider>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        info!(
            "Concierge configured with model: {}, timeout: {}s, credential from: {}",
            settings.model, settings.timeout_secs, settings.credential_env
        );

        Ok(Self {
            http,
            settings,
            credentials,
        })
    }

    /// Issue one model request for `preference` and return its raw text.
    ///
    /// The credential is read again for every call.
    pub async fn execute(&self, preference: &str) -> std::result::Result<String, ConciergeError> {
        let client = GeminiClient::connect(&self.settings, &self.http, self.credentials.as_ref())?;
        let prompt = build_prompt(preference);

        client
            .generate(
                &prompt,
                schema::RESPONSE_MIME_TYPE,
                schema::recommendation_schema(),
            )
            .await
    }

    /// Execute and normalize, keeping the failure kind.
    pub async fn recommend(
        &self,
        preference: &str,
    ) -> std::result::Result<RecommendationResponse, ConciergeError> {
        let raw = self.execute(preference).await?;
        debug!(length = raw.len(), "Received model output");
        normalizer::normalize(&raw)
    }

    /// Get book recommendations for a free-text preference.
    ///
    /// Every failure is logged with its kind and then reported as `None`.
    pub async fn get_book_recommendations(&self, preference: &str) -> Option<RecommendationResponse> {
        let request_id = Uuid::new_v4();
        let span = info_span!("concierge", %request_id);

        async {
            info!(preference, "Requesting book recommendations");

            match self.recommend(preference).await {
                Ok(response) => {
                    info!(books = response.books.len(), "Recommendations ready");
                    Some(response)
                }
                Err(e) => {
                    error!(preference, kind = %e.kind(), error = %e, "Book concierge failed");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }
}

/// Instruction sent to the model with the shopper's preference embedded verbatim.
pub fn build_prompt(preference: &str) -> String {
    format!(
        "Suggest 3 books by Asian American authors based on this preference: \"{}\". \n\
         Return the data in a friendly tone as a helpful bookseller in Los Angeles.",
        preference
    )
}
