//! Minimal client for the Gemini `generateContent` REST endpoint.

use crate::config::{CredentialProvider, GeminiSettings};
use crate::error::ConciergeError;
use reqwest::{header::HeaderValue, Client};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Per-request handle bound to the credential that was current when it was
/// created. Build a new one for every call with [`GeminiClient::connect`].
#[derive(Debug)]
pub struct GeminiClient {
    http: Client,
    url: String,
    api_key: HeaderValue,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: String,
}

impl GeminiClient {
    /// Reads the current credential and binds it to a new client handle.
    ///
    /// Fails with [`ConciergeError::Configuration`] before any network I/O if
    /// the credential is missing or unusable, or the model name is empty.
    pub fn connect(
        settings: &GeminiSettings,
        http: &Client,
        credentials: &dyn CredentialProvider,
    ) -> Result<Self, ConciergeError> {
        let key = credentials.api_key()?;
        let mut api_key = HeaderValue::from_str(&key).map_err(|e| {
            ConciergeError::Configuration(format!("API key is not a valid header value: {}", e))
        })?;
        api_key.set_sensitive(true);

        let model = settings.model.trim();
        let model = model.strip_prefix("models/").unwrap_or(model);
        if model.is_empty() {
            return Err(ConciergeError::Configuration(
                "Gemini model name is empty".to_string(),
            ));
        }

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            settings.base_url.trim_end_matches('/'),
            model
        );

        Ok(Self {
            http: http.clone(),
            url,
            api_key,
        })
    }

    /// Issues one `generateContent` request constrained to `schema` and
    /// returns the text of the first candidate.
    pub async fn generate(
        &self,
        prompt: &str,
        mime_type: &str,
        schema: &Value,
    ) -> Result<String, ConciergeError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: mime_type,
                response_schema: schema,
            },
        };

        debug!(url = %self.url, "Sending generateContent request");

        let response = self
            .http
            .post(&self.url)
            .header(API_KEY_HEADER, self.api_key.clone())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                ConciergeError::Upstream(format!("Failed to send request to Gemini API: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            ConciergeError::Upstream(format!("Failed to read Gemini response body: {}", e))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<GoogleErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ConciergeError::Upstream(format!(
                "Gemini API returned non-success status: {} - {}",
                status, message
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body).map_err(|e| {
            ConciergeError::Upstream(format!("Failed to decode Gemini response envelope: {}", e))
        })?;

        let Some(candidate) = parsed.candidates.into_iter().next() else {
            warn!("Gemini response contained no candidates");
            return Err(ConciergeError::EmptyResponse);
        };

        let text: String = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            warn!(
                finish_reason = candidate.finish_reason.as_deref().unwrap_or("unknown"),
                "Gemini candidate contained no text"
            );
            return Err(ConciergeError::EmptyResponse);
        }

        Ok(text)
    }

    #[cfg(test)]
    fn url(&self) -> &str {
        &self.url
    }
}
