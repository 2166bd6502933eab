use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for the book concierge
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecommendationRequest {
    /// Free-form reading preference
    #[schema(example = "a quiet family saga set in California")]
    pub preference: String,
}

/// A validated set of recommendations from the concierge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationResponse {
    /// Short narrative framing the picks
    pub intro: String,
    /// Recommended books in display order
    pub books: Vec<BookSuggestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookSuggestion {
    #[schema(example = "The Sympathizer")]
    pub title: String,
    #[schema(example = "Viet Thanh Nguyen")]
    pub author: String,
    pub reason: String,
}

/// Concierge reply. `recommendations` is null when no result could be produced.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConciergeReply {
    pub recommendations: Option<RecommendationResponse>,
}

/// Health check response structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Status of the service
    #[schema(example = "ok")]
    pub status: String,
    /// Current timestamp in RFC3339 format
    #[schema(example = "2024-01-15T10:30:00Z")]
    pub timestamp: String,
}

/// Error response structure
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "Invalid input: Preference cannot be empty")]
    pub error: String,
}
