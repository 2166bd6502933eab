pub mod concierge;
pub mod gemini;
pub mod normalizer;
pub mod schema;

// Re-export public types
pub use concierge::ConciergeService;
pub use gemini::GeminiClient;
