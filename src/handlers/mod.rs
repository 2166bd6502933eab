pub mod concierge;
pub mod health;

pub use concierge::concierge_config;
pub use health::health_check;
