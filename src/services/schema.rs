//! Response schema sent to the model as an output-format constraint.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

pub const RESPONSE_MIME_TYPE: &str = "application/json";

static RECOMMENDATION_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "OBJECT",
        "properties": {
            "intro": { "type": "STRING" },
            "books": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "title": { "type": "STRING" },
                        "author": { "type": "STRING" },
                        "reason": { "type": "STRING" }
                    },
                    "required": ["title", "author", "reason"]
                }
            }
        },
        "required": ["intro", "books"]
    })
});

/// Shape of a recommendation payload, in the schema dialect the Gemini API
/// accepts for `responseSchema`.
pub fn recommendation_schema() -> &'static Value {
    &RECOMMENDATION_SCHEMA
}
