//! Turns raw model text into a validated [`RecommendationResponse`].

use crate::error::ConciergeError;
use crate::models::{BookSuggestion, RecommendationResponse};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

static LEADING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*(?:\r?\n)?").unwrap());

static TRAILING_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:\r?\n)?```$").unwrap());

/// Removes one optional leading code fence (with optional language tag) and
/// one optional trailing fence.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let text = match LEADING_FENCE.find(text) {
        Some(m) => &text[m.end()..],
        None => text,
    };
    let text = match TRAILING_FENCE.find(text) {
        Some(m) => &text[..m.start()],
        None => text,
    };
    text.trim()
}

/// Strip, parse and validate the model output.
///
/// Extra fields are ignored; `books` keeps the order the model produced.
pub fn normalize(raw: &str) -> Result<RecommendationResponse, ConciergeError> {
    let cleaned = strip_code_fence(raw);
    if cleaned.is_empty() {
        return Err(ConciergeError::EmptyResponse);
    }

    let value: Value = serde_json::from_str(cleaned)
        .map_err(|e| ConciergeError::MalformedResponse(e.to_string()))?;

    validate(&value)
}

fn validate(value: &Value) -> Result<RecommendationResponse, ConciergeError> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("payload is not an object"))?;

    let intro = required_string(object, "intro", "intro")?;

    let books = match object.get("books") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(invalid("books is not an array")),
        None => return Err(invalid("books is missing")),
    };

    let books = books
        .iter()
        .enumerate()
        .map(|(index, item)| validate_book(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(RecommendationResponse { intro, books })
}

fn validate_book(index: usize, item: &Value) -> Result<BookSuggestion, ConciergeError> {
    let object = item
        .as_object()
        .ok_or_else(|| invalid(&format!("books[{}] is not an object", index)))?;

    Ok(BookSuggestion {
        title: required_string(object, "title", &format!("books[{}].title", index))?,
        author: required_string(object, "author", &format!("books[{}].author", index))?,
        reason: required_string(object, "reason", &format!("books[{}].reason", index))?,
    })
}

fn required_string(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<String, ConciergeError> {
    match object.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(invalid(&format!("{} is not a string", path))),
        None => Err(invalid(&format!("{} is missing", path))),
    }
}

fn invalid(reason: &str) -> ConciergeError {
    ConciergeError::InvalidShape(reason.to_string())
}
