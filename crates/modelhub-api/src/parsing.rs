//! JSON parsing functions for backend API responses.
//!
//! This module provides sync parsing functions that convert raw JSON
//! responses into domain objects. Parsing is lenient where the backend is:
//! missing counters default to 0 and malformed list entries are skipped.

use chrono::{DateTime, Utc};
use modelhub_core::{Author, AuthorKind, ModelSummary, PageResult, Pipeline};
use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::models::{WireChatChunk, WireStatus};

// ============================================================================
// Catalog Parsing
// ============================================================================

/// Parse the pipelines list. Entries without an id are skipped.
pub fn parse_pipelines(json: &Value) -> ApiResult<Vec<Pipeline>> {
    let entries = json.as_array().ok_or_else(|| ApiError::InvalidResponse {
        message: "expected a JSON array of pipelines".to_string(),
    })?;

    Ok(entries
        .iter()
        .filter_map(|entry| {
            let id = entry.get("id").and_then(Value::as_str)?;
            let label = entry.get("label").and_then(Value::as_str).unwrap_or(id);
            Some(Pipeline::new(id, label))
        })
        .collect())
}

/// Parse one page of the models list.
pub fn parse_page(json: &Value) -> ApiResult<PageResult> {
    let models = json
        .get("models")
        .and_then(Value::as_array)
        .ok_or_else(|| ApiError::InvalidResponse {
            message: "models page has no 'models' array".to_string(),
        })?;

    Ok(PageResult {
        models: models.iter().filter_map(parse_model_summary).collect(),
        num_total_items: json.get("numTotalItems").and_then(Value::as_u64).unwrap_or(0),
        num_items_per_page: json
            .get("numItemsPerPage")
            .and_then(Value::as_u64)
            .unwrap_or(0),
    })
}

/// Parse a single model JSON object.
///
/// Returns `None` if the model has no id.
pub fn parse_model_summary(json: &Value) -> Option<ModelSummary> {
    let id = json.get("id").and_then(Value::as_str)?.to_string();
    if id.is_empty() {
        return None;
    }

    let pipeline_tag = json
        .get("pipelineTag")
        .or_else(|| json.get("pipeline_tag"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let last_modified = json
        .get("lastModified")
        .and_then(Value::as_str)
        .and_then(parse_timestamp);

    // `authorData` carries the full record; `author` may be the same object
    // or only the account name.
    let author = json
        .get("authorData")
        .filter(|v| v.is_object())
        .or_else(|| json.get("author").filter(|v| v.is_object()))
        .map_or_else(
            || Author {
                name: json
                    .get("author")
                    .and_then(Value::as_str)
                    .map_or_else(|| id.split('/').next().unwrap_or_default().to_string(), String::from),
                ..Author::default()
            },
            parse_author,
        );

    Some(ModelSummary {
        pipeline_tag,
        available: json.get("available").and_then(Value::as_bool).unwrap_or(false),
        last_modified,
        downloads: json.get("downloads").and_then(Value::as_u64).unwrap_or(0),
        likes: json.get("likes").and_then(Value::as_u64).unwrap_or(0),
        author,
        id,
    })
}

fn parse_author(json: &Value) -> Author {
    let text = |key: &str| json.get(key).and_then(Value::as_str).map(String::from);
    Author {
        avatar_url: text("avatarUrl").filter(|url| !url.is_empty()),
        name: text("name").unwrap_or_default(),
        fullname: text("fullname").filter(|name| !name.is_empty()),
        kind: text("type").map_or_else(AuthorKind::default, |t| AuthorKind::from_type(&t)),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

// ============================================================================
// Lifecycle Parsing
// ============================================================================

/// Parse a size body: a JSON integer, or a string holding one.
pub fn parse_size(json: &Value) -> ApiResult<u64> {
    let size = match json {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    size.ok_or_else(|| ApiError::InvalidResponse {
        message: format!("expected a byte count, got {json}"),
    })
}

/// Parse a `{status}` body. A bare JSON string is accepted too.
pub fn parse_status(json: &Value) -> ApiResult<String> {
    if let Value::String(status) = json {
        return Ok(status.clone());
    }
    let wire: WireStatus = serde_json::from_value(json.clone())?;
    Ok(wire.status)
}

// ============================================================================
// Chat Parsing
// ============================================================================

/// Extract the text delta from one streamed chat event.
///
/// Returns `Ok(None)` for chunks without content.
pub fn parse_chat_delta(data: &str) -> ApiResult<Option<String>> {
    let chunk: WireChatChunk = serde_json::from_str(data)?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}
