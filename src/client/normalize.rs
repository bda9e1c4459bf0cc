//! Raw record to [`Note`] normalization.
//!
//! Every response path of [`super::NoteClient`] goes through [`normalize`]:
//! all fields are copied verbatim, `id` is coerced to an integer and a missing
//! `createdAt` is replaced by the current instant.

use chrono::{SecondsFormat, Utc};
use serde_json::Value;

use crate::models::Note;

use super::NoteClientError;

pub fn normalize(raw: Value) -> Result<Note, NoteClientError> {
    let mut fields = match raw {
        Value::Object(fields) => fields,
        other => {
            return Err(NoteClientError::MalformedRecord(format!(
                "expected a JSON object, got {other}"
            )));
        }
    };

    let id = coerce_id(fields.get("id"))?;
    fields.insert("id".to_string(), Value::from(id));

    let created_at = fields
        .get("createdAt")
        .and_then(present_created_at)
        .unwrap_or_else(now_iso8601);
    fields.insert("createdAt".to_string(), Value::String(created_at));

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| NoteClientError::MalformedRecord(e.to_string()))
}

/// Normalizes a list body. Anything other than a JSON array yields no notes.
pub fn normalize_list(raw: Value) -> Result<Vec<Note>, NoteClientError> {
    match raw {
        Value::Array(records) => records.into_iter().map(normalize).collect(),
        other => {
            tracing::warn!("list response is not an array, treating it as empty: {other}");
            Ok(Vec::new())
        }
    }
}

fn coerce_id(raw: Option<&Value>) -> Result<u64, NoteClientError> {
    let malformed = || {
        NoteClientError::MalformedRecord(format!(
            "id {} is not a non-negative integer",
            raw.map_or_else(|| "<missing>".to_string(), ToString::to_string)
        ))
    };

    match raw {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().and_then(integral_u64))
            .ok_or_else(malformed),
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(0);
            }
            trimmed
                .parse::<u64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().and_then(integral_u64))
                .ok_or_else(malformed)
        }
        _ => Err(malformed()),
    }
}

/// 2^64, the first integer `u64` cannot hold.
const U64_LIMIT: f64 = 18_446_744_073_709_551_616.0;

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn integral_u64(f: f64) -> Option<u64> {
    (f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f < U64_LIMIT).then(|| f as u64)
}

/// Truthy values are kept: strings as-is, anything else in its JSON text form.
/// `null`, `false`, `0` and `""` count as absent.
fn present_created_at(raw: &Value) -> Option<String> {
    match raw {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
