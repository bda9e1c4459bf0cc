use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Canonical note record, produced by normalizing whatever the remote resource returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Server-assigned note ID
    pub id: u64,
    /// Note title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    /// Note content
    #[serde(default, deserialize_with = "null_as_empty")]
    pub content: String,
    /// Creation time as sent by the server, or synthesized at normalization time
    #[serde(rename = "createdAt")]
    pub created_at: String,
    /// Fields the remote resource sent that the client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Note {
    /// Parses `created_at` when it is an RFC 3339 timestamp.
    ///
    /// A synthesized value parses too, but it records when the record was
    /// normalized, not when the note was created.
    pub fn created_at_timestamp(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created_at).ok()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
