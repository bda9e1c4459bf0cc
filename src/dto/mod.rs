use serde::{Deserialize, Serialize};

/// Body of a create call. The server assigns `id` and `createdAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateNoteRequest {
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
}

impl CreateNoteRequest {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Partial body of an update call. Only the fields that are set are sent;
/// what the server does with the missing ones is up to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(
        rename = "createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<String>,
}

impl UpdateNoteRequest {
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.created_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_request_omits_unset_fields() {
        let patch = UpdateNoteRequest::default().content("new body");
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, serde_json::json!({ "content": "new body" }));
    }

    #[test]
    fn empty_update_request_serializes_to_empty_object() {
        let patch = UpdateNoteRequest::default();
        assert!(patch.is_empty());
        assert_eq!(serde_json::to_string(&patch).unwrap(), "{}");
    }
}
