pub mod normalize;

use std::fmt;

use reqwest::{Response, StatusCode};
use serde_json::Value;

use crate::{
    dto::{CreateNoteRequest, UpdateNoteRequest},
    models::Note,
};

/// The logical operation a request was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::List => "list",
            Self::Get => "get",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum NoteClientError {
    #[error("{operation} request failed: {status} {reason}")]
    RequestFailed {
        operation: Operation,
        status: u16,
        reason: String,
    },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed note record: {0}")]
    MalformedRecord(String),
}

impl NoteClientError {
    /// HTTP status carried by a `RequestFailed` error.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin wrapper over one remote notes collection.
///
/// Holds no record state between calls: every result is derived from the
/// response of the call that produced it. No retries, no timeouts beyond the
/// transport's own.
#[derive(Debug, Clone)]
pub struct NoteClient {
    base_url: String,
    client: reqwest::Client,
}

impl NoteClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    pub fn with_http_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn note_url(&self, id: u64) -> String {
        format!("{}/{id}", self.base_url)
    }

    pub async fn list(&self) -> Result<Vec<Note>, NoteClientError> {
        tracing::debug!("GET {}", self.base_url);
        let response = self.client.get(&self.base_url).send().await?;
        let body: Value = check_status(Operation::List, response)?.json().await?;

        let notes = normalize::normalize_list(body)?;
        tracing::debug!("Fetched {} notes", notes.len());
        Ok(notes)
    }

    pub async fn get(&self, id: u64) -> Result<Note, NoteClientError> {
        let url = self.note_url(id);
        tracing::debug!("GET {}", url);
        let response = self.client.get(&url).send().await?;
        let body: Value = check_status(Operation::Get, response)?.json().await?;

        normalize::normalize(body)
    }

    pub async fn create(&self, request: &CreateNoteRequest) -> Result<Note, NoteClientError> {
        tracing::debug!("POST {}", self.base_url);
        let response = self
            .client
            .post(&self.base_url)
            .json(request)
            .send()
            .await?;
        let body: Value = check_status(Operation::Create, response)?.json().await?;

        let note = normalize::normalize(body)?;
        tracing::debug!("Created note {}", note.id);
        Ok(note)
    }

    /// Sends `patch` as-is. Whether the server merges or replaces is up to the server.
    pub async fn update(
        &self,
        id: u64,
        patch: &UpdateNoteRequest,
    ) -> Result<Note, NoteClientError> {
        let url = self.note_url(id);
        tracing::debug!("PUT {} {:?}", url, patch);
        let response = self.client.put(&url).json(patch).send().await?;
        let body: Value = check_status(Operation::Update, response)?.json().await?;

        normalize::normalize(body)
    }

    pub async fn delete(&self, id: u64) -> Result<(), NoteClientError> {
        let url = self.note_url(id);
        tracing::debug!("DELETE {}", url);
        let response = self.client.delete(&url).send().await?;
        check_status(Operation::Delete, response)?;

        tracing::debug!("Deleted note {}", id);
        Ok(())
    }
}

fn check_status(operation: Operation, response: Response) -> Result<Response, NoteClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let reason = reason_phrase(status);
    tracing::error!(
        "API error on {} {}: {} {}",
        operation,
        response.url(),
        status.as_u16(),
        reason
    );
    Err(NoteClientError::RequestFailed {
        operation,
        status: status.as_u16(),
        reason,
    })
}

fn reason_phrase(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = NoteClient::new("http://localhost:8000/notes/");
        assert_eq!(client.base_url(), "http://localhost:8000/notes");
        assert_eq!(client.note_url(7), "http://localhost:8000/notes/7");
    }

    #[test]
    fn request_failed_reports_operation_and_status() {
        let err = NoteClientError::RequestFailed {
            operation: Operation::Update,
            status: 404,
            reason: reason_phrase(StatusCode::NOT_FOUND),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), "update request failed: 404 Not Found");
    }

    #[test]
    fn unknown_status_has_empty_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(reason_phrase(status), "");
    }
}
