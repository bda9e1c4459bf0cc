use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    repository::Repository,
};

use std::sync::Arc;

#[derive(Clone, Default)]
pub struct NoteService {
    repo: Arc<tokio::sync::Mutex<Repository>>,
}

impl NoteService {
    pub const fn new(repo: Arc<tokio::sync::Mutex<Repository>>) -> Self {
        Self { repo }
    }

    pub async fn create_note(&self, request: CreateNoteRequest) -> NoteResponse {
        self.repo
            .lock()
            .await
            .create_note(request.title, request.content)
            .into()
    }

    pub async fn update_note(&self, id: u64, request: UpdateNoteRequest) -> Option<NoteResponse> {
        self.repo
            .lock()
            .await
            .update_note(id, request.title, request.content)
            .map(Into::into)
    }

    pub async fn delete_note(&self, id: u64) -> Option<NoteResponse> {
        self.repo.lock().await.delete_note(id).map(Into::into)
    }

    pub async fn get_one_note(&self, id: u64) -> Option<NoteResponse> {
        self.repo.lock().await.get_one_note(id).map(Into::into)
    }

    pub async fn get_all_notes(&self) -> Vec<NoteResponse> {
        self.repo
            .lock()
            .await
            .get_all_notes()
            .into_iter()
            .map(Into::into)
            .collect()
    }
}
