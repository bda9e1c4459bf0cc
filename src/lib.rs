pub mod client;
pub mod config;
pub mod dto;
pub mod models;
pub mod theme;

pub use client::{NoteClient, NoteClientError, Operation};
pub use dto::{CreateNoteRequest, UpdateNoteRequest};
pub use models::Note;
pub use theme::{Theme, ThemeEnvironment, ThemeStore};
