use std::collections::BTreeMap;

use chrono::Utc;

use crate::models::Note;

/// In-memory note table. IDs start at 1 and are never reused.
#[derive(Debug)]
pub struct Repository {
    notes: BTreeMap<u64, Note>,
    next_id: u64,
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository {
    pub const fn new() -> Self {
        Self {
            notes: BTreeMap::new(),
            next_id: 1,
        }
    }

    pub fn create_note(&mut self, title: String, content: String) -> Note {
        let note = Note {
            id: self.next_id,
            title,
            content,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.notes.insert(note.id, note.clone());

        tracing::debug!("Stored note {}", note.id);
        note
    }

    pub fn update_note(
        &mut self,
        id: u64,
        title: Option<String>,
        content: Option<String>,
    ) -> Option<Note> {
        let note = self.notes.get_mut(&id)?;
        if let Some(title) = title {
            note.title = title;
        }
        if let Some(content) = content {
            note.content = content;
        }
        Some(note.clone())
    }

    pub fn delete_note(&mut self, id: u64) -> Option<Note> {
        self.notes.remove(&id)
    }

    pub fn get_one_note(&self, id: u64) -> Option<Note> {
        self.notes.get(&id).cloned()
    }

    pub fn get_all_notes(&self) -> Vec<Note> {
        self.notes.values().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_and_not_reused() {
        let mut repo = Repository::new();
        let first = repo.create_note("a".into(), "1".into());
        let second = repo.create_note("b".into(), "2".into());
        assert_eq!((first.id, second.id), (1, 2));

        repo.delete_note(second.id);
        assert_eq!(repo.create_note("c".into(), "3".into()).id, 3);
    }

    #[test]
    fn update_keeps_fields_that_are_not_sent() {
        let mut repo = Repository::new();
        let note = repo.create_note("title".into(), "body".into());

        let updated = repo
            .update_note(note.id, None, Some("new body".into()))
            .unwrap();
        assert_eq!(updated.title, "title");
        assert_eq!(updated.content, "new body");
        assert_eq!(updated.created_at, note.created_at);
    }

    #[test]
    fn missing_notes() {
        let mut repo = Repository::new();
        assert!(repo.get_one_note(1).is_none());
        assert!(repo.update_note(1, None, None).is_none());
        assert!(repo.delete_note(1).is_none());
    }
}
