// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Note repository.
//!
//! Every operation is scoped to the acting owner: a note owned by someone
//! else resolves exactly like a missing note. Deletion cascades to the
//! note's bullet points inside the same write transaction.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{
    composite_key, composite_range, child_id_from_key, BULLET_NOTE_INDEX, BULLET_POINTS, NOTES,
    NOTE_OWNER_INDEX, SEQUENCES, SEQ_NOTES,
};
use super::super::ownership::{OwnedResource, OwnershipCheck};
use super::super::{NotesDb, StorageResult};

/// Note row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredNote {
    /// Dense numeric id.
    pub id: u64,
    /// Free-text title.
    pub title: String,
    /// Owning user id; immutable for the note's lifetime.
    pub user_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnedResource for StoredNote {
    fn owner_user_id(&self) -> u64 {
        self.user_id
    }
}

/// Repository for note rows.
pub struct NoteRepository<'a> {
    db: &'a NotesDb,
}

impl<'a> NoteRepository<'a> {
    pub fn new(db: &'a NotesDb) -> Self {
        Self { db }
    }

    /// Create a note owned by `user_id`.
    pub fn create(&self, user_id: u64, title: &str) -> StorageResult<StoredNote> {
        let now = Utc::now();
        let write_txn = self.db.begin_write()?;
        let note = {
            let id = {
                let mut sequences = write_txn.open_table(SEQUENCES)?;
                let id = sequences.get(SEQ_NOTES)?.map(|v| v.value()).unwrap_or(0) + 1;
                sequences.insert(SEQ_NOTES, id)?;
                id
            };

            let note = StoredNote {
                id,
                title: title.to_string(),
                user_id,
                created_at: now,
                updated_at: now,
            };
            let json = serde_json::to_vec(&note)?;

            let mut notes = write_txn.open_table(NOTES)?;
            notes.insert(id, json.as_slice())?;
            let mut owner_index = write_txn.open_table(NOTE_OWNER_INDEX)?;
            owner_index.insert(composite_key(user_id, id).as_slice(), ())?;
            note
        };
        write_txn.commit()?;
        Ok(note)
    }

    /// Look up a note by id, visible to its owner only.
    pub fn get(&self, user_id: u64, note_id: u64) -> StorageResult<Option<StoredNote>> {
        let read_txn = self.db.begin_read()?;
        let notes = read_txn.open_table(NOTES)?;
        let stored = match notes.get(note_id)? {
            Some(value) => Some(serde_json::from_slice::<StoredNote>(value.value())?),
            None => None,
        };
        Ok(stored.owned_by(user_id))
    }

    /// List all notes owned by `user_id`, in ascending id order
    /// (creation order).
    pub fn list(&self, user_id: u64) -> StorageResult<Vec<StoredNote>> {
        let read_txn = self.db.begin_read()?;
        let owner_index = read_txn.open_table(NOTE_OWNER_INDEX)?;
        let notes = read_txn.open_table(NOTES)?;

        let (start, end) = composite_range(user_id);
        let mut result = Vec::new();
        for entry in owner_index.range(start.as_slice()..=end.as_slice())? {
            let entry = entry?;
            let note_id = child_id_from_key(entry.0.value());
            if let Some(value) = notes.get(note_id)? {
                result.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(result)
    }

    /// Apply the provided fields and refresh `updated_at`.
    ///
    /// # Errors
    /// `StorageError::NotFound` if the note is absent or not owned.
    pub fn update(
        &self,
        user_id: u64,
        note_id: u64,
        title: Option<String>,
    ) -> StorageResult<StoredNote> {
        let write_txn = self.db.begin_write()?;
        let note = {
            let mut notes = write_txn.open_table(NOTES)?;

            let existing_bytes = notes.get(note_id)?.map(|value| value.value().to_vec());
            let stored = match existing_bytes {
                Some(bytes) => Some(serde_json::from_slice::<StoredNote>(&bytes)?),
                None => None,
            };
            let mut note = stored.require_owned(user_id, &format!("Note {note_id}"))?;

            if let Some(title) = title {
                note.title = title;
            }
            note.updated_at = Utc::now();

            let json = serde_json::to_vec(&note)?;
            notes.insert(note_id, json.as_slice())?;
            note
        };
        write_txn.commit()?;
        Ok(note)
    }

    /// Delete a note and its bullet points in one transaction.
    ///
    /// # Errors
    /// `StorageError::NotFound` if the note is absent or not owned.
    pub fn delete(&self, user_id: u64, note_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let stored = {
                let notes = write_txn.open_table(NOTES)?;
                let result = match notes.get(note_id)? {
                    Some(value) => Some(serde_json::from_slice::<StoredNote>(value.value())?),
                    None => None,
                };
                result
            };
            let note = stored.require_owned(user_id, &format!("Note {note_id}"))?;
            delete_note_cascade(&write_txn, &note)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

/// Load every note owned by `user_id` inside an open write transaction.
pub(crate) fn load_notes_for_owner(
    write_txn: &redb::WriteTransaction,
    user_id: u64,
) -> StorageResult<Vec<StoredNote>> {
    let owner_index = write_txn.open_table(NOTE_OWNER_INDEX)?;
    let notes = write_txn.open_table(NOTES)?;

    let (start, end) = composite_range(user_id);
    let mut result = Vec::new();
    for entry in owner_index.range(start.as_slice()..=end.as_slice())? {
        let entry = entry?;
        let note_id = child_id_from_key(entry.0.value());
        if let Some(value) = notes.get(note_id)? {
            result.push(serde_json::from_slice(value.value())?);
        }
    }
    Ok(result)
}

/// Remove a note, its owner-index entry and all of its bullet points.
///
/// Runs inside the caller's write transaction so the cascade commits (or
/// aborts) as one unit. The caller must not hold any table handles.
pub(crate) fn delete_note_cascade(
    write_txn: &redb::WriteTransaction,
    note: &StoredNote,
) -> StorageResult<()> {
    {
        let mut bullet_index = write_txn.open_table(BULLET_NOTE_INDEX)?;
        let mut bullets = write_txn.open_table(BULLET_POINTS)?;

        let (start, end) = composite_range(note.id);
        let bullet_ids: Vec<u64> = {
            let mut ids = Vec::new();
            for entry in bullet_index.range(start.as_slice()..=end.as_slice())? {
                let entry = entry?;
                ids.push(child_id_from_key(entry.0.value()));
            }
            ids
        };

        for bullet_id in bullet_ids {
            bullets.remove(bullet_id)?;
            bullet_index.remove(composite_key(note.id, bullet_id).as_slice())?;
        }
    }

    let mut notes = write_txn.open_table(NOTES)?;
    notes.remove(note.id)?;
    let mut owner_index = write_txn.open_table(NOTE_OWNER_INDEX)?;
    owner_index.remove(composite_key(note.user_id, note.id).as_slice())?;
    Ok(())
}
