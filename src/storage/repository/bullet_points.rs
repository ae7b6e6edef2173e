// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bullet-point repository.
//!
//! Bullet points are fully subordinate to their note: every operation is
//! scoped to a note id the caller has already resolved under the
//! ownership rule, and a bullet point attached to a different note is
//! reported as missing.

use chrono::{DateTime, Utc};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{
    composite_key, composite_range, child_id_from_key, BULLET_NOTE_INDEX, BULLET_POINTS,
    SEQUENCES, SEQ_BULLET_POINTS,
};
use super::super::{NotesDb, StorageError, StorageResult};

/// Bullet-point row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredBulletPoint {
    /// Dense numeric id.
    pub id: u64,
    /// Parent note id; immutable for the bullet point's lifetime.
    pub note_id: u64,
    /// Free text, possibly already enhanced.
    pub content: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Repository for bullet-point rows.
pub struct BulletPointRepository<'a> {
    db: &'a NotesDb,
}

impl<'a> BulletPointRepository<'a> {
    pub fn new(db: &'a NotesDb) -> Self {
        Self { db }
    }

    /// Create a bullet point under `note_id`.
    pub fn create(
        &self,
        note_id: u64,
        content: &str,
        completed: bool,
    ) -> StorageResult<StoredBulletPoint> {
        let now = Utc::now();
        let write_txn = self.db.begin_write()?;
        let bullet = {
            let id = {
                let mut sequences = write_txn.open_table(SEQUENCES)?;
                let id = sequences
                    .get(SEQ_BULLET_POINTS)?
                    .map(|v| v.value())
                    .unwrap_or(0)
                    + 1;
                sequences.insert(SEQ_BULLET_POINTS, id)?;
                id
            };

            let bullet = StoredBulletPoint {
                id,
                note_id,
                content: content.to_string(),
                completed,
                created_at: now,
                updated_at: now,
            };
            let json = serde_json::to_vec(&bullet)?;

            let mut bullets = write_txn.open_table(BULLET_POINTS)?;
            bullets.insert(id, json.as_slice())?;
            let mut note_index = write_txn.open_table(BULLET_NOTE_INDEX)?;
            note_index.insert(composite_key(note_id, id).as_slice(), ())?;
            bullet
        };
        write_txn.commit()?;
        Ok(bullet)
    }

    /// Look up a bullet point by id within its note.
    pub fn get(&self, note_id: u64, bullet_id: u64) -> StorageResult<Option<StoredBulletPoint>> {
        let read_txn = self.db.begin_read()?;
        let bullets = read_txn.open_table(BULLET_POINTS)?;
        let stored = match bullets.get(bullet_id)? {
            Some(value) => Some(serde_json::from_slice::<StoredBulletPoint>(value.value())?),
            None => None,
        };
        Ok(stored.filter(|bullet| bullet.note_id == note_id))
    }

    /// List the bullet points of a note in ascending id order.
    pub fn list(&self, note_id: u64) -> StorageResult<Vec<StoredBulletPoint>> {
        let read_txn = self.db.begin_read()?;
        let note_index = read_txn.open_table(BULLET_NOTE_INDEX)?;
        let bullets = read_txn.open_table(BULLET_POINTS)?;

        let (start, end) = composite_range(note_id);
        let mut result = Vec::new();
        for entry in note_index.range(start.as_slice()..=end.as_slice())? {
            let entry = entry?;
            let bullet_id = child_id_from_key(entry.0.value());
            if let Some(value) = bullets.get(bullet_id)? {
                result.push(serde_json::from_slice(value.value())?);
            }
        }
        Ok(result)
    }

    /// Replace content and completed unconditionally and refresh
    /// `updated_at`. Unlike note updates there is no partial form.
    ///
    /// # Errors
    /// `StorageError::NotFound` if the bullet point is absent or attached
    /// to a different note.
    pub fn update(
        &self,
        note_id: u64,
        bullet_id: u64,
        content: &str,
        completed: bool,
    ) -> StorageResult<StoredBulletPoint> {
        let write_txn = self.db.begin_write()?;
        let bullet = {
            let mut bullets = write_txn.open_table(BULLET_POINTS)?;

            let existing_bytes = bullets.get(bullet_id)?.map(|value| value.value().to_vec());
            let stored = match existing_bytes {
                Some(bytes) => Some(serde_json::from_slice::<StoredBulletPoint>(&bytes)?),
                None => None,
            };
            let mut bullet = stored
                .filter(|bullet| bullet.note_id == note_id)
                .ok_or_else(|| StorageError::NotFound(format!("Bullet point {bullet_id}")))?;

            bullet.content = content.to_string();
            bullet.completed = completed;
            bullet.updated_at = Utc::now();

            let json = serde_json::to_vec(&bullet)?;
            bullets.insert(bullet_id, json.as_slice())?;
            bullet
        };
        write_txn.commit()?;
        Ok(bullet)
    }

    /// Delete a single bullet point.
    ///
    /// # Errors
    /// `StorageError::NotFound` if the bullet point is absent or attached
    /// to a different note.
    pub fn delete(&self, note_id: u64, bullet_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut bullets = write_txn.open_table(BULLET_POINTS)?;

            let existing_bytes = bullets.get(bullet_id)?.map(|value| value.value().to_vec());
            let stored = match existing_bytes {
                Some(bytes) => Some(serde_json::from_slice::<StoredBulletPoint>(&bytes)?),
                None => None,
            };
            if stored.filter(|bullet| bullet.note_id == note_id).is_none() {
                return Err(StorageError::NotFound(format!("Bullet point {bullet_id}")));
            }

            bullets.remove(bullet_id)?;
            let mut note_index = write_txn.open_table(BULLET_NOTE_INDEX)?;
            note_index.remove(composite_key(note_id, bullet_id).as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }
}
