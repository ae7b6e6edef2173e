// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded notes database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → serialized StoredUser
//! - `username_index`: username → user_id (uniqueness + login lookup)
//! - `notes`: note_id → serialized StoredNote
//! - `note_owner_index`: composite key (user_id_be|note_id_be) → ()
//! - `bullet_points`: bullet_id → serialized StoredBulletPoint
//! - `bullet_note_index`: composite key (note_id_be|bullet_id_be) → ()
//! - `sequences`: table name → last allocated row id
//!
//! Composite index keys are fixed-width big-endian pairs, so a prefix
//! range scan yields children of one parent in ascending id order.

use std::path::Path;

use redb::{Database, ReadableDatabase, TableDefinition};

// =============================================================================
// Table Definitions
// =============================================================================

/// Primary table: user_id → serialized StoredUser (JSON bytes).
pub(crate) const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Index: username → user_id. One row per registered username.
pub(crate) const USERNAME_INDEX: TableDefinition<&str, u64> =
    TableDefinition::new("username_index");

/// Primary table: note_id → serialized StoredNote (JSON bytes).
pub(crate) const NOTES: TableDefinition<u64, &[u8]> = TableDefinition::new("notes");

/// Index: composite key (user_id_be|note_id_be) → ().
pub(crate) const NOTE_OWNER_INDEX: TableDefinition<&[u8], ()> =
    TableDefinition::new("note_owner_index");

/// Primary table: bullet_id → serialized StoredBulletPoint (JSON bytes).
pub(crate) const BULLET_POINTS: TableDefinition<u64, &[u8]> =
    TableDefinition::new("bullet_points");

/// Index: composite key (note_id_be|bullet_id_be) → ().
pub(crate) const BULLET_NOTE_INDEX: TableDefinition<&[u8], ()> =
    TableDefinition::new("bullet_note_index");

/// Sequences: table name → last allocated id.
pub(crate) const SEQUENCES: TableDefinition<&str, u64> = TableDefinition::new("sequences");

/// Sequence name for user ids.
pub(crate) const SEQ_USERS: &str = "users";

/// Sequence name for note ids.
pub(crate) const SEQ_NOTES: &str = "notes";

/// Sequence name for bullet-point ids.
pub(crate) const SEQ_BULLET_POINTS: &str = "bullet_points";

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("username already taken: {0}")]
    DuplicateUsername(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Index Key Helpers
// =============================================================================

/// Build a composite key for a parent/child index table.
///
/// Fixed-width big-endian halves keep scans ordered by (parent, child id).
pub(crate) fn composite_key(parent_id: u64, child_id: u64) -> [u8; 16] {
    let mut key = [0u8; 16];
    key[..8].copy_from_slice(&parent_id.to_be_bytes());
    key[8..].copy_from_slice(&child_id.to_be_bytes());
    key
}

/// Inclusive range covering every child of `parent_id`.
pub(crate) fn composite_range(parent_id: u64) -> ([u8; 16], [u8; 16]) {
    (
        composite_key(parent_id, 0),
        composite_key(parent_id, u64::MAX),
    )
}

/// Extract the child id from a composite key.
pub(crate) fn child_id_from_key(key: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&key[8..16]);
    u64::from_be_bytes(bytes)
}

// =============================================================================
// NotesDb
// =============================================================================

/// Embedded ACID notes database.
pub struct NotesDb {
    db: Database,
}

impl NotesDb {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(USERNAME_INDEX)?;
            let _ = write_txn.open_table(NOTES)?;
            let _ = write_txn.open_table(NOTE_OWNER_INDEX)?;
            let _ = write_txn.open_table(BULLET_POINTS)?;
            let _ = write_txn.open_table(BULLET_NOTE_INDEX)?;
            let _ = write_txn.open_table(SEQUENCES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Begin a write transaction. One logical mutation per transaction.
    pub(crate) fn begin_write(&self) -> StorageResult<redb::WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    /// Begin a read transaction.
    pub(crate) fn begin_read(&self) -> StorageResult<redb::ReadTransaction> {
        Ok(self.db.begin_read()?)
    }
}
