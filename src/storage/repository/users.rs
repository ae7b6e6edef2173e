// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! A user is either a local account (Argon2id password hash present) or an
//! identity-provider account (`password_hash` is `None`, password login
//! structurally impossible). Username uniqueness is enforced through the
//! username index inside the registering transaction.

use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use super::super::database::{SEQUENCES, SEQ_USERS, USERNAME_INDEX, USERS};
use super::super::{NotesDb, StorageError, StorageResult};
use super::notes;
use crate::auth::password::verify_password;

/// User row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    /// Dense numeric id.
    pub id: u64,
    /// Unique username (a local handle or an email).
    pub username: String,
    /// Local credential; `None` for identity-provider-created accounts.
    pub password_hash: Option<String>,
}

/// Repository for user rows.
pub struct UserRepository<'a> {
    db: &'a NotesDb,
}

impl<'a> UserRepository<'a> {
    pub fn new(db: &'a NotesDb) -> Self {
        Self { db }
    }

    /// Create a user. The password hash (if any) must already be computed;
    /// plaintext never reaches this layer.
    ///
    /// # Errors
    /// `StorageError::DuplicateUsername` if the username is taken.
    pub fn register(
        &self,
        username: &str,
        password_hash: Option<String>,
    ) -> StorageResult<StoredUser> {
        let write_txn = self.db.begin_write()?;
        let user = {
            let mut username_index = write_txn.open_table(USERNAME_INDEX)?;
            if username_index.get(username)?.is_some() {
                return Err(StorageError::DuplicateUsername(username.to_string()));
            }

            let id = {
                let mut sequences = write_txn.open_table(SEQUENCES)?;
                let id = sequences.get(SEQ_USERS)?.map(|v| v.value()).unwrap_or(0) + 1;
                sequences.insert(SEQ_USERS, id)?;
                id
            };

            let user = StoredUser {
                id,
                username: username.to_string(),
                password_hash,
            };
            let json = serde_json::to_vec(&user)?;

            let mut users = write_txn.open_table(USERS)?;
            users.insert(id, json.as_slice())?;
            username_index.insert(username, id)?;
            user
        };
        write_txn.commit()?;
        Ok(user)
    }

    /// Look up a user by id.
    pub fn get(&self, user_id: u64) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let users = read_txn.open_table(USERS)?;
        match users.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Look up a user by username.
    pub fn get_by_username(&self, username: &str) -> StorageResult<Option<StoredUser>> {
        let read_txn = self.db.begin_read()?;
        let username_index = read_txn.open_table(USERNAME_INDEX)?;
        let Some(id) = username_index.get(username)?.map(|v| v.value()) else {
            return Ok(None);
        };
        let users = read_txn.open_table(USERS)?;
        match users.get(id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Resolve a username/password pair to a user.
    ///
    /// An unknown username, an account without a local credential and a
    /// hash mismatch all yield `None` — the caller cannot tell which.
    pub fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> StorageResult<Option<StoredUser>> {
        let Some(user) = self.get_by_username(username)? else {
            return Ok(None);
        };
        let Some(hash) = user.password_hash.as_deref() else {
            return Ok(None);
        };
        match verify_password(password, hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                tracing::warn!("stored password hash unreadable: {e}");
                Ok(None)
            }
        }
    }

    /// Delete a user and, transitively, every owned note and bullet point,
    /// in one transaction.
    pub fn delete(&self, user_id: u64) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let user: StoredUser = {
                let users = write_txn.open_table(USERS)?;
                let result = match users.get(user_id)? {
                    Some(value) => serde_json::from_slice(value.value())?,
                    None => return Err(StorageError::NotFound(format!("User {user_id}"))),
                };
                result
            };

            let owned_notes = notes::load_notes_for_owner(&write_txn, user_id)?;
            for note in &owned_notes {
                notes::delete_note_cascade(&write_txn, note)?;
            }

            {
                let mut users = write_txn.open_table(USERS)?;
                users.remove(user_id)?;
            }
            {
                let mut username_index = write_txn.open_table(USERNAME_INDEX)?;
                username_index.remove(user.username.as_str())?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::hash_password;
    use crate::storage::repository::{BulletPointRepository, NoteRepository};
    use tempfile::TempDir;

    fn open_db() -> (NotesDb, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db = NotesDb::open(&temp_dir.path().join("notes.redb")).expect("Failed to open");
        (db, temp_dir)
    }

    #[test]
    fn register_and_look_up_by_username() {
        let (db, _temp_dir) = open_db();
        let repo = UserRepository::new(&db);

        let user = repo
            .register("alice", Some(hash_password("pw1").unwrap()))
            .unwrap();
        assert_eq!(user.id, 1);

        let loaded = repo.get_by_username("alice").unwrap().unwrap();
        assert_eq!(loaded, user);
        assert_eq!(repo.get(user.id).unwrap().unwrap(), user);
    }

    #[test]
    fn duplicate_username_is_rejected() {
        let (db, _temp_dir) = open_db();
        let repo = UserRepository::new(&db);

        repo.register("alice", None).unwrap();
        let result = repo.register("alice", None);
        assert!(matches!(result, Err(StorageError::DuplicateUsername(_))));

        // The failed registration must not burn the username for others.
        let other = repo.register("bob", None).unwrap();
        assert_eq!(other.id, 2);
    }

    #[test]
    fn verify_credentials_accepts_the_right_password_only() {
        let (db, _temp_dir) = open_db();
        let repo = UserRepository::new(&db);

        repo.register("alice", Some(hash_password("pw1").unwrap()))
            .unwrap();

        assert!(repo.verify_credentials("alice", "pw1").unwrap().is_some());
        assert!(repo.verify_credentials("alice", "wrong").unwrap().is_none());
        assert!(repo.verify_credentials("nobody", "pw1").unwrap().is_none());
    }

    #[test]
    fn provider_accounts_never_pass_password_login() {
        let (db, _temp_dir) = open_db();
        let repo = UserRepository::new(&db);

        repo.register("bob@x.com", None).unwrap();
        assert!(repo
            .verify_credentials("bob@x.com", "anything")
            .unwrap()
            .is_none());
    }

    #[test]
    fn delete_cascades_through_notes_to_bullet_points() {
        let (db, _temp_dir) = open_db();
        let users = UserRepository::new(&db);
        let notes = NoteRepository::new(&db);
        let bullets = BulletPointRepository::new(&db);

        let user = users.register("alice", None).unwrap();
        let keeper = users.register("bob", None).unwrap();

        let note = notes.create(user.id, "Groceries").unwrap();
        bullets.create(note.id, "milk", false).unwrap();
        bullets.create(note.id, "eggs", true).unwrap();
        let kept_note = notes.create(keeper.id, "Untouched").unwrap();

        users.delete(user.id).unwrap();

        assert!(users.get(user.id).unwrap().is_none());
        assert!(users.get_by_username("alice").unwrap().is_none());
        assert!(notes.get(user.id, note.id).unwrap().is_none());
        assert!(bullets.list(note.id).unwrap().is_empty());

        // Another user's data is untouched.
        assert!(notes.get(keeper.id, kept_note.id).unwrap().is_some());

        // The username is free again.
        users.register("alice", None).unwrap();
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let (db, _temp_dir) = open_db();
        let repo = UserRepository::new(&db);
        assert!(matches!(
            repo.delete(42),
            Err(StorageError::NotFound(_))
        ));
    }
}
