// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the notes database.
//!
//! Each repository provides CRUD operations for a specific entity type,
//! borrowing the shared [`crate::storage::NotesDb`] for all table access.

pub mod bullet_points;
pub mod notes;
pub mod users;

pub use bullet_points::{BulletPointRepository, StoredBulletPoint};
pub use notes::{NoteRepository, StoredNote};
pub use users::{StoredUser, UserRepository};
