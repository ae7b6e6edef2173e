// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for all storage operations.
//!
//! Every lookup of an owned resource passes through these helpers, and a
//! row owned by someone else is reported exactly like a missing row.
//! There is no "forbidden" outcome anywhere in the storage layer, so a
//! caller can never probe whether a foreign id exists.

use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user id.
    fn owner_user_id(&self) -> u64;
}

/// Ownership-collapsing helpers for looked-up resources.
pub trait OwnershipCheck<T> {
    /// Keep the resource only if `user_id` owns it; not-owned collapses
    /// into absent.
    fn owned_by(self, user_id: u64) -> Option<T>;

    /// Like [`OwnershipCheck::owned_by`], but absent/not-owned becomes a
    /// `NotFound` error naming `what`.
    fn require_owned(self, user_id: u64, what: &str) -> StorageResult<T>;
}

impl<T: OwnedResource> OwnershipCheck<T> for Option<T> {
    fn owned_by(self, user_id: u64) -> Option<T> {
        self.filter(|resource| resource.owner_user_id() == user_id)
    }

    fn require_owned(self, user_id: u64, what: &str) -> StorageResult<T> {
        self.owned_by(user_id)
            .ok_or_else(|| StorageError::NotFound(what.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestResource {
        owner: u64,
    }

    impl OwnedResource for TestResource {
        fn owner_user_id(&self) -> u64 {
            self.owner
        }
    }

    #[test]
    fn owner_sees_the_resource() {
        let resource = Some(TestResource { owner: 1 });
        assert!(resource.owned_by(1).is_some());
    }

    #[test]
    fn non_owner_sees_nothing() {
        let resource = Some(TestResource { owner: 1 });
        assert!(resource.owned_by(2).is_none());
    }

    #[test]
    fn require_owned_collapses_not_owned_into_not_found() {
        let resource = Some(TestResource { owner: 1 });
        let result = resource.require_owned(2, "Note 5");
        match result {
            Err(StorageError::NotFound(what)) => assert_eq!(what, "Note 5"),
            other => panic!("expected NotFound, got {:?}", other.is_ok()),
        }
    }

    #[test]
    fn require_owned_reports_absent_the_same_way() {
        let resource: Option<TestResource> = None;
        assert!(matches!(
            resource.require_owned(1, "Note 5"),
            Err(StorageError::NotFound(_))
        ));
    }
}
