//! Identity and timestamp metadata shared by every entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Identity plus lifecycle timestamps, embedded by value in each entity.
///
/// Invariants:
/// - `updated_at >= created_at`, even if the injected clock moves backwards
/// - `deleted_at` is stamped at most once and never cleared
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMeta<I> {
    id: I,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl<I: Copy> EntityMeta<I> {
    /// Creates metadata for an entity constructed at `now`.
    #[must_use]
    pub const fn new(id: I, now: DateTime<Utc>) -> Self {
        Self {
            id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// The entity identifier.
    #[must_use]
    pub const fn id(&self) -> I {
        self.id
    }

    /// When the entity was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the entity was last mutated.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// When the entity was soft-deleted, if it was.
    #[must_use]
    pub const fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    /// Returns true once the entity has been soft-deleted.
    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Records a mutation at `now`.
    pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }

    /// Records a soft deletion at `now`. Later calls only refresh `updated_at`.
    pub(crate) fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.touch(now);
        if self.deleted_at.is_none() {
            self.deleted_at = Some(self.updated_at);
        }
    }
}

/// An object with identity and continuity across state changes.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + std::hash::Hash + std::fmt::Debug;

    /// Identity and timestamps.
    fn meta(&self) -> &EntityMeta<Self::Id>;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id {
        self.meta().id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_new_sets_equal_timestamps() {
        let meta = EntityMeta::new(1u8, t0());
        assert_eq!(meta.id(), 1);
        assert_eq!(meta.created_at(), meta.updated_at());
        assert!(!meta.is_deleted());
    }

    #[test]
    fn test_touch_moves_forward_only() {
        let mut meta = EntityMeta::new(1u8, t0());
        meta.touch(t0() + Duration::seconds(5));
        assert_eq!(meta.updated_at(), t0() + Duration::seconds(5));

        meta.touch(t0() - Duration::hours(1));
        assert_eq!(meta.updated_at(), t0() + Duration::seconds(5));
        assert!(meta.updated_at() >= meta.created_at());
    }

    #[test]
    fn test_mark_deleted_stamps_once() {
        let mut meta = EntityMeta::new(1u8, t0());
        meta.mark_deleted(t0() + Duration::minutes(1));
        assert_eq!(meta.deleted_at(), Some(t0() + Duration::minutes(1)));

        meta.mark_deleted(t0() + Duration::minutes(9));
        assert_eq!(meta.deleted_at(), Some(t0() + Duration::minutes(1)));
        assert_eq!(meta.updated_at(), t0() + Duration::minutes(9));
    }
}
