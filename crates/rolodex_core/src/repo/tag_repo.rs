//! Tag repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Load/save tags by natural key `(entity_id, entity_type, name)`.
//! - Answer per-entity and cadence-tracking queries.
//!
//! # Invariants
//! - At most one tag exists per natural key; `save_tag` upserts by key.
//! - Results are ordered by natural key.

use crate::model::tag::{EntityId, Tag, TagKey, TaggedEntityType};
use crate::repo::error::{RepoError, RepoResult};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Storage contract for tags.
pub trait TagRepository {
    fn save_tag(&self, tag: &Tag) -> RepoResult<()>;
    fn get_tag(&self, key: &TagKey) -> RepoResult<Option<Tag>>;
    fn list_for_entity(
        &self,
        entity_id: EntityId,
        entity_type: TaggedEntityType,
    ) -> RepoResult<Vec<Tag>>;
    /// Tags with a configured cadence; staleness is derived by the caller.
    fn list_cadence_tags(&self) -> RepoResult<Vec<Tag>>;

    /// Loads a tag that must exist.
    ///
    /// # Errors
    /// - `TagNotFound` when no tag has `key`.
    fn require_tag(&self, key: &TagKey) -> RepoResult<Tag> {
        self.get_tag(key)?
            .ok_or_else(|| RepoError::TagNotFound(key.clone()))
    }
}

/// Process-local tag store.
#[derive(Debug, Default)]
pub struct InMemoryTagRepository {
    rows: RwLock<BTreeMap<TagKey, Tag>>,
}

impl InMemoryTagRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, BTreeMap<TagKey, Tag>>> {
        self.rows
            .read()
            .map_err(|_| RepoError::Backend("tag store lock poisoned".to_string()))
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, BTreeMap<TagKey, Tag>>> {
        self.rows
            .write()
            .map_err(|_| RepoError::Backend("tag store lock poisoned".to_string()))
    }
}

impl TagRepository for InMemoryTagRepository {
    fn save_tag(&self, tag: &Tag) -> RepoResult<()> {
        self.write()?.insert(tag.key.clone(), tag.clone());
        Ok(())
    }

    fn get_tag(&self, key: &TagKey) -> RepoResult<Option<Tag>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn list_for_entity(
        &self,
        entity_id: EntityId,
        entity_type: TaggedEntityType,
    ) -> RepoResult<Vec<Tag>> {
        Ok(self
            .read()?
            .values()
            .filter(|tag| tag.key.entity_id == entity_id && tag.key.entity_type == entity_type)
            .cloned()
            .collect())
    }

    fn list_cadence_tags(&self) -> RepoResult<Vec<Tag>> {
        Ok(self
            .read()?
            .values()
            .filter(|tag| tag.cadence.is_tracking())
            .cloned()
            .collect())
    }
}

impl<R: TagRepository + ?Sized> TagRepository for &R {
    fn save_tag(&self, tag: &Tag) -> RepoResult<()> {
        (**self).save_tag(tag)
    }

    fn get_tag(&self, key: &TagKey) -> RepoResult<Option<Tag>> {
        (**self).get_tag(key)
    }

    fn list_for_entity(
        &self,
        entity_id: EntityId,
        entity_type: TaggedEntityType,
    ) -> RepoResult<Vec<Tag>> {
        (**self).list_for_entity(entity_id, entity_type)
    }

    fn list_cadence_tags(&self) -> RepoResult<Vec<Tag>> {
        (**self).list_cadence_tags()
    }
}

#[cfg(test)]
mod tests {
    use super::{InMemoryTagRepository, TagRepository};
    use crate::model::tag::{Tag, TagKey, TaggedEntityType};
    use crate::repo::error::RepoError;
    use crate::time::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    #[test]
    fn require_tag_reports_missing_key() {
        let repo = InMemoryTagRepository::new();
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let entity = Uuid::new_v4();
        let key = TagKey::new(entity, TaggedEntityType::Contact, "family").unwrap();
        let tag = Tag::new(key.clone(), &clock);
        repo.save_tag(&tag).unwrap();

        assert_eq!(repo.require_tag(&key), Ok(tag));

        let missing = TagKey::new(entity, TaggedEntityType::Contact, "work").unwrap();
        assert_eq!(
            (&repo).require_tag(&missing),
            Err(RepoError::TagNotFound(missing))
        );
    }
}
