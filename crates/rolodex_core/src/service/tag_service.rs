//! Tag cadence use-case service.
//!
//! # Responsibility
//! - Create tags by natural key and manage their contact cadence.
//! - Advance cadence clocks when an entity records an interaction.
//! - Report stale tags with their overdue day counts.
//!
//! # Invariants
//! - Staleness is always evaluated against one clock reading per call.
//! - Interactions only touch tags that have a cadence configured.

use crate::model::tag::{EntityId, Tag, TagKey, TaggedEntityType};
use crate::repo::tag_repo::TagRepository;
use crate::service::error::ServiceResult;
use crate::time::clock::Clock;
use crate::time::temporal::TemporalValue;
use log::info;

/// A tag whose cadence has lapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleTag {
    pub tag: Tag,
    /// Whole days past the configured frequency; always >= 1.
    pub staleness_days: u32,
}

/// Tag service facade over a repository and a clock.
pub struct TagService<R: TagRepository, C: Clock> {
    repo: R,
    clock: C,
}

impl<R: TagRepository, C: Clock> TagService<R, C> {
    pub fn new(repo: R, clock: C) -> Self {
        Self { repo, clock }
    }

    /// Returns the tag for a natural key, creating an untracked one if absent.
    pub fn ensure_tag(
        &self,
        entity_id: EntityId,
        entity_type: TaggedEntityType,
        name: &str,
    ) -> ServiceResult<Tag> {
        let key = TagKey::new(entity_id, entity_type, name)?;
        if let Some(existing) = self.repo.get_tag(&key)? {
            return Ok(existing);
        }

        let tag = Tag::new(key, &self.clock);
        self.repo.save_tag(&tag)?;
        info!(
            "event=tag_create module=service status=ok tag_id={} entity_type={}",
            tag.id,
            tag.key.entity_type.as_str()
        );
        Ok(tag)
    }

    pub fn get_tag(&self, key: &TagKey) -> ServiceResult<Option<Tag>> {
        Ok(self.repo.get_tag(key)?)
    }

    /// Enables (restarting the clock) or disables cadence tracking.
    pub fn set_frequency(&self, key: &TagKey, days: Option<i64>) -> ServiceResult<Tag> {
        let mut tag = self.load(key)?;
        tag.set_frequency(days, &self.clock)?;
        self.repo.save_tag(&tag)?;
        info!(
            "event=tag_set_frequency module=service status=ok tag_id={} frequency_days={}",
            tag.id,
            tag.cadence
                .frequency_days()
                .map_or_else(|| "none".to_string(), |days| days.to_string())
        );
        Ok(tag)
    }

    /// Sets `last_contact` to `timestamp`, or now when omitted.
    pub fn update_last_contact(
        &self,
        key: &TagKey,
        timestamp: Option<TemporalValue>,
    ) -> ServiceResult<Tag> {
        let mut tag = self.load(key)?;
        tag.update_last_contact(timestamp, &self.clock)?;
        self.repo.save_tag(&tag)?;
        Ok(tag)
    }

    /// Advances every cadence-tracking tag of an entity to the interaction date.
    ///
    /// Returns how many tags were updated.
    pub fn record_interaction(
        &self,
        entity_id: EntityId,
        entity_type: TaggedEntityType,
        interaction_date: TemporalValue,
    ) -> ServiceResult<usize> {
        let interaction_date = interaction_date.require_utc("interaction_date")?;
        let mut updated = 0;
        for mut tag in self.repo.list_for_entity(entity_id, entity_type)? {
            if tag.record_interaction(interaction_date, &self.clock) {
                self.repo.save_tag(&tag)?;
                updated += 1;
            }
        }

        info!(
            "event=tag_record_interaction module=service status=ok entity_id={} entity_type={} updated={}",
            entity_id,
            entity_type.as_str(),
            updated
        );
        Ok(updated)
    }

    /// Days past cadence for one tag; `None` when not stale.
    pub fn staleness_days(&self, key: &TagKey) -> ServiceResult<Option<u32>> {
        Ok(self.load(key)?.cadence.staleness_days(&self.clock))
    }

    /// All stale tags, most overdue first, ties broken by natural key.
    pub fn list_stale(&self) -> ServiceResult<Vec<StaleTag>> {
        let now = self.clock.now();
        let mut stale = self
            .repo
            .list_cadence_tags()?
            .into_iter()
            .filter_map(|tag| {
                tag.cadence
                    .staleness_days_at(now)
                    .map(|staleness_days| StaleTag {
                        tag,
                        staleness_days,
                    })
            })
            .collect::<Vec<_>>();
        stale.sort_by(|left, right| {
            right
                .staleness_days
                .cmp(&left.staleness_days)
                .then_with(|| left.tag.key.cmp(&right.tag.key))
        });
        Ok(stale)
    }

    fn load(&self, key: &TagKey) -> ServiceResult<Tag> {
        Ok(self.repo.require_tag(key)?)
    }
}
