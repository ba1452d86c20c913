//! Tag entity and contact-cadence staleness model.
//!
//! # Responsibility
//! - Identify tags by natural key `(entity_id, entity_type, name)`.
//! - Track an optional contact cadence and derive staleness from it.
//!
//! # Invariants
//! - Tag names are trimmed, stripped of a leading `#`, and lowercased.
//! - `frequency_days`, when set, lies in `1..=365`.
//! - Disabling the cadence clears `last_contact`; a contact recorded while
//!   untracked is kept and survives serialization.
//! - Staleness is measured in whole elapsed days; a same-day contact is never
//!   stale, even at frequency 1.

use crate::error::{DomainError, DomainResult};
use crate::time::clock::Clock;
use crate::time::temporal::{whole_days_between, TemporalValue};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Smallest accepted cadence in days.
pub const MIN_FREQUENCY_DAYS: u32 = 1;
/// Largest accepted cadence in days.
pub const MAX_FREQUENCY_DAYS: u32 = 365;

/// Stable storage identifier of a tag.
pub type TagId = Uuid;
/// Identifier of the tagged entity (contact, note or statement).
pub type EntityId = Uuid;

/// Kind of entity a tag is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaggedEntityType {
    Contact,
    Note,
    Statement,
}

impl TaggedEntityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Contact => "contact",
            Self::Note => "note",
            Self::Statement => "statement",
        }
    }
}

impl FromStr for TaggedEntityType {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "contact" => Ok(Self::Contact),
            "note" => Ok(Self::Note),
            "statement" => Ok(Self::Statement),
            _ => Err(DomainError::InvalidEntityType(value.to_string())),
        }
    }
}

/// Natural key identifying a tag independent of its storage id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "TagKeyRecord", into = "TagKeyRecord")]
pub struct TagKey {
    pub entity_id: EntityId,
    pub entity_type: TaggedEntityType,
    pub name: String,
}

/// Serialized shape; deserialization re-normalizes the name.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TagKeyRecord {
    entity_id: EntityId,
    entity_type: TaggedEntityType,
    name: String,
}

impl TagKey {
    /// Builds a key with a normalized tag name.
    ///
    /// # Errors
    /// - `EmptyTagName` when nothing remains after normalization.
    pub fn new(
        entity_id: EntityId,
        entity_type: TaggedEntityType,
        name: &str,
    ) -> DomainResult<Self> {
        let name = normalize_tag_name(name).ok_or(DomainError::EmptyTagName)?;
        Ok(Self {
            entity_id,
            entity_type,
            name,
        })
    }
}

impl TryFrom<TagKeyRecord> for TagKey {
    type Error = DomainError;

    fn try_from(value: TagKeyRecord) -> Result<Self, Self::Error> {
        Self::new(value.entity_id, value.entity_type, &value.name)
    }
}

impl From<TagKey> for TagKeyRecord {
    fn from(value: TagKey) -> Self {
        Self {
            entity_id: value.entity_id,
            entity_type: value.entity_type,
            name: value.name,
        }
    }
}

impl Display for TagKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}#{}",
            self.entity_type.as_str(),
            self.entity_id,
            self.name
        )
    }
}

/// Normalizes one hashtag-style name; `None` when it is blank.
pub fn normalize_tag_name(name: &str) -> Option<String> {
    let trimmed = name.trim().trim_start_matches('#').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Optional contact cadence attached to a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TagCadenceRecord", into = "TagCadenceRecord")]
pub struct TagCadence {
    frequency_days: Option<u32>,
    last_contact: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct TagCadenceRecord {
    frequency_days: Option<i64>,
    last_contact: Option<DateTime<Utc>>,
}

impl TagCadence {
    /// Cadence with tracking disabled.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn frequency_days(&self) -> Option<u32> {
        self.frequency_days
    }

    pub fn last_contact(&self) -> Option<DateTime<Utc>> {
        self.last_contact
    }

    /// Whether a cadence is configured.
    pub fn is_tracking(&self) -> bool {
        self.frequency_days.is_some()
    }

    /// Sets or clears the cadence.
    ///
    /// A concrete value restarts the clock: `last_contact` becomes now.
    /// `None` disables tracking and clears `last_contact`.
    ///
    /// # Errors
    /// - `InvalidFrequency` when `days` is outside `1..=365`.
    pub fn set_frequency(&mut self, days: Option<i64>, clock: &impl Clock) -> DomainResult<()> {
        match days {
            Some(days) => {
                self.frequency_days = Some(validate_frequency(days)?);
                self.last_contact = Some(clock.now());
            }
            None => {
                self.frequency_days = None;
                self.last_contact = None;
            }
        }
        Ok(())
    }

    /// Records a contact at `timestamp`, or now when omitted.
    ///
    /// # Errors
    /// - `NaiveDatetime { field: "last_contact" }` for an offset-less timestamp.
    pub fn update_last_contact(
        &mut self,
        timestamp: Option<TemporalValue>,
        clock: &impl Clock,
    ) -> DomainResult<()> {
        let instant = match timestamp {
            Some(value) => value.require_utc("last_contact")?,
            None => clock.now(),
        };
        self.last_contact = Some(instant);
        Ok(())
    }

    /// Whole days elapsed since the last contact, when one is recorded.
    pub fn days_since_last_contact(&self, now: DateTime<Utc>) -> Option<i64> {
        self.last_contact
            .map(|last_contact| whole_days_between(last_contact, now))
    }

    pub fn is_stale(&self, clock: &impl Clock) -> bool {
        self.is_stale_at(clock.now())
    }

    pub fn staleness_days(&self, clock: &impl Clock) -> Option<u32> {
        self.staleness_days_at(clock.now())
    }

    /// `is_stale` against an explicit reference instant.
    pub fn is_stale_at(&self, now: DateTime<Utc>) -> bool {
        self.staleness_days_at(now).is_some()
    }

    /// Days past the cadence at `now`; `None` unless strictly overdue.
    pub fn staleness_days_at(&self, now: DateTime<Utc>) -> Option<u32> {
        let frequency = i64::from(self.frequency_days?);
        let overdue = self.days_since_last_contact(now)? - frequency;
        if overdue > 0 {
            u32::try_from(overdue).ok()
        } else {
            None
        }
    }
}

fn validate_frequency(days: i64) -> DomainResult<u32> {
    u32::try_from(days)
        .ok()
        .filter(|value| (MIN_FREQUENCY_DAYS..=MAX_FREQUENCY_DAYS).contains(value))
        .ok_or(DomainError::InvalidFrequency {
            value: days,
            min: MIN_FREQUENCY_DAYS,
            max: MAX_FREQUENCY_DAYS,
        })
}

impl TryFrom<TagCadenceRecord> for TagCadence {
    type Error = DomainError;

    fn try_from(value: TagCadenceRecord) -> Result<Self, Self::Error> {
        let frequency_days = value.frequency_days.map(validate_frequency).transpose()?;
        Ok(Self {
            frequency_days,
            last_contact: value.last_contact,
        })
    }
}

impl From<TagCadence> for TagCadenceRecord {
    fn from(value: TagCadence) -> Self {
        Self {
            frequency_days: value.frequency_days.map(i64::from),
            last_contact: value.last_contact,
        }
    }
}

/// Hashtag attached to one entity, optionally carrying a contact cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub key: TagKey,
    pub cadence: TagCadence,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tag {
    /// Creates an untracked tag with a generated id.
    pub fn new(key: TagKey, clock: &impl Clock) -> Self {
        let now = clock.now();
        Self {
            id: Uuid::new_v4(),
            key,
            cadence: TagCadence::disabled(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn name(&self) -> &str {
        &self.key.name
    }

    /// See `TagCadence::set_frequency`; also touches `updated_at`.
    pub fn set_frequency(&mut self, days: Option<i64>, clock: &impl Clock) -> DomainResult<()> {
        self.cadence.set_frequency(days, clock)?;
        self.updated_at = clock.now();
        Ok(())
    }

    /// See `TagCadence::update_last_contact`; also touches `updated_at`.
    pub fn update_last_contact(
        &mut self,
        timestamp: Option<TemporalValue>,
        clock: &impl Clock,
    ) -> DomainResult<()> {
        self.cadence.update_last_contact(timestamp, clock)?;
        self.updated_at = clock.now();
        Ok(())
    }

    /// Advances `last_contact` to an interaction date when tracking is on.
    ///
    /// Returns whether the tag changed. Untracked tags are left untouched.
    pub fn record_interaction(
        &mut self,
        interaction_date: DateTime<Utc>,
        clock: &impl Clock,
    ) -> bool {
        if !self.cadence.is_tracking() {
            return false;
        }
        self.cadence.last_contact = Some(interaction_date);
        self.updated_at = clock.now();
        true
    }
}
