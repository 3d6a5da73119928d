//! Tracks which precedence level configured each aspect of the model.

use crate::annotation::AnnotationName;
use crate::metadata::{EntityTypeId, ForeignKeyId, IndexId, KeyId, PropertyId};
use indexmap::IndexMap;
use std::fmt;

/// Precedence level of a configuration write, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConfigSource {
    /// Derived automatically by a convention
    Convention,

    /// Declared through an attribute or annotation on the application type
    DataAnnotation,

    /// Set by an explicit builder call
    Explicit,
}

/// The metadata object an aspect belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Model,
    EntityType(EntityTypeId),
    Property(PropertyId),
    Key(KeyId),
    Index(IndexId),
    ForeignKey(ForeignKeyId),
}

/// A configurable aspect of a metadata object.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Aspect {
    /// The object exists in the model
    Existence,
    BaseType,
    ContainerName,
    DiscriminatorProperty,
    DiscriminatorValue,
    PrimaryKey,
    Type,
    Nullable,
    ValueGenerated,
    AfterSave,
    ValueGenerator,
    Unique,
    ForeignKeyProperties,
    Annotation(AnnotationName),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AspectId {
    pub target: Target,
    pub aspect: Aspect,
}

/// Provenance of every configured aspect.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    entries: IndexMap<AspectId, ConfigSource>,
}

impl ConfigSource {
    /// Returns `true` if a write at this level may replace a value set at
    /// `current`. Equal levels overwrite each other.
    pub fn overrides(self, current: Option<ConfigSource>) -> bool {
        match current {
            Some(current) => self >= current,
            None => true,
        }
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigSource::Convention => "convention",
            ConfigSource::DataAnnotation => "data annotation",
            ConfigSource::Explicit => "explicit",
        })
    }
}

impl AspectId {
    pub fn new(target: impl Into<Target>, aspect: Aspect) -> AspectId {
        AspectId {
            target: target.into(),
            aspect,
        }
    }
}

impl Ledger {
    /// The level that last set `aspect`, if any.
    pub fn get(&self, aspect: &AspectId) -> Option<ConfigSource> {
        self.entries.get(aspect).copied()
    }

    /// Checks whether a write at `source` would succeed, without recording
    /// anything.
    pub fn can_set(&self, aspect: &AspectId, source: ConfigSource) -> bool {
        source.overrides(self.get(aspect))
    }

    /// Records `source` as the provenance of `aspect` if it may override the
    /// current provenance. Returns whether the write is allowed.
    pub fn try_set(&mut self, aspect: AspectId, source: ConfigSource) -> bool {
        if !self.can_set(&aspect, source) {
            tracing::trace!(?aspect, %source, "write rejected by higher precedence");
            return false;
        }

        self.entries.insert(aspect, source);
        true
    }

    /// Forgets the provenance of `aspect`, returning it. Used when a value is
    /// cleared so that any level may configure it again.
    pub fn reset(&mut self, aspect: &AspectId) -> Option<ConfigSource> {
        self.entries.shift_remove(aspect)
    }

    /// Forgets every aspect of `target`, after the object left the model.
    pub(crate) fn forget(&mut self, target: Target) {
        self.entries.retain(|aspect, _| aspect.target != target);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<EntityTypeId> for Target {
    fn from(id: EntityTypeId) -> Target {
        Target::EntityType(id)
    }
}

impl From<PropertyId> for Target {
    fn from(id: PropertyId) -> Target {
        Target::Property(id)
    }
}

impl From<KeyId> for Target {
    fn from(id: KeyId) -> Target {
        Target::Key(id)
    }
}

impl From<IndexId> for Target {
    fn from(id: IndexId) -> Target {
        Target::Index(id)
    }
}

impl From<ForeignKeyId> for Target {
    fn from(id: ForeignKeyId) -> Target {
        Target::ForeignKey(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ConfigSource::*;

    fn container_name() -> AspectId {
        AspectId::new(EntityTypeId(0), Aspect::ContainerName)
    }

    #[test]
    fn levels_are_ordered() {
        assert!(Convention < DataAnnotation);
        assert!(DataAnnotation < Explicit);
    }

    #[test]
    fn first_write_always_succeeds() {
        let mut ledger = Ledger::default();
        assert!(ledger.try_set(container_name(), Convention));
        assert_eq!(ledger.get(&container_name()), Some(Convention));
    }

    #[test]
    fn equal_levels_overwrite() {
        let mut ledger = Ledger::default();
        assert!(ledger.try_set(container_name(), DataAnnotation));
        assert!(ledger.try_set(container_name(), DataAnnotation));
    }

    #[test]
    fn lower_level_never_overwrites_higher() {
        let mut ledger = Ledger::default();
        assert!(ledger.try_set(container_name(), Explicit));

        assert!(!ledger.can_set(&container_name(), Convention));
        assert!(!ledger.try_set(container_name(), Convention));
        assert!(!ledger.try_set(container_name(), DataAnnotation));
        assert_eq!(ledger.get(&container_name()), Some(Explicit));
    }

    #[test]
    fn higher_level_raises_provenance() {
        let mut ledger = Ledger::default();
        assert!(ledger.try_set(container_name(), Convention));
        assert!(ledger.try_set(container_name(), Explicit));
        assert_eq!(ledger.get(&container_name()), Some(Explicit));
    }

    #[test]
    fn can_set_does_not_record() {
        let ledger = Ledger::default();
        assert!(ledger.can_set(&container_name(), Convention));
        assert!(ledger.is_empty());
    }

    #[test]
    fn reset_and_forget() {
        let mut ledger = Ledger::default();
        let other = AspectId::new(EntityTypeId(1), Aspect::ContainerName);

        ledger.try_set(container_name(), Explicit);
        ledger.try_set(other.clone(), Explicit);

        assert_eq!(ledger.reset(&container_name()), Some(Explicit));
        assert!(ledger.can_set(&container_name(), Convention));

        ledger.forget(Target::EntityType(EntityTypeId(1)));
        assert!(ledger.is_empty());
    }
}
