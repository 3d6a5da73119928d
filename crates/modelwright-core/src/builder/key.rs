use super::Builder;
use crate::metadata::{EntityTypeId, ForeignKeyId, IndexId, KeyId, PropertyId};
use crate::provenance::{Aspect, ConfigSource, Target};
use crate::{Error, Event, Result};

use tracing::debug;

impl Builder {
    /// Sets or clears the primary key of a root entity type.
    ///
    /// The key is reused when one over the same properties exists. Key
    /// properties become required. The previous primary key is removed when
    /// no relationship references it.
    pub fn set_primary_key(
        &mut self,
        entity: EntityTypeId,
        properties: Option<&[PropertyId]>,
        source: ConfigSource,
    ) -> bool {
        if !self.model.contains(Target::EntityType(entity)) {
            return false;
        }

        if let Some(properties) = properties {
            if !self.model.entity_type(entity).is_root() || !self.are_visible(entity, properties) {
                return false;
            }
        }

        if !self.can_set(entity, Aspect::PrimaryKey, source) {
            return false;
        }

        let previous = self.model.entity_type(entity).primary_key();
        let unchanged = match (previous, properties) {
            (Some(key), Some(properties)) => self.model.key(key).properties() == properties,
            (None, None) => true,
            _ => false,
        };

        if unchanged {
            self.claim(entity, Aspect::PrimaryKey, source);
            return true;
        }

        self.batch(|builder| {
            builder.claim(entity, Aspect::PrimaryKey, source);

            let key = properties.and_then(|properties| {
                for property in properties {
                    builder.model.property_mut(*property).nullable = false;
                }
                builder.add_key(entity, properties, source)
            });

            builder.model.entity_type_mut(entity).primary_key = key;
            builder.model.bump();

            if let Some(previous) = previous {
                let referenced = builder
                    .model
                    .foreign_keys()
                    .any(|fk| fk.principal_key() == previous);

                if !referenced {
                    builder.remove_key(previous, source);
                }
            }

            debug!(entity_type = ?entity, ?previous, ?key, %source, "primary key changed");
            builder.notify(Event::PrimaryKeyChanged { entity, previous });
        });

        true
    }

    /// Gets or adds a key over `properties`.
    pub fn add_key(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
        source: ConfigSource,
    ) -> Option<KeyId> {
        if !self.are_visible(entity, properties) {
            return None;
        }

        let existing = self
            .model
            .entity_type(entity)
            .keys()
            .iter()
            .copied()
            .find(|key| self.model.key(*key).properties() == properties);

        if let Some(key) = existing {
            self.claim(key, Aspect::Existence, source);
            return Some(key);
        }

        let key = self.model.insert_key(entity, properties.to_vec());
        self.claim(key, Aspect::Existence, source);
        self.notify(Event::KeyAdded { key });
        Some(key)
    }

    /// Removes a key that no relationship references. Removing the primary
    /// key also requires `source` to override the primary key configuration.
    pub fn remove_key(&mut self, key: KeyId, source: ConfigSource) -> bool {
        let Some(existing) = self.model.get_key(key) else {
            return false;
        };
        let entity = existing.declaring_entity_type();

        if !self.can_set(key, Aspect::Existence, source)
            || self.model.foreign_keys().any(|fk| fk.principal_key() == key)
        {
            return false;
        }

        let is_primary = self.model.entity_type(entity).primary_key() == Some(key);
        if is_primary && !self.can_set(entity, Aspect::PrimaryKey, source) {
            return false;
        }

        let Some(removed) = self.model.remove_key(key) else {
            return false;
        };

        self.batch(|builder| {
            builder.notify(Event::KeyRemoved {
                entity,
                key,
                properties: removed.properties,
            });

            if is_primary {
                builder.notify(Event::PrimaryKeyChanged {
                    entity,
                    previous: Some(key),
                });
            }
        });

        true
    }

    /// Gets or adds an index over `properties`.
    pub fn add_index(
        &mut self,
        entity: EntityTypeId,
        properties: &[PropertyId],
        source: ConfigSource,
    ) -> Option<IndexId> {
        if !self.are_visible(entity, properties) {
            return None;
        }

        let existing = self
            .model
            .entity_type(entity)
            .indices()
            .iter()
            .copied()
            .find(|index| self.model.index(*index).properties() == properties);

        if let Some(index) = existing {
            self.claim(index, Aspect::Existence, source);
            return Some(index);
        }

        let index = self.model.insert_index(entity, properties.to_vec());
        self.claim(index, Aspect::Existence, source);
        self.notify(Event::IndexAdded { index });
        Some(index)
    }

    pub fn remove_index(&mut self, index: IndexId, source: ConfigSource) -> bool {
        if !self.model.contains(Target::Index(index))
            || !self.can_set(index, Aspect::Existence, source)
        {
            return false;
        }

        let Some(removed) = self.model.remove_index(index) else {
            return false;
        };

        self.notify(Event::IndexRemoved {
            entity: removed.declaring,
            index,
            properties: removed.properties,
        });

        true
    }

    pub fn set_index_unique(&mut self, index: IndexId, unique: bool, source: ConfigSource) -> bool {
        self.model.contains(Target::Index(index))
            && self
                .write(index, Aspect::Unique, source, unique, |model| {
                    &mut model.index_mut(index).unique
                })
                .is_some()
    }

    /// Adds a relationship from `dependent` to the primary key of
    /// `principal`.
    ///
    /// Without `properties`, the foreign key properties are left for the
    /// conventions to discover.
    pub fn add_foreign_key(
        &mut self,
        dependent: EntityTypeId,
        principal: EntityTypeId,
        properties: Option<&[PropertyId]>,
        source: ConfigSource,
    ) -> Result<ForeignKeyId> {
        let Some(principal_key) = self.model.primary_key(principal) else {
            return Err(Error::invalid_relationship(format!(
                "principal `{}` has no primary key",
                self.model.entity_type(principal).name()
            )));
        };

        let principal_key_id = principal_key.id();
        let key_len = principal_key.properties().len();

        if let Some(properties) = properties {
            self.check_foreign_key_properties(dependent, key_len, properties)?;
        }

        let fk = self.model.insert_foreign_key(
            dependent,
            principal,
            principal_key_id,
            properties.map(<[_]>::to_vec).unwrap_or_default(),
        );
        self.claim(fk, Aspect::Existence, source);

        if properties.is_some() {
            self.claim(fk, Aspect::ForeignKeyProperties, source);
        }

        debug!(
            dependent = %self.model.entity_type(dependent).name(),
            principal = %self.model.entity_type(principal).name(),
            %source,
            "foreign key added"
        );

        self.notify(Event::ForeignKeyAdded { foreign_key: fk });
        Ok(fk)
    }

    /// Replaces the dependent properties of a relationship.
    pub fn set_foreign_key_properties(
        &mut self,
        fk: ForeignKeyId,
        properties: &[PropertyId],
        source: ConfigSource,
    ) -> bool {
        let Some(foreign_key) = self.model.get_foreign_key(fk) else {
            return false;
        };

        let dependent = foreign_key.dependent();
        let key_len = self.model.key(foreign_key.principal_key()).properties().len();
        let previous = foreign_key.properties().to_vec();

        if self
            .check_foreign_key_properties(dependent, key_len, properties)
            .is_err()
        {
            return false;
        }

        match self.write(
            fk,
            Aspect::ForeignKeyProperties,
            source,
            properties.to_vec(),
            |model| &mut model.foreign_key_mut(fk).properties,
        ) {
            Some(true) => {
                self.notify(Event::ForeignKeyPropertiesChanged {
                    foreign_key: fk,
                    previous,
                });
                true
            }
            Some(false) => true,
            None => false,
        }
    }

    pub fn remove_foreign_key(&mut self, fk: ForeignKeyId, source: ConfigSource) -> bool {
        if !self.model.contains(Target::ForeignKey(fk))
            || !self.can_set(fk, Aspect::Existence, source)
        {
            return false;
        }

        self.drop_foreign_key(fk);
        true
    }

    /// Removes a relationship regardless of provenance.
    pub(super) fn drop_foreign_key(&mut self, fk: ForeignKeyId) {
        let Some(removed) = self.model.remove_foreign_key(fk) else {
            return;
        };

        self.notify(Event::ForeignKeyRemoved {
            dependent: removed.dependent,
            principal: removed.principal,
            foreign_key: fk,
            properties: removed.properties,
        });
    }

    fn check_foreign_key_properties(
        &self,
        dependent: EntityTypeId,
        key_len: usize,
        properties: &[PropertyId],
    ) -> Result<()> {
        if properties.len() != key_len {
            return Err(Error::invalid_relationship(format!(
                "expected {key_len} foreign key properties, got {}",
                properties.len()
            )));
        }

        if !self.are_visible(dependent, properties) {
            return Err(Error::invalid_relationship(format!(
                "foreign key properties are not declared on `{}`",
                self.model.entity_type(dependent).name()
            )));
        }

        Ok(())
    }

    fn are_visible(&self, entity: EntityTypeId, properties: &[PropertyId]) -> bool {
        !properties.is_empty()
            && properties
                .iter()
                .all(|property| self.model.is_visible(entity, *property))
    }
}
