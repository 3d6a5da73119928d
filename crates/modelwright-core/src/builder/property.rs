use super::Builder;
use crate::annotation::AnnotationName;
use crate::metadata::{
    AfterSave, EntityTypeId, PropertyId, Type, Value, ValueGenerated, ValueGenerator,
};
use crate::provenance::{Aspect, ConfigSource, Target};
use crate::Event;

use tracing::debug;

/// Configures one property at one precedence level.
#[derive(Debug)]
pub struct PropertyBuilder<'a> {
    builder: &'a mut Builder,
    id: PropertyId,
    source: ConfigSource,
}

impl Builder {
    pub fn property(&mut self, id: PropertyId, source: ConfigSource) -> PropertyBuilder<'_> {
        PropertyBuilder {
            builder: self,
            id,
            source,
        }
    }

    /// Gets or adds the property `name` on `entity`.
    ///
    /// Properties inherited from an ancestor are returned as is. Returns
    /// `None` if an existing property has a different type that `source`
    /// may not change.
    pub fn add_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        ty: Type,
        shadow: bool,
        source: ConfigSource,
    ) -> Option<PropertyId> {
        if let Some(existing) = self.model.find_property(entity, name) {
            let id = existing.id();
            let declared_ty = existing.ty();
            let was_shadow = existing.is_shadow();

            if declared_ty != ty {
                self.write(id, Aspect::Type, source, ty, |model| {
                    &mut model.property_mut(id).ty
                })?;
            }

            if was_shadow && !shadow {
                self.model.property_mut(id).shadow = false;
                self.model.bump();
            }

            self.claim(id, Aspect::Existence, source);
            return Some(id);
        }

        let id = self.model.insert_property(entity, name, ty, shadow);
        self.claim(id, Aspect::Existence, source);
        self.claim(id, Aspect::Type, source);

        debug!(
            entity_type = %self.model.entity_type(entity).name(),
            property = name,
            %ty,
            shadow,
            %source,
            "property added"
        );

        self.notify(Event::PropertyAdded { property: id });
        Some(id)
    }

    /// Removes a property. Rejected while a key or relationship uses it;
    /// indexes over the property are removed with it.
    pub fn remove_property(&mut self, id: PropertyId, source: ConfigSource) -> bool {
        let Some(property) = self.model.get_property(id) else {
            return false;
        };

        if !self.can_set(id, Aspect::Existence, source) {
            return false;
        }

        let used_by_key = self
            .model
            .keys()
            .any(|key| key.properties().contains(&id));
        let used_by_foreign_key = self
            .model
            .foreign_keys()
            .any(|fk| fk.properties().contains(&id));

        if used_by_key || used_by_foreign_key {
            return false;
        }

        let entity = property.declaring_entity_type();

        self.batch(|builder| {
            if builder.model.entity_type(entity).declared_discriminator_property() == Some(id) {
                builder.model.entity_type_mut(entity).discriminator_property = None;
                builder.model.bump();
                builder.invalidate_discriminator_values(entity);
                builder.notify(Event::DiscriminatorPropertyChanged {
                    entity,
                    previous: Some(id),
                });
            }

            let indices: Vec<_> = builder
                .model
                .indices()
                .filter(|index| index.properties().contains(&id))
                .map(|index| (index.id(), index.declaring_entity_type(), index.properties().to_vec()))
                .collect();

            let Some(removed) = builder.model.remove_property(id) else {
                return;
            };

            for (index, entity, properties) in indices {
                builder.notify(Event::IndexRemoved {
                    entity,
                    index,
                    properties,
                });
            }

            debug!(property = removed.name(), %source, "property removed");

            builder.notify(Event::PropertyRemoved {
                entity,
                property: id,
                name: removed.name,
            });
        });

        true
    }

    /// Sets whether the property accepts null. Primary key properties are
    /// never nullable.
    pub fn set_nullable(&mut self, id: PropertyId, nullable: bool, source: ConfigSource) -> bool {
        if !self.model.contains(Target::Property(id)) {
            return false;
        }

        if nullable && self.is_primary_key_property(id) {
            return false;
        }

        match self.write(id, Aspect::Nullable, source, nullable, |model| {
            &mut model.property_mut(id).nullable
        }) {
            Some(true) => {
                self.notify(Event::PropertyNullabilityChanged { property: id });
                true
            }
            Some(false) => true,
            None => false,
        }
    }

    pub fn set_value_generated(
        &mut self,
        id: PropertyId,
        value_generated: ValueGenerated,
        source: ConfigSource,
    ) -> bool {
        self.model.contains(Target::Property(id))
            && self
                .write(id, Aspect::ValueGenerated, source, value_generated, |model| {
                    &mut model.property_mut(id).value_generated
                })
                .is_some()
    }

    pub fn set_after_save(&mut self, id: PropertyId, after_save: AfterSave, source: ConfigSource) -> bool {
        self.model.contains(Target::Property(id))
            && self
                .write(id, Aspect::AfterSave, source, after_save, |model| {
                    &mut model.property_mut(id).after_save
                })
                .is_some()
    }

    pub fn set_value_generator(
        &mut self,
        id: PropertyId,
        generator: Option<ValueGenerator>,
        source: ConfigSource,
    ) -> bool {
        self.model.contains(Target::Property(id))
            && self
                .write(id, Aspect::ValueGenerator, source, generator, |model| {
                    &mut model.property_mut(id).generator
                })
                .is_some()
    }

    fn is_primary_key_property(&self, id: PropertyId) -> bool {
        self.model.entity_types().any(|entity_type| {
            entity_type
                .primary_key()
                .is_some_and(|key| self.model.key(key).properties().contains(&id))
        })
    }
}

impl PropertyBuilder<'_> {
    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn source(&self) -> ConfigSource {
        self.source
    }

    pub fn nullable(&mut self, nullable: bool) -> bool {
        self.builder.set_nullable(self.id, nullable, self.source)
    }

    pub fn value_generated(&mut self, value_generated: ValueGenerated) -> bool {
        self.builder
            .set_value_generated(self.id, value_generated, self.source)
    }

    pub fn after_save(&mut self, after_save: AfterSave) -> bool {
        self.builder.set_after_save(self.id, after_save, self.source)
    }

    pub fn value_generator(&mut self, generator: Option<ValueGenerator>) -> bool {
        self.builder.set_value_generator(self.id, generator, self.source)
    }

    pub fn annotation(&mut self, name: impl Into<AnnotationName>, value: impl Into<Value>) -> bool {
        let value = value.into();
        let value = (!value.is_null()).then_some(value);
        self.builder
            .set_annotation(self.id, name.into(), value, self.source)
    }

    pub fn remove(self) -> bool {
        self.builder.remove_property(self.id, self.source)
    }
}
