use super::Builder;
use crate::metadata::{AfterSave, EntityTypeId, PropertyId, Type, Value, ValueGenerator};
use crate::provenance::{Aspect, AspectId, ConfigSource, Target};
use crate::{Error, Event, Result};

use tracing::debug;

impl Builder {
    /// Sets or clears the discriminator property of a root entity type.
    ///
    /// The property must be declared on `entity`. Values in the hierarchy
    /// that no longer fit are invalidated. A replaced shadow property that
    /// nothing else uses is removed.
    pub fn set_discriminator_property(
        &mut self,
        entity: EntityTypeId,
        property: Option<PropertyId>,
        source: ConfigSource,
    ) -> bool {
        let Some(entity_type) = self.model.get_entity_type(entity) else {
            return false;
        };

        if let Some(property) = property {
            let declared_here = self
                .model
                .get_property(property)
                .is_some_and(|p| p.declaring_entity_type() == entity);

            if !entity_type.is_root() || !declared_here {
                return false;
            }
        }

        let previous = entity_type.declared_discriminator_property();

        if !self.claim(entity, Aspect::DiscriminatorProperty, source) {
            return false;
        }

        if previous == property {
            return true;
        }

        self.batch(|builder| {
            builder.model.entity_type_mut(entity).discriminator_property = property;
            builder.model.bump();
            builder.invalidate_discriminator_values(entity);

            if let Some(property) = property {
                builder.model.property_mut(property).generator = Some(ValueGenerator::Discriminator);
                builder.claim(property, Aspect::ValueGenerator, source);
            }

            if let Some(previous) = previous {
                builder.release_discriminator_property(previous, source);
            }

            debug!(
                entity_type = %builder.model.entity_type(entity).name(),
                ?previous,
                ?property,
                %source,
                "discriminator property changed"
            );

            builder.notify(Event::DiscriminatorPropertyChanged { entity, previous });
        });

        true
    }

    /// Gets or creates the discriminator property of a root entity type.
    ///
    /// The property is required, generated from the concrete type's
    /// discriminator value, and may not change once saved. Missing `name` and
    /// `ty` default to the current discriminator, then to the configured
    /// discriminator name and `String`.
    pub fn has_discriminator(
        &mut self,
        entity: EntityTypeId,
        name: Option<&str>,
        ty: Option<Type>,
        source: ConfigSource,
    ) -> Option<PropertyId> {
        let entity_type = self.model.get_entity_type(entity)?;

        if !entity_type.is_root() {
            return None;
        }

        let current = entity_type
            .declared_discriminator_property()
            .map(|id| self.model.property(id));

        if let Some(current) = current {
            let same_name = name.map_or(true, |name| name == current.name());
            let same_ty = ty.map_or(true, |ty| ty == current.ty());

            if same_name && same_ty {
                let id = current.id();
                self.claim(entity, Aspect::DiscriminatorProperty, source);
                return Some(id);
            }
        }

        if !self.can_set(entity, Aspect::DiscriminatorProperty, source) {
            return None;
        }

        let name = name
            .or(current.map(|p| p.name()))
            .unwrap_or(self.options.get_discriminator_name())
            .to_string();

        let ty = ty
            .or_else(|| self.model.find_property(entity, &name).map(|p| p.ty()))
            .or(current.map(|p| p.ty()))
            .unwrap_or(Type::String);

        self.batch(|builder| {
            let property = builder.add_property(entity, &name, ty, true, source)?;

            builder.set_nullable(property, false, source);
            builder.set_after_save(property, AfterSave::Throw, source);

            builder
                .set_discriminator_property(entity, Some(property), source)
                .then_some(property)
        })
    }

    /// Sets the discriminator value of `entity`.
    ///
    /// Fails when the hierarchy has no discriminator property or the value
    /// does not fit its type. Returns `Ok(false)` when the value was
    /// configured at a higher level.
    pub fn set_discriminator_value(
        &mut self,
        entity: EntityTypeId,
        value: Option<Value>,
        source: ConfigSource,
    ) -> Result<bool> {
        if let Some(value) = &value {
            let name = self.model.entity_type(entity).name();

            let Some(property) = self.model.discriminator_property(entity) else {
                return Err(Error::invalid_discriminator(
                    name,
                    "the hierarchy has no discriminator property",
                ));
            };

            if !property.ty().is_compatible(value) {
                return Err(Error::invalid_discriminator(
                    name,
                    format!("value `{value}` is not compatible with `{}`", property.ty()),
                ));
            }
        }

        Ok(self
            .write(entity, Aspect::DiscriminatorValue, source, value, |model| {
                &mut model.entity_type_mut(entity).discriminator_value
            })
            .is_some())
    }

    /// Clears the discriminator values, and their provenance, that no longer
    /// fit after the discriminator of `entity` changed.
    ///
    /// A root without a discriminator loses the values of its whole
    /// hierarchy. Otherwise only values incompatible with the discriminator
    /// now in effect are cleared, so configured values survive re-parenting.
    pub(super) fn invalidate_discriminator_values(&mut self, entity: EntityTypeId) {
        let is_root = self.model.entity_type(entity).is_root();
        let ty = self.model.discriminator_property(entity).map(|p| p.ty());

        for id in self.model.hierarchy(entity) {
            let keep = match (ty, self.model.entity_type(id).discriminator_value()) {
                (_, None) => continue,
                (Some(ty), Some(value)) => ty.is_compatible(value),
                (None, Some(_)) => !is_root,
            };

            if keep {
                continue;
            }

            self.model
                .ledger
                .reset(&AspectId::new(id, Aspect::DiscriminatorValue));
            self.model.entity_type_mut(id).discriminator_value = None;
            self.model.bump();
        }
    }

    /// A property stops being the discriminator. Unused shadow properties are
    /// removed, others lose their generator.
    fn release_discriminator_property(&mut self, property: PropertyId, source: ConfigSource) {
        let Some(existing) = self.model.get_property(property) else {
            return;
        };

        let removable = existing.is_shadow()
            && !self.model.is_referenced(property)
            && self.can_set(property, Aspect::Existence, source);

        if removable && self.remove_property(property, source) {
            return;
        }

        if self.model.contains(Target::Property(property)) {
            self.model.property_mut(property).generator = None;
            self.model
                .ledger
                .reset(&AspectId::new(property, Aspect::ValueGenerator));
            self.model.bump();
        }
    }
}
