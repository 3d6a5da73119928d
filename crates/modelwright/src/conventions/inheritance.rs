use modelwright_core::metadata::{EntityTypeId, Value};
use modelwright_core::{Aspect, Builder, ConfigSource, Convention, Event, Flow};

use tracing::debug;

/// Maps every hierarchy to a single container told apart by a discriminator.
///
/// A root with derived types owns a required shadow discriminator property.
/// Every type in the hierarchy gets its short type name as discriminator
/// value unless one was configured at a higher level. A root that loses its
/// last derived type loses the discriminator again.
#[derive(Debug, Default)]
pub struct InheritanceDiscriminatorConvention;

const SOURCE: ConfigSource = ConfigSource::Convention;

impl InheritanceDiscriminatorConvention {
    fn base_type_changed(
        &self,
        builder: &mut Builder,
        entity: EntityTypeId,
        old_base: Option<EntityTypeId>,
    ) {
        if let Some(old_base) = old_base {
            self.collapse_if_alone(builder, old_base);
        }

        let model = builder.model();
        let entity_type = model.entity_type(entity);

        let Some(base) = entity_type.base() else {
            if model.has_derived_types(entity) {
                if self.ensure_discriminator(builder, entity) {
                    self.set_default_values(builder, entity);
                }
            } else {
                self.collapse(builder, entity);
            }
            return;
        };

        if entity_type.declared_discriminator_property().is_some()
            && !builder
                .entity(entity, SOURCE)
                .discriminator_property(None)
        {
            builder.report_rejected(
                self.name(),
                entity,
                Aspect::DiscriminatorProperty,
                "derived type keeps a discriminator property configured at a higher level",
            );
            return;
        }

        let root = builder.model().root_of(entity);

        if !self.ensure_discriminator(builder, root) {
            return;
        }

        if base == root {
            self.set_default_value(builder, root);
        }

        self.set_default_values(builder, entity);
    }

    /// Clears the discriminator of `entity` if it is a root without derived
    /// types.
    fn collapse_if_alone(&self, builder: &mut Builder, entity: EntityTypeId) {
        let model = builder.model();

        let Some(entity_type) = model.get_entity_type(entity) else {
            return;
        };

        if entity_type.is_root() && !model.has_derived_types(entity) {
            self.collapse(builder, entity);
        }
    }

    fn collapse(&self, builder: &mut Builder, entity: EntityTypeId) {
        let entity_type = builder.model().entity_type(entity);
        let has_property = entity_type.declared_discriminator_property().is_some();
        let has_value = entity_type.discriminator_value().is_some();

        if has_property {
            debug!(entity_type = ?entity, "hierarchy collapsed; removing discriminator");

            if !builder.entity(entity, SOURCE).discriminator_property(None) {
                builder.report_rejected(
                    self.name(),
                    entity,
                    Aspect::DiscriminatorProperty,
                    "type without derived types keeps a discriminator property configured at a higher level",
                );
            }
        }

        if has_value {
            match builder.entity(entity, SOURCE).discriminator_value(None) {
                Ok(true) => {}
                Ok(false) => {
                    debug!(entity_type = ?entity, "discriminator value configured at a higher level kept")
                }
                Err(err) => debug!(entity_type = ?entity, %err, "discriminator value not cleared"),
            }
        }
    }

    /// Makes sure the root has a discriminator property. Returns `false` if
    /// higher-precedence configuration prevents one.
    fn ensure_discriminator(&self, builder: &mut Builder, root: EntityTypeId) -> bool {
        if builder.model().discriminator_property(root).is_some() {
            return true;
        }

        let created = builder.entity(root, SOURCE).discriminator(None, None).is_some();

        if !created {
            builder.report_rejected(
                self.name(),
                root,
                Aspect::DiscriminatorProperty,
                "hierarchy root refuses a discriminator property",
            );
        }

        created
    }

    /// Sets the default discriminator value on `entity` and every type
    /// deriving from it.
    fn set_default_values(&self, builder: &mut Builder, entity: EntityTypeId) {
        for id in builder.model().hierarchy(entity) {
            self.set_default_value(builder, id);
        }
    }

    fn set_default_value(&self, builder: &mut Builder, entity: EntityTypeId) {
        let value = Value::from(builder.model().entity_type(entity).short_name());

        // A value that does not fit a configured discriminator type is left
        // for explicit configuration; the validator reports it if missing.
        if let Err(err) = builder.entity(entity, SOURCE).discriminator_value(Some(value)) {
            debug!(entity_type = ?entity, %err, "default discriminator value skipped");
        }
    }
}

impl Convention for InheritanceDiscriminatorConvention {
    fn name(&self) -> &'static str {
        "inheritance_discriminator"
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        match *event {
            Event::BaseTypeChanged { entity, old_base } => {
                self.base_type_changed(builder, entity, old_base);
            }
            Event::DiscriminatorPropertyChanged { entity, .. } => {
                let model = builder.model();
                let entity_type = model.entity_type(entity);

                if entity_type.is_root() && entity_type.declared_discriminator_property().is_some() {
                    self.set_default_values(builder, entity);
                }
            }
            Event::EntityTypeRemoved {
                base: Some(base), ..
            } => {
                self.collapse_if_alone(builder, base);
            }
            _ => {}
        }

        Flow::Continue
    }
}
