use modelwright_core::metadata::{EntityTypeId, PropertyId, Type, ValueGenerated};
use modelwright_core::{Builder, ConfigSource, Convention, Event, Flow};

/// Single-property integer and uuid primary keys are generated by the store
/// when a record is added.
#[derive(Debug, Default)]
pub struct ValueGenerationConvention;

impl ValueGenerationConvention {
    fn primary_key_changed(
        &self,
        builder: &mut Builder,
        entity: EntityTypeId,
        previous: Option<&[PropertyId]>,
    ) {
        let current: Vec<_> = builder
            .model()
            .primary_key(entity)
            .map(|key| key.properties().to_vec())
            .unwrap_or_default();

        for property in previous.unwrap_or_default() {
            if !current.contains(property) {
                self.reset(builder, *property);
            }
        }

        let [property] = current[..] else {
            return;
        };

        let model = builder.model();
        let generated = model.property(property).ty().is_integer()
            || model.property(property).ty() == Type::Uuid;

        // A key property that also references another type takes its value
        // from the principal.
        let is_foreign_key = model
            .foreign_keys()
            .any(|fk| fk.properties().contains(&property));

        let value_generated = if generated && !is_foreign_key {
            ValueGenerated::OnAdd
        } else {
            ValueGenerated::Never
        };

        builder
            .property(property, ConfigSource::Convention)
            .value_generated(value_generated);
    }

    fn reset(&self, builder: &mut Builder, property: PropertyId) {
        let model = builder.model();

        let Some(declaring) = model.get_property(property).map(|p| p.declaring_entity_type()) else {
            return;
        };

        let in_primary_key = model
            .primary_key(declaring)
            .is_some_and(|key| key.properties().contains(&property));

        if !in_primary_key {
            builder
                .property(property, ConfigSource::Convention)
                .value_generated(ValueGenerated::Never);
        }
    }
}

impl Convention for ValueGenerationConvention {
    fn name(&self) -> &'static str {
        "value_generation"
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        match event {
            Event::PrimaryKeyChanged { entity, previous } => {
                let previous = previous
                    .and_then(|key| builder.model().get_key(key))
                    .map(|key| key.properties().to_vec());

                self.primary_key_changed(builder, *entity, previous.as_deref());
            }
            Event::KeyRemoved { properties, .. } => {
                for property in properties {
                    self.reset(builder, *property);
                }
            }
            _ => {}
        }

        Flow::Continue
    }
}
