use modelwright_core::metadata::{ForeignKeyId, PropertyId};
use modelwright_core::{Aspect, Builder, ConfigSource, Convention, Event, Flow};

use heck::ToUpperCamelCase;
use tracing::debug;

/// Supplies the dependent properties of a relationship configured without
/// them.
///
/// For every principal key property a property named
/// `<Principal><KeyProperty>` is used, e.g. `OrderId`. Missing properties
/// are created as nullable shadow properties and removed again with the
/// relationship.
#[derive(Debug, Default)]
pub struct ForeignKeyPropertyDiscoveryConvention;

impl ForeignKeyPropertyDiscoveryConvention {
    fn discover(&self, builder: &mut Builder, fk: ForeignKeyId) {
        let model = builder.model();
        let foreign_key = model.foreign_key(fk);

        if !foreign_key.properties().is_empty() {
            return;
        }

        let dependent = foreign_key.dependent();
        let principal = model.entity_type(foreign_key.principal()).short_name();

        let wanted: Vec<_> = model
            .key(foreign_key.principal_key())
            .properties()
            .iter()
            .map(|property| {
                let property = model.property(*property);
                let name = format!("{principal}{}", property.name().to_upper_camel_case());
                (name, property.ty())
            })
            .collect();

        let mut properties: Vec<PropertyId> = vec![];

        for (name, ty) in wanted {
            let existing = builder
                .model()
                .find_property(dependent, &name)
                .map(|property| property.id());

            let property = match existing {
                Some(property) => property,
                None => {
                    let mut entity = builder.entity(dependent, ConfigSource::Convention);

                    let Some(mut property) = entity.shadow_property(&name, ty) else {
                        return;
                    };

                    property.nullable(true);
                    property.id()
                }
            };

            properties.push(property);
        }

        debug!(foreign_key = ?fk, ?properties, "foreign key properties discovered");
        builder.set_foreign_key_properties(fk, &properties, ConfigSource::Convention);
    }

    fn remove_unused(&self, builder: &mut Builder, properties: &[PropertyId]) {
        for property in properties {
            let model = builder.model();

            let Some(existing) = model.get_property(*property) else {
                continue;
            };

            let by_convention =
                model.config_source(*property, Aspect::Existence) == Some(ConfigSource::Convention);

            if existing.is_shadow() && by_convention {
                builder
                    .property(*property, ConfigSource::Convention)
                    .remove();
            }
        }
    }
}

impl Convention for ForeignKeyPropertyDiscoveryConvention {
    fn name(&self) -> &'static str {
        "foreign_key_property_discovery"
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        match event {
            Event::ForeignKeyAdded { foreign_key } => self.discover(builder, *foreign_key),
            Event::ForeignKeyRemoved { properties, .. } => self.remove_unused(builder, properties),
            _ => {}
        }

        Flow::Continue
    }
}
