use modelwright_core::metadata::{EntityTypeId, Model, PropertyId};
use modelwright_core::{Aspect, Builder, ConfigSource, Convention, Event, Flow};

use heck::ToSnakeCase;

/// Discovers the primary key of root entity types from a property named
/// `Id` or `<Type>Id`, ignoring case and word separators.
///
/// Derived types share the key of their root, so a convention-level key on
/// a type that gains a base is removed.
#[derive(Debug, Default)]
pub struct KeyDiscoveryConvention;

impl KeyDiscoveryConvention {
    fn discover(&self, builder: &mut Builder, entity: EntityTypeId) {
        let model = builder.model();
        let entity_type = model.entity_type(entity);

        if !entity_type.is_root() {
            let by_convention =
                model.config_source(entity, Aspect::PrimaryKey) == Some(ConfigSource::Convention);

            if entity_type.primary_key().is_some() && by_convention {
                builder
                    .entity(entity, ConfigSource::Convention)
                    .primary_key(None);
            }
            return;
        }

        if entity_type.primary_key().is_some() {
            return;
        }

        if let Some(property) = find_key_property(model, entity) {
            builder
                .entity(entity, ConfigSource::Convention)
                .primary_key(Some(&[property][..]));
        }
    }
}

impl Convention for KeyDiscoveryConvention {
    fn name(&self) -> &'static str {
        "key_discovery"
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        let entity = match *event {
            Event::EntityTypeAdded { entity } | Event::BaseTypeChanged { entity, .. } => entity,
            Event::PropertyAdded { property } => {
                builder.model().property(property).declaring_entity_type()
            }
            _ => return Flow::Continue,
        };

        self.discover(builder, entity);
        Flow::Continue
    }
}

/// `id` wins over `<type>_id`. Ambiguous matches discover nothing.
fn find_key_property(model: &Model, entity: EntityTypeId) -> Option<PropertyId> {
    let entity_type = model.entity_type(entity);
    let type_key = format!("{}_id", entity_type.short_name().to_snake_case());

    let candidates = |expected: &str| {
        let matches: Vec<_> = entity_type
            .declared_properties()
            .iter()
            .copied()
            .filter(|property| model.property(*property).name().to_snake_case() == expected)
            .collect();

        match matches[..] {
            [property] => Some(property),
            _ => None,
        }
    };

    candidates("id").or_else(|| candidates(&type_key))
}
