use modelwright_core::metadata::{EntityTypeId, ForeignKeyId, IndexId, KeyId, Model, PropertyId};
use modelwright_core::{Aspect, Builder, ConfigSource, Convention, Event, Flow};

/// Indexes the dependent properties of every relationship, unless a key or
/// an index over a prefix of its properties already serves lookups.
///
/// Indexes added here are dropped once no relationship needs them or a key
/// covers them.
#[derive(Debug, Default)]
pub struct ForeignKeyIndexConvention;

impl ForeignKeyIndexConvention {
    fn ensure_index(&self, builder: &mut Builder, fk: ForeignKeyId) {
        let model = builder.model();
        let foreign_key = model.foreign_key(fk);
        let dependent = foreign_key.dependent();
        let properties = foreign_key.properties().to_vec();

        if properties.is_empty() || is_covered(model, dependent, &properties) {
            return;
        }

        builder
            .entity(dependent, ConfigSource::Convention)
            .index(&properties);
    }

    /// Drops the convention index over exactly `properties` when no
    /// remaining relationship uses them.
    fn drop_index(&self, builder: &mut Builder, dependent: EntityTypeId, properties: &[PropertyId]) {
        let model = builder.model();

        if properties.is_empty() || !model.contains(dependent.into()) {
            return;
        }

        let still_needed = model
            .foreign_keys()
            .any(|fk| fk.dependent() == dependent && fk.properties() == properties);

        if still_needed {
            return;
        }

        if let Some(index) = convention_index(model, dependent, |index| index == properties) {
            builder.remove_index(index, ConfigSource::Convention);
        }
    }

    /// A new key makes convention indexes over one of its prefixes redundant.
    fn key_added(&self, builder: &mut Builder, key: KeyId) {
        let model = builder.model();
        let key = model.key(key);
        let entity = key.declaring_entity_type();
        let key_properties = key.properties().to_vec();

        while let Some(index) = convention_index(builder.model(), entity, |index| {
            key_properties.starts_with(index)
        }) {
            if !builder.remove_index(index, ConfigSource::Convention) {
                break;
            }
        }
    }
}

impl Convention for ForeignKeyIndexConvention {
    fn name(&self) -> &'static str {
        "foreign_key_index"
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        match event {
            Event::ForeignKeyAdded { foreign_key } => self.ensure_index(builder, *foreign_key),
            Event::ForeignKeyPropertiesChanged {
                foreign_key,
                previous,
            } => {
                let dependent = builder.model().foreign_key(*foreign_key).dependent();
                self.drop_index(builder, dependent, previous);
                self.ensure_index(builder, *foreign_key);
            }
            Event::ForeignKeyRemoved {
                dependent,
                properties,
                ..
            } => self.drop_index(builder, *dependent, properties),
            Event::KeyAdded { key } => self.key_added(builder, *key),
            _ => {}
        }

        Flow::Continue
    }
}

/// Returns `true` if a key or index visible on `entity` starts with
/// `properties`.
fn is_covered(model: &Model, entity: EntityTypeId, properties: &[PropertyId]) -> bool {
    std::iter::once(entity)
        .chain(model.ancestors(entity))
        .map(|id| model.entity_type(id))
        .any(|entity_type| {
            entity_type
                .keys()
                .iter()
                .any(|key| model.key(*key).properties().starts_with(properties))
                || entity_type
                    .indices()
                    .iter()
                    .any(|index| model.index(*index).covers(properties))
        })
}

fn convention_index(
    model: &Model,
    entity: EntityTypeId,
    matches: impl Fn(&[PropertyId]) -> bool,
) -> Option<IndexId> {
    model
        .entity_type(entity)
        .indices()
        .iter()
        .copied()
        .filter(|index| {
            model.config_source(*index, Aspect::Existence) == Some(ConfigSource::Convention)
        })
        .find(|index| matches(model.index(*index).properties()))
}
