use crate::annotation::AnnotationName;
use crate::metadata::{
    EntityTypeId, ForeignKeyId, IndexId, KeyId, Model, PropertyId, TypeName, Value,
};
use crate::provenance::Target;

/// A structural change to the model, delivered to conventions.
///
/// Events for removals carry what handlers need to know about the removed
/// object, since it no longer exists in the model when they run.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    ModelInitialized,

    EntityTypeAdded {
        entity: EntityTypeId,
    },

    EntityTypeRemoved {
        entity: EntityTypeId,
        name: TypeName,
        /// Base type the removed type had
        base: Option<EntityTypeId>,
    },

    BaseTypeChanged {
        entity: EntityTypeId,
        old_base: Option<EntityTypeId>,
    },

    PropertyAdded {
        property: PropertyId,
    },

    PropertyRemoved {
        entity: EntityTypeId,
        property: PropertyId,
        name: String,
    },

    PropertyNullabilityChanged {
        property: PropertyId,
    },

    KeyAdded {
        key: KeyId,
    },

    KeyRemoved {
        entity: EntityTypeId,
        key: KeyId,
        properties: Vec<PropertyId>,
    },

    PrimaryKeyChanged {
        entity: EntityTypeId,
        previous: Option<KeyId>,
    },

    IndexAdded {
        index: IndexId,
    },

    IndexRemoved {
        entity: EntityTypeId,
        index: IndexId,
        properties: Vec<PropertyId>,
    },

    ForeignKeyAdded {
        foreign_key: ForeignKeyId,
    },

    ForeignKeyRemoved {
        dependent: EntityTypeId,
        principal: EntityTypeId,
        foreign_key: ForeignKeyId,
        properties: Vec<PropertyId>,
    },

    ForeignKeyPropertiesChanged {
        foreign_key: ForeignKeyId,
        previous: Vec<PropertyId>,
    },

    DiscriminatorPropertyChanged {
        entity: EntityTypeId,
        previous: Option<PropertyId>,
    },

    AnnotationChanged {
        target: Target,
        name: AnnotationName,
        previous: Option<Value>,
    },

    ModelFinalizing,
}

/// The registry slot an [`Event`] is dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    ModelInitialized,
    EntityTypeAdded,
    EntityTypeRemoved,
    BaseTypeChanged,
    PropertyAdded,
    PropertyRemoved,
    PropertyNullabilityChanged,
    KeyAdded,
    KeyRemoved,
    PrimaryKeyChanged,
    IndexAdded,
    IndexRemoved,
    ForeignKeyAdded,
    ForeignKeyRemoved,
    ForeignKeyPropertiesChanged,
    DiscriminatorPropertyChanged,
    AnnotationChanged,
    ModelFinalizing,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::ModelInitialized => EventKind::ModelInitialized,
            Event::EntityTypeAdded { .. } => EventKind::EntityTypeAdded,
            Event::EntityTypeRemoved { .. } => EventKind::EntityTypeRemoved,
            Event::BaseTypeChanged { .. } => EventKind::BaseTypeChanged,
            Event::PropertyAdded { .. } => EventKind::PropertyAdded,
            Event::PropertyRemoved { .. } => EventKind::PropertyRemoved,
            Event::PropertyNullabilityChanged { .. } => EventKind::PropertyNullabilityChanged,
            Event::KeyAdded { .. } => EventKind::KeyAdded,
            Event::KeyRemoved { .. } => EventKind::KeyRemoved,
            Event::PrimaryKeyChanged { .. } => EventKind::PrimaryKeyChanged,
            Event::IndexAdded { .. } => EventKind::IndexAdded,
            Event::IndexRemoved { .. } => EventKind::IndexRemoved,
            Event::ForeignKeyAdded { .. } => EventKind::ForeignKeyAdded,
            Event::ForeignKeyRemoved { .. } => EventKind::ForeignKeyRemoved,
            Event::ForeignKeyPropertiesChanged { .. } => EventKind::ForeignKeyPropertiesChanged,
            Event::DiscriminatorPropertyChanged { .. } => EventKind::DiscriminatorPropertyChanged,
            Event::AnnotationChanged { .. } => EventKind::AnnotationChanged,
            Event::ModelFinalizing => EventKind::ModelFinalizing,
        }
    }

    /// Returns `true` while the subject of the event is still part of the
    /// model. Handlers are not run for events whose subject was removed by an
    /// earlier handler.
    pub fn is_live(&self, model: &Model) -> bool {
        match self {
            Event::ModelInitialized | Event::ModelFinalizing | Event::EntityTypeRemoved { .. } => {
                true
            }
            Event::EntityTypeAdded { entity }
            | Event::BaseTypeChanged { entity, .. }
            | Event::PropertyRemoved { entity, .. }
            | Event::KeyRemoved { entity, .. }
            | Event::PrimaryKeyChanged { entity, .. }
            | Event::IndexRemoved { entity, .. }
            | Event::DiscriminatorPropertyChanged { entity, .. } => {
                model.contains(Target::EntityType(*entity))
            }
            Event::ForeignKeyRemoved { dependent, .. } => {
                model.contains(Target::EntityType(*dependent))
            }
            Event::PropertyAdded { property } | Event::PropertyNullabilityChanged { property } => {
                model.contains(Target::Property(*property))
            }
            Event::KeyAdded { key } => model.contains(Target::Key(*key)),
            Event::IndexAdded { index } => model.contains(Target::Index(*index)),
            Event::ForeignKeyAdded { foreign_key }
            | Event::ForeignKeyPropertiesChanged { foreign_key, .. } => {
                model.contains(Target::ForeignKey(*foreign_key))
            }
            Event::AnnotationChanged { target, .. } => model.contains(*target),
        }
    }
}
