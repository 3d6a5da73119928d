use super::{ForeignKeyId, IndexId, KeyId, PropertyId, TypeName, Value};
use crate::annotation::{AnnotationName, Annotations};
use std::fmt;

/// One mapped application type.
#[derive(Debug, Clone)]
pub struct EntityType {
    pub(crate) id: EntityTypeId,

    /// Identity of the application type
    pub(crate) name: TypeName,

    /// Non-owning reference to the base type, if any
    pub(crate) base: Option<EntityTypeId>,

    /// Properties declared on this type, in declaration order. Inherited
    /// properties are declared on an ancestor.
    pub(crate) properties: Vec<PropertyId>,

    pub(crate) keys: Vec<KeyId>,

    pub(crate) primary_key: Option<KeyId>,

    pub(crate) indices: Vec<IndexId>,

    /// Relationships where this type is the dependent
    pub(crate) foreign_keys: Vec<ForeignKeyId>,

    /// Configured container name. Only meaningful on roots; resolution goes
    /// through [`Model::container_name`](super::Model::container_name).
    pub(crate) container_name: Option<String>,

    pub(crate) discriminator_property: Option<PropertyId>,

    pub(crate) discriminator_value: Option<Value>,

    pub(crate) annotations: Annotations,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EntityTypeId(pub usize);

impl EntityType {
    pub(crate) fn new(id: EntityTypeId, name: TypeName) -> EntityType {
        EntityType {
            id,
            name,
            base: None,
            properties: vec![],
            keys: vec![],
            primary_key: None,
            indices: vec![],
            foreign_keys: vec![],
            container_name: None,
            discriminator_property: None,
            discriminator_value: None,
            annotations: Annotations::default(),
        }
    }

    pub fn id(&self) -> EntityTypeId {
        self.id
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn short_name(&self) -> &str {
        self.name.short_name()
    }

    pub fn base(&self) -> Option<EntityTypeId> {
        self.base
    }

    /// Returns true if this type has no base type.
    pub fn is_root(&self) -> bool {
        self.base.is_none()
    }

    /// Properties declared directly on this type.
    pub fn declared_properties(&self) -> &[PropertyId] {
        &self.properties
    }

    pub fn keys(&self) -> &[KeyId] {
        &self.keys
    }

    pub fn primary_key(&self) -> Option<KeyId> {
        self.primary_key
    }

    pub fn indices(&self) -> &[IndexId] {
        &self.indices
    }

    pub fn foreign_keys(&self) -> &[ForeignKeyId] {
        &self.foreign_keys
    }

    /// The container name configured on this type, ignoring inheritance and
    /// defaults.
    pub fn configured_container_name(&self) -> Option<&str> {
        self.container_name.as_deref()
    }

    /// The discriminator property configured on this very type. Use
    /// [`Model::discriminator_property`](super::Model::discriminator_property)
    /// to resolve it through the hierarchy root.
    pub fn declared_discriminator_property(&self) -> Option<PropertyId> {
        self.discriminator_property
    }

    pub fn discriminator_value(&self) -> Option<&Value> {
        self.discriminator_value.as_ref()
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotation(&self, name: &AnnotationName) -> Option<&Value> {
        self.annotations.get(name)
    }
}

impl From<&EntityType> for EntityTypeId {
    fn from(value: &EntityType) -> Self {
        value.id
    }
}

impl fmt::Debug for EntityTypeId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "EntityTypeId({})", self.0)
    }
}
