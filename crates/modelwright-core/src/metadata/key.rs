use super::{EntityTypeId, PropertyId};
use crate::annotation::Annotations;
use std::fmt;

/// A set of properties uniquely identifying a record.
#[derive(Debug, Clone)]
pub struct Key {
    pub(crate) id: KeyId,

    pub(crate) declaring: EntityTypeId,

    /// Properties composing the key, in order
    pub(crate) properties: Vec<PropertyId>,

    pub(crate) annotations: Annotations,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyId(pub usize);

impl Key {
    pub fn id(&self) -> KeyId {
        self.id
    }

    pub fn declaring_entity_type(&self) -> EntityTypeId {
        self.declaring
    }

    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Debug for KeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "KeyId({})", self.0)
    }
}
