use super::{EntityTypeId, PropertyId};
use crate::annotation::Annotations;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Index {
    pub(crate) id: IndexId,

    pub(crate) declaring: EntityTypeId,

    /// Properties included in the index, in order
    pub(crate) properties: Vec<PropertyId>,

    /// When `true`, indexed entries are unique
    pub(crate) unique: bool,

    pub(crate) annotations: Annotations,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexId(pub usize);

impl Index {
    pub fn id(&self) -> IndexId {
        self.id
    }

    pub fn declaring_entity_type(&self) -> EntityTypeId {
        self.declaring
    }

    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    /// Returns `true` if the index can serve lookups on `properties`, that
    /// is, `properties` is a prefix of the indexed properties.
    pub fn covers(&self, properties: &[PropertyId]) -> bool {
        !properties.is_empty() && self.properties.starts_with(properties)
    }
}

impl fmt::Debug for IndexId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "IndexId({})", self.0)
    }
}
