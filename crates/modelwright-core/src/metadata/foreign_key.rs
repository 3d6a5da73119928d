use super::{EntityTypeId, KeyId, PropertyId};
use crate::annotation::Annotations;
use std::fmt;

/// A relationship: the dependent's foreign key properties reference the
/// principal's key.
#[derive(Debug, Clone)]
pub struct ForeignKey {
    pub(crate) id: ForeignKeyId,

    /// The entity type holding the foreign key properties
    pub(crate) dependent: EntityTypeId,

    /// The referenced entity type
    pub(crate) principal: EntityTypeId,

    /// The referenced key, declared on the principal's root
    pub(crate) principal_key: KeyId,

    /// Foreign key properties on the dependent. Empty until discovered.
    pub(crate) properties: Vec<PropertyId>,

    pub(crate) annotations: Annotations,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ForeignKeyId(pub usize);

impl ForeignKey {
    pub fn id(&self) -> ForeignKeyId {
        self.id
    }

    pub fn dependent(&self) -> EntityTypeId {
        self.dependent
    }

    pub fn principal(&self) -> EntityTypeId {
        self.principal
    }

    pub fn principal_key(&self) -> KeyId {
        self.principal_key
    }

    pub fn properties(&self) -> &[PropertyId] {
        &self.properties
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}

impl fmt::Debug for ForeignKeyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "ForeignKeyId({})", self.0)
    }
}
