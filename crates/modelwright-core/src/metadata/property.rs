use super::{EntityTypeId, Type};
use crate::annotation::{AnnotationName, Annotations};
use crate::Value;
use std::fmt;

#[derive(Debug, Clone)]
pub struct Property {
    pub(crate) id: PropertyId,

    /// The entity type declaring the property
    pub(crate) declaring: EntityTypeId,

    pub(crate) name: String,

    pub(crate) ty: Type,

    pub(crate) nullable: bool,

    /// True if the property exists in the model but not on the application
    /// type.
    pub(crate) shadow: bool,

    /// When the store assigns a value to the property
    pub(crate) value_generated: ValueGenerated,

    /// What happens to modifications once the record was saved
    pub(crate) after_save: AfterSave,

    /// Rule producing the value when a record is materialized
    pub(crate) generator: Option<ValueGenerator>,

    pub(crate) annotations: Annotations,
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PropertyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueGenerated {
    #[default]
    Never,
    OnAdd,
    OnAddOrUpdate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AfterSave {
    /// Modifications are written
    #[default]
    Save,

    /// Modifications are silently dropped
    Ignore,

    /// Modifying the value after the first save is an error
    Throw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueGenerator {
    /// Reads the discriminator value configured on the concrete entity type
    Discriminator,
}

impl Property {
    pub(crate) fn new(
        id: PropertyId,
        declaring: EntityTypeId,
        name: String,
        ty: Type,
        shadow: bool,
    ) -> Property {
        Property {
            id,
            declaring,
            name,
            ty,
            nullable: false,
            shadow,
            value_generated: ValueGenerated::Never,
            after_save: AfterSave::Save,
            generator: None,
            annotations: Annotations::default(),
        }
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn declaring_entity_type(&self) -> EntityTypeId {
        self.declaring
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    pub fn nullable(&self) -> bool {
        self.nullable
    }

    pub fn is_shadow(&self) -> bool {
        self.shadow
    }

    pub fn value_generated(&self) -> ValueGenerated {
        self.value_generated
    }

    pub fn after_save(&self) -> AfterSave {
        self.after_save
    }

    pub fn generator(&self) -> Option<ValueGenerator> {
        self.generator
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn annotation(&self, name: &AnnotationName) -> Option<&Value> {
        self.annotations.get(name)
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "PropertyId({})", self.0)
    }
}
