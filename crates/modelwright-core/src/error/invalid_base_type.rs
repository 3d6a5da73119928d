use super::Error;
use crate::metadata::TypeName;

/// Error when a base type assignment would make a type its own ancestor.
#[derive(Debug)]
pub(super) struct InvalidBaseType {
    entity_type: TypeName,
    base_type: TypeName,
}

impl std::error::Error for InvalidBaseType {}

impl core::fmt::Display for InvalidBaseType {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "cannot set `{}` as the base type of `{}`: `{}` derives from `{}`",
            self.base_type, self.entity_type, self.base_type, self.entity_type
        )
    }
}

impl Error {
    /// Creates an invalid base type error.
    pub fn invalid_base_type(entity_type: &TypeName, base_type: &TypeName) -> Error {
        Error::from(super::ErrorKind::InvalidBaseType(InvalidBaseType {
            entity_type: entity_type.clone(),
            base_type: base_type.clone(),
        }))
    }

    /// Returns `true` if this error is an invalid base type error.
    pub fn is_invalid_base_type(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidBaseType(_))
    }
}
