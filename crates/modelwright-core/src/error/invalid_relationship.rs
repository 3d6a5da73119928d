use super::Error;

/// Error when a relationship cannot be created as requested.
///
/// This occurs when:
/// - The principal type has no primary key to reference
/// - The number of foreign key properties differs from the principal key
/// - A foreign key property is not visible on the dependent type
#[derive(Debug)]
pub(super) struct InvalidRelationship {
    message: Box<str>,
}

impl std::error::Error for InvalidRelationship {}

impl core::fmt::Display for InvalidRelationship {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid relationship: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid relationship error.
    pub fn invalid_relationship(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidRelationship(InvalidRelationship {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid relationship error.
    pub fn is_invalid_relationship(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidRelationship(_))
    }
}
