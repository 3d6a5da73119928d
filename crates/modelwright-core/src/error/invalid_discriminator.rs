use super::Error;
use crate::metadata::TypeName;

/// Error when an explicit discriminator assignment cannot be honored.
///
/// This occurs when:
/// - The hierarchy has no discriminator property
/// - The value's type does not match the discriminator property's type
/// - A discriminator property is requested on a derived type
#[derive(Debug)]
pub(super) struct InvalidDiscriminator {
    entity_type: TypeName,
    message: Box<str>,
}

impl std::error::Error for InvalidDiscriminator {}

impl core::fmt::Display for InvalidDiscriminator {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "invalid discriminator for `{}`: {}",
            self.entity_type, self.message
        )
    }
}

impl Error {
    /// Creates an invalid discriminator error.
    pub fn invalid_discriminator(entity_type: &TypeName, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidDiscriminator(
            InvalidDiscriminator {
                entity_type: entity_type.clone(),
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an invalid discriminator error.
    pub fn is_invalid_discriminator(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidDiscriminator(_))
    }
}
