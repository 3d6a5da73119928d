use super::Error;

/// Error when a name lookup (entity type, property, ...) finds nothing.
#[derive(Debug)]
pub(super) struct UnknownMember {
    kind: &'static str,
    name: Box<str>,
}

impl std::error::Error for UnknownMember {}

impl core::fmt::Display for UnknownMember {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown {} `{}`", self.kind, self.name)
    }
}

impl Error {
    /// Creates an unknown member error. `kind` names what was looked up, e.g.
    /// `"property"` or `"entity type"`.
    pub fn unknown_member(kind: &'static str, name: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownMember(UnknownMember {
            kind,
            name: name.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown member error.
    pub fn is_unknown_member(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::UnknownMember(_))
    }
}
