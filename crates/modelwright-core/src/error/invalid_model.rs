use super::Error;
use crate::Violation;

/// Error when finalization finds structural violations in the model.
///
/// Every violation found is reported, the validator never stops at the first
/// one.
#[derive(Debug)]
pub(super) struct InvalidModel {
    violations: Vec<Violation>,
}

impl InvalidModel {
    pub(super) fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

impl std::error::Error for InvalidModel {}

impl core::fmt::Display for InvalidModel {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match self.violations.len() {
            1 => f.write_str("invalid model: 1 violation")?,
            n => write!(f, "invalid model: {n} violations")?,
        }

        for violation in &self.violations {
            write!(f, "\n  - {violation}")?;
        }

        Ok(())
    }
}

impl Error {
    /// Creates an invalid model error carrying every violation found during
    /// finalization.
    pub fn invalid_model(violations: Vec<Violation>) -> Error {
        Error::from(super::ErrorKind::InvalidModel(InvalidModel { violations }))
    }

    /// Returns `true` if this error is an invalid model error.
    pub fn is_invalid_model(&self) -> bool {
        matches!(self.root().kind(), super::ErrorKind::InvalidModel(_))
    }
}
