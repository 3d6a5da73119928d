use crate::provenance::{Aspect, ConfigSource, Target};
use std::fmt;

/// A non-fatal finding recorded while the model was built.
///
/// Currently produced when a convention could not apply a change because the
/// aspect was configured at a higher precedence level.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Name of the convention that attempted the change
    pub convention: &'static str,

    pub target: Target,

    pub aspect: Aspect,

    /// The level holding the aspect when the change was rejected
    pub current: Option<ConfigSource>,

    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.convention, self.message)?;

        if let Some(current) = self.current {
            write!(f, " (configured by {current})")?;
        }

        Ok(())
    }
}
