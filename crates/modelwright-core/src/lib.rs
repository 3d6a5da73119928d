pub mod annotation;
pub use annotation::{AnnotationName, Annotations};

pub mod builder;
pub use builder::Builder;

pub mod convention;
pub use convention::{Convention, ConventionSet, Event, EventKind, Flow};

mod diagnostic;
pub use diagnostic::Diagnostic;

mod error;
pub use error::{Error, IntoError};

pub mod metadata;
pub use metadata::{Model, Type, TypeName, Value};

mod options;
pub use options::Options;

pub mod provenance;
pub use provenance::{Aspect, AspectId, ConfigSource, Target};

mod verify;
pub use verify::Violation;

/// A Result type alias that uses modelwright's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;
