mod bindings;
pub use bindings::RootBindings;

mod builder;
pub use builder::Builder;

pub mod conventions;

mod entity;
pub use entity::EntityTypeBuilder;

mod model_builder;
pub use model_builder::ModelBuilder;

pub use modelwright_core::{
    annotation, convention, metadata, provenance, AnnotationName, Aspect, ConfigSource,
    Convention, ConventionSet, Diagnostic, Error, Event, EventKind, Flow, Model, Options, Result,
    Target, Type, TypeName, Value, Violation,
};
