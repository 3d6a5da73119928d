//! The default convention catalog.
//!
//! [`default_conventions`] registers every convention below in the order the
//! model builder expects. Callers assembling their own [`ConventionSet`] can
//! register a subset, or remove entries by name.

mod container_name;
pub use container_name::ContainerNameConvention;

mod foreign_key_index;
pub use foreign_key_index::ForeignKeyIndexConvention;

mod foreign_key_properties;
pub use foreign_key_properties::ForeignKeyPropertyDiscoveryConvention;

mod inheritance;
pub use inheritance::InheritanceDiscriminatorConvention;

mod key_discovery;
pub use key_discovery::KeyDiscoveryConvention;

mod root_binding;
pub use root_binding::RootBindingDiscoveryConvention;

mod value_generation;
pub use value_generation::ValueGenerationConvention;

use crate::RootBindings;
use modelwright_core::{ConventionSet, EventKind};

use std::rc::Rc;

/// Builds the default catalog. `bindings` feeds root binding discovery and
/// root container names.
pub fn default_conventions(bindings: RootBindings) -> ConventionSet {
    use EventKind::*;

    let bindings = Rc::new(bindings);
    let mut set = ConventionSet::new();

    set.register(
        &[ModelInitialized],
        RootBindingDiscoveryConvention::new(bindings.clone()),
    )
    .register(
        &[EntityTypeAdded, BaseTypeChanged],
        ContainerNameConvention::new(bindings),
    )
    .register(
        &[EntityTypeAdded, BaseTypeChanged, PropertyAdded],
        KeyDiscoveryConvention,
    )
    .register(&[PrimaryKeyChanged, KeyRemoved], ValueGenerationConvention)
    .register(
        &[BaseTypeChanged, DiscriminatorPropertyChanged, EntityTypeRemoved],
        InheritanceDiscriminatorConvention,
    );

    // Foreign key properties must exist before they can be indexed, and the
    // index goes before the properties it covers are removed.
    set.add(ForeignKeyAdded, ForeignKeyPropertyDiscoveryConvention)
        .register(
            &[ForeignKeyAdded, ForeignKeyPropertiesChanged, KeyAdded, ForeignKeyRemoved],
            ForeignKeyIndexConvention,
        )
        .add(ForeignKeyRemoved, ForeignKeyPropertyDiscoveryConvention);

    set
}
