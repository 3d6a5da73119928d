use crate::{conventions, ModelBuilder, RootBindings};
use modelwright_core::{ConventionSet, Options, TypeName};

/// Configures a [`ModelBuilder`] before the model is initialized.
#[derive(Debug, Default)]
pub struct Builder {
    options: Options,

    bindings: RootBindings,

    /// Replaces the default convention catalog
    conventions: Option<ConventionSet>,
}

impl Builder {
    pub fn options(&mut self, options: Options) -> &mut Self {
        self.options = options;
        self
    }

    /// Name of the discriminator property created for hierarchies
    pub fn discriminator_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.options.discriminator_name(name);
        self
    }

    /// Bind the application type `ty` to the container `container`
    pub fn root_binding(&mut self, ty: impl Into<TypeName>, container: impl Into<String>) -> &mut Self {
        self.bindings.insert(ty, container);
        self
    }

    pub fn root_bindings(&mut self, bindings: RootBindings) -> &mut Self {
        self.bindings = bindings;
        self
    }

    /// Use `conventions` instead of the default catalog. Root bindings only
    /// take effect through conventions that read them.
    pub fn conventions(&mut self, conventions: ConventionSet) -> &mut Self {
        self.conventions = Some(conventions);
        self
    }

    pub fn build(&self) -> ModelBuilder {
        let conventions = match &self.conventions {
            Some(conventions) => conventions.clone(),
            None => conventions::default_conventions(self.bindings.clone()),
        };

        ModelBuilder::from_core(modelwright_core::Builder::new(
            conventions,
            self.options.clone(),
        ))
    }
}
