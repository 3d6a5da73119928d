use crate::{Builder, EntityTypeBuilder};
use modelwright_core::metadata::EntityTypeId;
use modelwright_core::{err, ConfigSource, ConventionSet, Error, Model, Options, Result};

/// Builds a model from explicit configuration and the conventions.
///
/// Entity types are addressed by type name. Every call is made at
/// [`ConfigSource::Explicit`] unless the entity type builder was switched to
/// the data annotation level.
#[derive(Debug)]
pub struct ModelBuilder {
    core: modelwright_core::Builder,
}

impl ModelBuilder {
    /// A model builder running the default conventions.
    pub fn new() -> ModelBuilder {
        Builder::default().build()
    }

    /// Configure the model builder before it starts
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn with_options(options: Options) -> ModelBuilder {
        Builder::default().options(options).build()
    }

    pub fn with_conventions(conventions: ConventionSet) -> ModelBuilder {
        Builder::default().conventions(conventions).build()
    }

    pub(crate) fn from_core(core: modelwright_core::Builder) -> ModelBuilder {
        ModelBuilder { core }
    }

    pub fn model(&self) -> &Model {
        self.core.model()
    }

    /// The underlying builder, for configuration by id and at arbitrary
    /// levels.
    pub fn core(&mut self) -> &mut modelwright_core::Builder {
        &mut self.core
    }

    /// Gets or adds the entity type `name` and returns a builder for it.
    pub fn entity(&mut self, name: &str) -> EntityTypeBuilder<'_> {
        let id = self
            .core
            .add_entity_type(name, ConfigSource::Explicit)
            .expect("explicit configuration overrides every removal");
        EntityTypeBuilder::new(&mut self.core, id, ConfigSource::Explicit)
    }

    /// Like [`entity`](Self::entity), at the data annotation level. Fails if
    /// the type was explicitly removed.
    pub fn annotated_entity(&mut self, name: &str) -> Result<EntityTypeBuilder<'_>> {
        let id = self
            .core
            .add_entity_type(name, ConfigSource::DataAnnotation)
            .ok_or_else(|| err!("entity type `{name}` was removed explicitly"))?;
        Ok(EntityTypeBuilder::new(
            &mut self.core,
            id,
            ConfigSource::DataAnnotation,
        ))
    }

    pub fn find_entity(&self, name: &str) -> Option<EntityTypeId> {
        self.model().find_entity_type(name).map(|et| et.id())
    }

    /// Removes the entity type `name`.
    pub fn remove_entity(&mut self, name: &str) -> Result<bool> {
        let id = self
            .find_entity(name)
            .ok_or_else(|| Error::unknown_member("entity type", name))?;
        Ok(self.core.remove_entity_type(id, ConfigSource::Explicit))
    }

    /// Runs every convention over the whole model again and returns the
    /// number of changes made.
    pub fn rerun_conventions(&mut self) -> u64 {
        self.core.rerun_conventions()
    }

    /// Validates the model and returns the read-only snapshot.
    pub fn finalize(self) -> Result<Model> {
        self.core.finalize()
    }
}

impl Default for ModelBuilder {
    fn default() -> ModelBuilder {
        ModelBuilder::new()
    }
}
