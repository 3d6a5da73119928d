use super::{Builder, PropertyBuilder};
use crate::annotation::AnnotationName;
use crate::metadata::{EntityTypeId, ForeignKeyId, IndexId, KeyId, PropertyId, Type, Value};
use crate::provenance::ConfigSource;
use crate::Result;

/// Configures one entity type at one precedence level.
///
/// Conventions obtain one through [`Builder::entity`] with
/// [`ConfigSource::Convention`].
#[derive(Debug)]
pub struct EntityTypeBuilder<'a> {
    builder: &'a mut Builder,
    id: EntityTypeId,
    source: ConfigSource,
}

impl<'a> EntityTypeBuilder<'a> {
    pub(super) fn new(builder: &'a mut Builder, id: EntityTypeId, source: ConfigSource) -> Self {
        EntityTypeBuilder {
            builder,
            id,
            source,
        }
    }

    pub fn id(&self) -> EntityTypeId {
        self.id
    }

    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// The builder this scope borrows from.
    pub fn builder(&mut self) -> &mut Builder {
        self.builder
    }

    pub fn property(&mut self, name: &str, ty: Type) -> Option<PropertyBuilder<'_>> {
        let id = self
            .builder
            .add_property(self.id, name, ty, false, self.source)?;
        Some(self.builder.property(id, self.source))
    }

    pub fn shadow_property(&mut self, name: &str, ty: Type) -> Option<PropertyBuilder<'_>> {
        let id = self
            .builder
            .add_property(self.id, name, ty, true, self.source)?;
        Some(self.builder.property(id, self.source))
    }

    pub fn base_type(&mut self, base: Option<EntityTypeId>) -> Result<bool> {
        self.builder.set_base_type(self.id, base, self.source)
    }

    pub fn container_name(&mut self, name: Option<&str>) -> bool {
        self.builder.set_container_name(self.id, name, self.source)
    }

    pub fn primary_key(&mut self, properties: Option<&[PropertyId]>) -> bool {
        self.builder.set_primary_key(self.id, properties, self.source)
    }

    pub fn key(&mut self, properties: &[PropertyId]) -> Option<KeyId> {
        self.builder.add_key(self.id, properties, self.source)
    }

    pub fn index(&mut self, properties: &[PropertyId]) -> Option<IndexId> {
        self.builder.add_index(self.id, properties, self.source)
    }

    pub fn references(
        &mut self,
        principal: EntityTypeId,
        properties: Option<&[PropertyId]>,
    ) -> Result<ForeignKeyId> {
        self.builder
            .add_foreign_key(self.id, principal, properties, self.source)
    }

    pub fn discriminator(&mut self, name: Option<&str>, ty: Option<Type>) -> Option<PropertyId> {
        self.builder.has_discriminator(self.id, name, ty, self.source)
    }

    pub fn discriminator_property(&mut self, property: Option<PropertyId>) -> bool {
        self.builder
            .set_discriminator_property(self.id, property, self.source)
    }

    pub fn discriminator_value(&mut self, value: Option<Value>) -> Result<bool> {
        self.builder
            .set_discriminator_value(self.id, value, self.source)
    }

    pub fn annotation(&mut self, name: impl Into<AnnotationName>, value: Option<Value>) -> bool {
        self.builder
            .set_annotation(self.id, name.into(), value, self.source)
    }

    pub fn remove(self) -> bool {
        self.builder.remove_entity_type(self.id, self.source)
    }
}
