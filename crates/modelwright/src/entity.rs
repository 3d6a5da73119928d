use modelwright_core::metadata::{
    EntityTypeId, ForeignKeyId, IndexId, KeyId, PropertyId, Type, Value,
};
use modelwright_core::{err, AnnotationName, Builder, ConfigSource, Error, Result};

/// Configures one entity type by name.
///
/// Name lookups resolve properties declared on the type or inherited from
/// its ancestors, and fail with an unknown member error.
#[derive(Debug)]
pub struct EntityTypeBuilder<'a> {
    core: &'a mut Builder,
    id: EntityTypeId,
    source: ConfigSource,
}

impl<'a> EntityTypeBuilder<'a> {
    pub(crate) fn new(core: &'a mut Builder, id: EntityTypeId, source: ConfigSource) -> Self {
        EntityTypeBuilder { core, id, source }
    }

    /// Apply further configuration at the data annotation level.
    pub fn from_annotation(mut self) -> Self {
        self.source = ConfigSource::DataAnnotation;
        self
    }

    pub fn id(&self) -> EntityTypeId {
        self.id
    }

    /// Gets or adds a property mapped to a member of the application type.
    pub fn property(&mut self, name: &str, ty: Type) -> Result<PropertyId> {
        self.add_property(name, ty, false)
    }

    /// Gets or adds a property that only exists in the model.
    pub fn shadow_property(&mut self, name: &str, ty: Type) -> Result<PropertyId> {
        self.add_property(name, ty, true)
    }

    pub fn nullable(&mut self, property: &str, nullable: bool) -> Result<bool> {
        let property = self.resolve(property)?;
        Ok(self.core.set_nullable(property, nullable, self.source))
    }

    pub fn remove_property(&mut self, property: &str) -> Result<bool> {
        let property = self.resolve(property)?;
        Ok(self.core.remove_property(property, self.source))
    }

    /// Sets the primary key.
    pub fn has_key(&mut self, properties: &[&str]) -> Result<bool> {
        let properties = self.resolve_all(properties)?;

        if !self.is_root() {
            return Err(err!(
                "primary key of `{}` must be configured on its root type",
                self.name()
            ));
        }

        Ok(self
            .core
            .set_primary_key(self.id, Some(&properties), self.source))
    }

    pub fn has_alternate_key(&mut self, properties: &[&str]) -> Result<KeyId> {
        let properties = self.resolve_all(properties)?;
        self.core
            .add_key(self.id, &properties, self.source)
            .ok_or_else(|| err!("failed to add key to `{}`", self.name()))
    }

    pub fn has_index(&mut self, properties: &[&str]) -> Result<IndexId> {
        let properties = self.resolve_all(properties)?;
        self.core
            .add_index(self.id, &properties, self.source)
            .ok_or_else(|| err!("failed to add index to `{}`", self.name()))
    }

    pub fn has_unique_index(&mut self, properties: &[&str]) -> Result<IndexId> {
        let index = self.has_index(properties)?;
        self.core.set_index_unique(index, true, self.source);
        Ok(index)
    }

    /// Derives this type from `base`, adding the base type if needed.
    pub fn base_type(&mut self, base: &str) -> Result<bool> {
        let base = self.core.add_entity_type(base, self.source).ok_or_else(|| {
            err!("base type `{base}` was removed at a higher level than {}", self.source)
        })?;
        self.core.set_base_type(self.id, Some(base), self.source)
    }

    pub fn no_base_type(&mut self) -> Result<bool> {
        self.core.set_base_type(self.id, None, self.source)
    }

    pub fn container_name(&mut self, name: &str) -> bool {
        self.core.set_container_name(self.id, Some(name), self.source)
    }

    /// Clears the configured container name, falling back to the default.
    pub fn reset_container_name(&mut self) -> bool {
        self.core.set_container_name(self.id, None, self.source)
    }

    /// Uses the property `name` of type `ty` as the discriminator, creating
    /// it as a shadow property if needed.
    pub fn has_discriminator(&mut self, name: &str, ty: Type) -> Result<PropertyId> {
        if !self.is_root() {
            return Err(err!(
                "discriminator of `{}` must be configured on its root type",
                self.name()
            ));
        }

        self.core
            .has_discriminator(self.id, Some(name), Some(ty), self.source)
            .ok_or_else(|| {
                err!(
                    "discriminator of `{}` is configured at a higher level",
                    self.name()
                )
            })
    }

    /// Removes the discriminator property.
    pub fn has_no_discriminator(&mut self) -> bool {
        self.core
            .set_discriminator_property(self.id, None, self.source)
    }

    pub fn discriminator_value(&mut self, value: impl Into<Value>) -> Result<bool> {
        let value = value.into();
        let value = (!value.is_null()).then_some(value);
        self.core
            .set_discriminator_value(self.id, value, self.source)
    }

    /// Sets an annotation. A null value removes it.
    pub fn annotation(&mut self, name: impl Into<AnnotationName>, value: impl Into<Value>) -> bool {
        let value = value.into();
        let value = (!value.is_null()).then_some(value);
        self.core
            .set_annotation(self.id, name.into(), value, self.source)
    }

    /// Adds a relationship to the primary key of `principal`. With no
    /// `properties`, the conventions supply them.
    pub fn references(&mut self, principal: &str, properties: &[&str]) -> Result<ForeignKeyId> {
        let principal_id = self
            .core
            .model()
            .find_entity_type(principal)
            .map(|et| et.id())
            .ok_or_else(|| Error::unknown_member("entity type", principal))?;

        let properties = self.resolve_all(properties)?;
        let properties = (!properties.is_empty()).then_some(&properties[..]);

        self.core
            .add_foreign_key(self.id, principal_id, properties, self.source)
            .map_err(|err| {
                err.context(err!(
                    "configuring relationship from `{}` to `{principal}`",
                    self.name()
                ))
            })
    }

    fn add_property(&mut self, name: &str, ty: Type, shadow: bool) -> Result<PropertyId> {
        self.core
            .add_property(self.id, name, ty, shadow, self.source)
            .ok_or_else(|| {
                err!(
                    "property `{name}` of `{}` is configured with another type at a higher level",
                    self.name()
                )
            })
    }

    fn resolve(&self, name: &str) -> Result<PropertyId> {
        self.core
            .model()
            .find_property(self.id, name)
            .map(|property| property.id())
            .ok_or_else(|| {
                Error::unknown_member("property", name)
                    .context(err!("configuring `{}`", self.name()))
            })
    }

    fn resolve_all(&self, names: &[&str]) -> Result<Vec<PropertyId>> {
        names.iter().map(|name| self.resolve(name)).collect()
    }

    fn is_root(&self) -> bool {
        self.core.model().entity_type(self.id).is_root()
    }

    fn name(&self) -> String {
        self.core.model().entity_type(self.id).name().to_string()
    }
}
