use super::{
    EntityType, EntityTypeId, ForeignKey, ForeignKeyId, Index, IndexId, Key, KeyId, Property,
    PropertyId, Type, TypeName, Value, ValueGenerator,
};
use crate::annotation::{AnnotationName, Annotations};
use crate::provenance::{Aspect, AspectId, ConfigSource, Ledger, Target};
use crate::Diagnostic;
use indexmap::{IndexMap, IndexSet};

/// The mapping model: every entity type with its members, the inheritance
/// index and the provenance of each configured aspect.
///
/// Only [`Builder`](crate::Builder) mutates a model. Once finalized, a model
/// is a read-only snapshot that can be shared across threads.
#[derive(Debug, Default)]
pub struct Model {
    pub(crate) entity_types: IndexMap<EntityTypeId, EntityType>,

    /// Looks up entity types by type identity
    pub(crate) names: IndexMap<TypeName, EntityTypeId>,

    /// Level each removed entity type was removed at
    pub(crate) removed: IndexMap<TypeName, ConfigSource>,

    /// Maps a base type to its direct derived types
    pub(crate) derived: IndexMap<EntityTypeId, IndexSet<EntityTypeId>>,

    pub(crate) properties: IndexMap<PropertyId, Property>,

    pub(crate) keys: IndexMap<KeyId, Key>,

    pub(crate) indices: IndexMap<IndexId, Index>,

    pub(crate) foreign_keys: IndexMap<ForeignKeyId, ForeignKey>,

    /// Model-level annotations
    pub(crate) annotations: Annotations,

    pub(crate) ledger: Ledger,

    pub(crate) diagnostics: Vec<Diagnostic>,

    /// Incremented on every change to a configured value
    pub(crate) version: u64,

    pub(crate) finalized: bool,

    next_id: usize,
}

impl Model {
    pub fn entity_types(&self) -> impl ExactSizeIterator<Item = &EntityType> {
        self.entity_types.values()
    }

    /// Get an entity type by ID
    #[track_caller]
    pub fn entity_type(&self, id: impl Into<EntityTypeId>) -> &EntityType {
        self.entity_types
            .get(&id.into())
            .expect("invalid entity type ID")
    }

    pub fn get_entity_type(&self, id: EntityTypeId) -> Option<&EntityType> {
        self.entity_types.get(&id)
    }

    /// Find an entity type by its type identity
    pub fn find_entity_type(&self, name: &str) -> Option<&EntityType> {
        let id = self.names.get(&TypeName::new(name))?;
        self.entity_types.get(id)
    }

    /// The level the entity type `name` was removed at, if it was removed
    /// and not added again since.
    pub fn removed_at(&self, name: &str) -> Option<ConfigSource> {
        self.removed.get(&TypeName::new(name)).copied()
    }

    pub fn properties(&self) -> impl ExactSizeIterator<Item = &Property> {
        self.properties.values()
    }

    #[track_caller]
    pub fn property(&self, id: PropertyId) -> &Property {
        self.properties.get(&id).expect("invalid property ID")
    }

    pub fn get_property(&self, id: PropertyId) -> Option<&Property> {
        self.properties.get(&id)
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &Key> {
        self.keys.values()
    }

    #[track_caller]
    pub fn key(&self, id: KeyId) -> &Key {
        self.keys.get(&id).expect("invalid key ID")
    }

    pub fn get_key(&self, id: KeyId) -> Option<&Key> {
        self.keys.get(&id)
    }

    pub fn indices(&self) -> impl ExactSizeIterator<Item = &Index> {
        self.indices.values()
    }

    #[track_caller]
    pub fn index(&self, id: IndexId) -> &Index {
        self.indices.get(&id).expect("invalid index ID")
    }

    pub fn get_index(&self, id: IndexId) -> Option<&Index> {
        self.indices.get(&id)
    }

    pub fn foreign_keys(&self) -> impl ExactSizeIterator<Item = &ForeignKey> {
        self.foreign_keys.values()
    }

    #[track_caller]
    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        self.foreign_keys.get(&id).expect("invalid foreign key ID")
    }

    pub fn get_foreign_key(&self, id: ForeignKeyId) -> Option<&ForeignKey> {
        self.foreign_keys.get(&id)
    }

    /// Relationships whose principal is `principal`.
    pub fn foreign_keys_referencing(
        &self,
        principal: EntityTypeId,
    ) -> impl Iterator<Item = &ForeignKey> + '_ {
        self.foreign_keys
            .values()
            .filter(move |fk| fk.principal == principal)
    }

    /// Returns `true` if the metadata object still exists in the model.
    pub fn contains(&self, target: Target) -> bool {
        match target {
            Target::Model => true,
            Target::EntityType(id) => self.entity_types.contains_key(&id),
            Target::Property(id) => self.properties.contains_key(&id),
            Target::Key(id) => self.keys.contains_key(&id),
            Target::Index(id) => self.indices.contains_key(&id),
            Target::ForeignKey(id) => self.foreign_keys.contains_key(&id),
        }
    }

    pub fn annotations(&self, target: Target) -> Option<&Annotations> {
        Some(match target {
            Target::Model => &self.annotations,
            Target::EntityType(id) => &self.entity_types.get(&id)?.annotations,
            Target::Property(id) => &self.properties.get(&id)?.annotations,
            Target::Key(id) => &self.keys.get(&id)?.annotations,
            Target::Index(id) => &self.indices.get(&id)?.annotations,
            Target::ForeignKey(id) => &self.foreign_keys.get(&id)?.annotations,
        })
    }

    pub fn annotation(&self, target: Target, name: &AnnotationName) -> Option<&Value> {
        self.annotations(target)?.get(name)
    }

    /// The precedence level that configured `aspect` of `target`.
    pub fn config_source(&self, target: impl Into<Target>, aspect: Aspect) -> Option<ConfigSource> {
        self.ledger.get(&AspectId::new(target, aspect))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Number of configuration changes applied so far.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Non-fatal findings recorded while the model was built.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn base_type(&self, id: EntityTypeId) -> Option<&EntityType> {
        self.entity_type(id).base.map(|base| self.entity_type(base))
    }

    /// Walks the base chain of `id`, nearest ancestor first.
    ///
    /// The walk is bounded by the number of entity types so a corrupt chain
    /// cannot loop forever; the validator reports such chains.
    pub fn ancestors(&self, id: EntityTypeId) -> impl Iterator<Item = EntityTypeId> + '_ {
        let mut current = self.entity_types.get(&id).and_then(|et| et.base);
        let mut remaining = self.entity_types.len();

        std::iter::from_fn(move || {
            let next = current?;
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            current = self.entity_types.get(&next).and_then(|et| et.base);
            Some(next)
        })
    }

    /// The root of the hierarchy containing `id`.
    pub fn root_of(&self, id: EntityTypeId) -> EntityTypeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    pub fn is_ancestor_or_self(&self, ancestor: EntityTypeId, id: EntityTypeId) -> bool {
        ancestor == id || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Direct derived types of `id`.
    pub fn derived_types(&self, id: EntityTypeId) -> impl Iterator<Item = EntityTypeId> + '_ {
        self.derived.get(&id).into_iter().flatten().copied()
    }

    pub fn has_derived_types(&self, id: EntityTypeId) -> bool {
        self.derived.get(&id).is_some_and(|derived| !derived.is_empty())
    }

    /// `root` followed by every type deriving from it, depth first.
    pub fn hierarchy(&self, root: EntityTypeId) -> Vec<EntityTypeId> {
        let mut out = vec![];
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            if out.contains(&id) {
                continue;
            }
            out.push(id);

            let mut derived: Vec<_> = self.derived_types(id).collect();
            derived.reverse();
            stack.extend(derived);
        }

        out
    }

    /// Properties visible on `id`: inherited ones first, root to leaf.
    pub fn properties_of(&self, id: EntityTypeId) -> Vec<&Property> {
        let mut chain: Vec<_> = self.ancestors(id).collect();
        chain.reverse();
        chain.push(id);

        chain
            .into_iter()
            .flat_map(|et| self.entity_type(et).properties.iter())
            .map(|property| self.property(*property))
            .collect()
    }

    /// Find a property declared on `id` or inherited from an ancestor.
    pub fn find_property(&self, id: EntityTypeId, name: &str) -> Option<&Property> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .flat_map(|et| self.entity_type(et).properties.iter())
            .map(|property| self.property(*property))
            .find(|property| property.name == name)
    }

    /// Returns `true` if `property` is declared on `id` or one of its
    /// ancestors.
    pub fn is_visible(&self, id: EntityTypeId, property: PropertyId) -> bool {
        match self.properties.get(&property) {
            Some(property) => self.is_ancestor_or_self(property.declaring, id),
            None => false,
        }
    }

    /// Shadow properties declared on `id`.
    pub fn shadow_properties(&self, id: EntityTypeId) -> impl Iterator<Item = &Property> + '_ {
        self.entity_type(id)
            .properties
            .iter()
            .map(|property| self.property(*property))
            .filter(|property| property.shadow)
    }

    /// Returns `true` if a key, index or foreign key uses `property`.
    pub fn is_referenced(&self, property: PropertyId) -> bool {
        self.keys.values().any(|k| k.properties.contains(&property))
            || self
                .indices
                .values()
                .any(|i| i.properties.contains(&property))
            || self
                .foreign_keys
                .values()
                .any(|fk| fk.properties.contains(&property))
    }

    /// The container `id` maps to.
    ///
    /// Derived types share their root's container. A root without a
    /// configured name maps to its own short type name.
    pub fn container_name(&self, id: EntityTypeId) -> &str {
        let root = self.entity_type(self.root_of(id));
        root.container_name
            .as_deref()
            .unwrap_or_else(|| root.name.short_name())
    }

    /// The discriminator property of the hierarchy containing `id`.
    pub fn discriminator_property(&self, id: EntityTypeId) -> Option<&Property> {
        let root = self.entity_type(self.root_of(id));
        root.discriminator_property
            .map(|property| self.property(property))
    }

    pub fn discriminator_value(&self, id: EntityTypeId) -> Option<&Value> {
        self.entity_type(id).discriminator_value.as_ref()
    }

    /// The primary key of `id`, declared on its root.
    pub fn primary_key(&self, id: EntityTypeId) -> Option<&Key> {
        let root = self.entity_type(self.root_of(id));
        root.primary_key.map(|key| self.key(key))
    }

    /// Produces the value of a generated property for a record of the
    /// concrete type `concrete`.
    pub fn generate_value(&self, property: PropertyId, concrete: EntityTypeId) -> Option<Value> {
        let property = self.properties.get(&property)?;

        if !self.is_visible(concrete, property.id) {
            return None;
        }

        match property.generator? {
            ValueGenerator::Discriminator => self.discriminator_value(concrete).cloned(),
        }
    }
}

impl Model {
    pub(crate) fn bump(&mut self) {
        self.version += 1;
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[track_caller]
    pub(crate) fn entity_type_mut(&mut self, id: EntityTypeId) -> &mut EntityType {
        self.entity_types
            .get_mut(&id)
            .expect("invalid entity type ID")
    }

    #[track_caller]
    pub(crate) fn property_mut(&mut self, id: PropertyId) -> &mut Property {
        self.properties.get_mut(&id).expect("invalid property ID")
    }

    #[track_caller]
    pub(crate) fn index_mut(&mut self, id: IndexId) -> &mut Index {
        self.indices.get_mut(&id).expect("invalid index ID")
    }

    #[track_caller]
    pub(crate) fn foreign_key_mut(&mut self, id: ForeignKeyId) -> &mut ForeignKey {
        self.foreign_keys
            .get_mut(&id)
            .expect("invalid foreign key ID")
    }

    pub(crate) fn annotations_mut(&mut self, target: Target) -> Option<&mut Annotations> {
        Some(match target {
            Target::Model => &mut self.annotations,
            Target::EntityType(id) => &mut self.entity_types.get_mut(&id)?.annotations,
            Target::Property(id) => &mut self.properties.get_mut(&id)?.annotations,
            Target::Key(id) => &mut self.keys.get_mut(&id)?.annotations,
            Target::Index(id) => &mut self.indices.get_mut(&id)?.annotations,
            Target::ForeignKey(id) => &mut self.foreign_keys.get_mut(&id)?.annotations,
        })
    }

    pub(crate) fn insert_entity_type(&mut self, name: TypeName) -> EntityTypeId {
        let id = EntityTypeId(self.next_id());
        self.names.insert(name.clone(), id);
        self.entity_types.insert(id, EntityType::new(id, name));
        self.bump();
        id
    }

    /// Re-points the base of `id`, keeping the derived-types index in sync.
    pub(crate) fn set_base(&mut self, id: EntityTypeId, base: Option<EntityTypeId>) {
        let old = std::mem::replace(&mut self.entity_type_mut(id).base, base);

        if let Some(old) = old {
            if let Some(derived) = self.derived.get_mut(&old) {
                derived.shift_remove(&id);
            }
        }

        if let Some(base) = base {
            self.derived.entry(base).or_default().insert(id);
        }

        self.bump();
    }

    /// Removes `id` and everything it declares. The caller detaches the type
    /// from its hierarchy and relationships first.
    pub(crate) fn remove_entity_type(&mut self, id: EntityTypeId) -> Option<EntityType> {
        let declared = self.entity_types.get(&id)?.properties.clone();
        for property in declared {
            self.remove_property(property);
        }

        let entity_type = self.entity_types.get(&id)?;
        let keys = entity_type.keys.clone();
        let indices = entity_type.indices.clone();
        for key in keys {
            self.remove_key(key);
        }
        for index in indices {
            self.remove_index(index);
        }

        if let Some(base) = self.entity_types.get(&id)?.base {
            if let Some(derived) = self.derived.get_mut(&base) {
                derived.shift_remove(&id);
            }
        }

        self.derived.shift_remove(&id);
        let entity_type = self.entity_types.shift_remove(&id)?;
        self.names.shift_remove(&entity_type.name);
        self.ledger.forget(Target::EntityType(id));
        self.bump();

        Some(entity_type)
    }

    pub(crate) fn insert_property(
        &mut self,
        entity: EntityTypeId,
        name: &str,
        ty: Type,
        shadow: bool,
    ) -> PropertyId {
        let id = PropertyId(self.next_id());
        self.properties
            .insert(id, Property::new(id, entity, name.to_string(), ty, shadow));
        self.entity_type_mut(entity).properties.push(id);
        self.bump();
        id
    }

    /// Removes `id` together with any key, index or foreign key using it.
    pub(crate) fn remove_property(&mut self, id: PropertyId) -> Option<Property> {
        let property = self.properties.shift_remove(&id)?;

        let keys: Vec<_> = self
            .keys
            .values()
            .filter(|key| key.properties.contains(&id))
            .map(|key| key.id)
            .collect();
        let indices: Vec<_> = self
            .indices
            .values()
            .filter(|index| index.properties.contains(&id))
            .map(|index| index.id)
            .collect();
        let foreign_keys: Vec<_> = self
            .foreign_keys
            .values()
            .filter(|fk| fk.properties.contains(&id))
            .map(|fk| fk.id)
            .collect();

        for key in keys {
            self.remove_key(key);
        }
        for index in indices {
            self.remove_index(index);
        }
        for fk in foreign_keys {
            self.remove_foreign_key(fk);
        }

        if let Some(entity_type) = self.entity_types.get_mut(&property.declaring) {
            entity_type.properties.retain(|p| *p != id);
            if entity_type.discriminator_property == Some(id) {
                entity_type.discriminator_property = None;
            }
        }

        self.ledger.forget(Target::Property(id));
        self.bump();
        Some(property)
    }

    pub(crate) fn insert_key(&mut self, entity: EntityTypeId, properties: Vec<PropertyId>) -> KeyId {
        let id = KeyId(self.next_id());
        self.keys.insert(
            id,
            Key {
                id,
                declaring: entity,
                properties,
                annotations: Annotations::default(),
            },
        );
        self.entity_type_mut(entity).keys.push(id);
        self.bump();
        id
    }

    pub(crate) fn remove_key(&mut self, id: KeyId) -> Option<Key> {
        let key = self.keys.shift_remove(&id)?;

        let foreign_keys: Vec<_> = self
            .foreign_keys
            .values()
            .filter(|fk| fk.principal_key == id)
            .map(|fk| fk.id)
            .collect();
        for fk in foreign_keys {
            self.remove_foreign_key(fk);
        }

        if let Some(entity_type) = self.entity_types.get_mut(&key.declaring) {
            entity_type.keys.retain(|k| *k != id);
            if entity_type.primary_key == Some(id) {
                entity_type.primary_key = None;
                self.ledger
                    .reset(&AspectId::new(key.declaring, Aspect::PrimaryKey));
            }
        }

        self.ledger.forget(Target::Key(id));
        self.bump();
        Some(key)
    }

    pub(crate) fn insert_index(
        &mut self,
        entity: EntityTypeId,
        properties: Vec<PropertyId>,
    ) -> IndexId {
        let id = IndexId(self.next_id());
        self.indices.insert(
            id,
            Index {
                id,
                declaring: entity,
                properties,
                unique: false,
                annotations: Annotations::default(),
            },
        );
        self.entity_type_mut(entity).indices.push(id);
        self.bump();
        id
    }

    pub(crate) fn remove_index(&mut self, id: IndexId) -> Option<Index> {
        let index = self.indices.shift_remove(&id)?;

        if let Some(entity_type) = self.entity_types.get_mut(&index.declaring) {
            entity_type.indices.retain(|i| *i != id);
        }

        self.ledger.forget(Target::Index(id));
        self.bump();
        Some(index)
    }

    pub(crate) fn insert_foreign_key(
        &mut self,
        dependent: EntityTypeId,
        principal: EntityTypeId,
        principal_key: KeyId,
        properties: Vec<PropertyId>,
    ) -> ForeignKeyId {
        let id = ForeignKeyId(self.next_id());
        self.foreign_keys.insert(
            id,
            ForeignKey {
                id,
                dependent,
                principal,
                principal_key,
                properties,
                annotations: Annotations::default(),
            },
        );
        self.entity_type_mut(dependent).foreign_keys.push(id);
        self.bump();
        id
    }

    pub(crate) fn remove_foreign_key(&mut self, id: ForeignKeyId) -> Option<ForeignKey> {
        let fk = self.foreign_keys.shift_remove(&id)?;

        if let Some(entity_type) = self.entity_types.get_mut(&fk.dependent) {
            entity_type.foreign_keys.retain(|f| *f != id);
        }

        self.ledger.forget(Target::ForeignKey(id));
        self.bump();
        Some(fk)
    }
}
