//! The mutable metadata graph.
//!
//! Entity types, properties, keys, indices and foreign keys live in arenas
//! owned by [`Model`] and refer to each other by id. Inheritance is stored as
//! a base id on each entity type plus a derived-types index on the model.

mod entity_type;
pub use entity_type::{EntityType, EntityTypeId};

mod foreign_key;
pub use foreign_key::{ForeignKey, ForeignKeyId};

mod index;
pub use index::{Index, IndexId};

mod key;
pub use key::{Key, KeyId};

mod model;
pub use model::Model;

mod property;
pub use property::{AfterSave, Property, PropertyId, ValueGenerated, ValueGenerator};

mod ty;
pub use ty::Type;

mod type_name;
pub use type_name::TypeName;

mod value;
pub use value::Value;
