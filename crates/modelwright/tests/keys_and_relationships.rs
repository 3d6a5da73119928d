use modelwright::metadata::{EntityTypeId, PropertyId, ValueGenerated};
use modelwright::{Aspect, ConfigSource, Model, ModelBuilder, Type};

fn id(model: &Model, name: &str) -> EntityTypeId {
    model.find_entity_type(name).unwrap().id()
}

fn property(model: &Model, entity: &str, name: &str) -> PropertyId {
    model.find_property(id(model, entity), name).unwrap().id()
}

fn pk(model: &Model, entity: &str) -> Option<Vec<PropertyId>> {
    model
        .primary_key(id(model, entity))
        .map(|key| key.properties().to_vec())
}

/// `Customer` and `Order`, both keyed by `Id`, with a relationship from
/// `Order` to `Customer` whose properties the conventions discover.
fn customers_and_orders() -> ModelBuilder {
    let mut builder = ModelBuilder::new();
    builder.entity("Customer").property("Id", Type::I64).unwrap();
    builder.entity("Order").property("Id", Type::I64).unwrap();
    builder.entity("Order").references("Customer", &[]).unwrap();
    builder
}

#[test]
fn id_property_becomes_the_primary_key() {
    let mut builder = ModelBuilder::new();
    builder.entity("Order").property("Number", Type::String).unwrap();
    builder.entity("Order").property("Id", Type::I64).unwrap();

    let model = builder.model();
    let order_id = property(model, "Order", "Id");

    assert_eq!(pk(model, "Order"), Some(vec![order_id]));
    assert_eq!(
        model.config_source(id(model, "Order"), Aspect::PrimaryKey),
        Some(ConfigSource::Convention)
    );
    assert!(!model.property(order_id).nullable());
    assert_eq!(model.property(order_id).value_generated(), ValueGenerated::OnAdd);
}

#[test]
fn type_prefixed_id_becomes_the_primary_key() {
    let mut builder = ModelBuilder::new();
    builder
        .entity("billing::LineItem")
        .property("LineItemId", Type::Uuid)
        .unwrap();

    let model = builder.model();
    let key = property(model, "billing::LineItem", "LineItemId");

    assert_eq!(pk(model, "billing::LineItem"), Some(vec![key]));
    assert_eq!(model.property(key).value_generated(), ValueGenerated::OnAdd);
}

#[test]
fn textual_keys_are_not_generated() {
    let mut builder = ModelBuilder::new();
    builder.entity("Country").property("Id", Type::String).unwrap();

    let model = builder.model();
    let key = property(model, "Country", "Id");
    assert_eq!(model.property(key).value_generated(), ValueGenerated::Never);
}

#[test]
fn explicit_key_replaces_the_discovered_one() {
    let mut builder = ModelBuilder::new();
    let mut order = builder.entity("Order");
    order.property("Id", Type::I64).unwrap();
    order.property("Number", Type::I32).unwrap();
    assert!(order.has_key(&["Number"]).unwrap());

    let model = builder.model();
    let order_id = property(model, "Order", "Id");
    let number = property(model, "Order", "Number");

    assert_eq!(pk(model, "Order"), Some(vec![number]));
    assert_eq!(model.entity_type(id(model, "Order")).keys().len(), 1);
    assert_eq!(model.property(order_id).value_generated(), ValueGenerated::Never);
    assert_eq!(model.property(number).value_generated(), ValueGenerated::OnAdd);

    // Conventions do not bring the discovered key back
    assert_eq!(builder.rerun_conventions(), 0);
    assert_eq!(pk(builder.model(), "Order"), Some(vec![number]));
}

#[test]
fn derived_types_drop_their_discovered_key() {
    let mut builder = ModelBuilder::new();
    builder.entity("Animal").property("Id", Type::I64).unwrap();
    builder.entity("Dog").property("DogId", Type::I64).unwrap();

    assert!(pk(builder.model(), "Dog").is_some());
    builder.entity("Dog").base_type("Animal").unwrap();

    let model = builder.model();
    let dog = id(model, "Dog");
    let animal_id = property(model, "Animal", "Id");
    let dog_id = property(model, "Dog", "DogId");

    assert!(model.entity_type(dog).primary_key().is_none());
    assert!(model.entity_type(dog).keys().is_empty());
    assert_eq!(pk(model, "Dog"), Some(vec![animal_id]));
    assert_eq!(model.property(dog_id).value_generated(), ValueGenerated::Never);

    assert!(builder.finalize().is_ok());
}

#[test]
fn primary_key_is_configured_on_the_root() {
    let mut builder = ModelBuilder::new();
    builder.entity("Animal").property("Id", Type::I64).unwrap();
    builder.entity("Dog").base_type("Animal").unwrap();

    let err = builder.entity("Dog").has_key(&["Id"]).unwrap_err();
    assert!(err.to_string().contains("root type"), "{err}");
}

#[test]
fn unknown_properties_are_reported_by_name() {
    let mut builder = ModelBuilder::new();
    builder.entity("Order");

    let err = builder.entity("Order").has_index(&["Missing"]).unwrap_err();
    assert!(err.is_unknown_member());
    assert!(err.to_string().contains("`Missing`"), "{err}");

    let err = builder.remove_entity("Nope").unwrap_err();
    assert!(err.is_unknown_member());
}

#[test]
fn foreign_key_properties_are_discovered() {
    let builder = customers_and_orders();
    let model = builder.model();
    let order = id(model, "Order");

    let fk = model.entity_type(order).foreign_keys()[0];
    let customer_id = model.find_property(order, "CustomerId").unwrap();

    assert_eq!(model.foreign_key(fk).properties(), [customer_id.id()]);
    assert_eq!(model.foreign_key(fk).principal(), id(model, "Customer"));
    assert!(customer_id.is_shadow());
    assert!(customer_id.nullable());
    assert_eq!(customer_id.ty(), Type::I64);
    assert_eq!(
        model.config_source(fk, Aspect::ForeignKeyProperties),
        Some(ConfigSource::Convention)
    );

    // Discovered properties are not generated
    assert_eq!(customer_id.value_generated(), ValueGenerated::Never);
}

#[test]
fn foreign_key_properties_are_indexed() {
    let builder = customers_and_orders();
    let model = builder.model();
    let order = id(model, "Order");
    let customer_id = property(model, "Order", "CustomerId");

    let indices = model.entity_type(order).indices();
    assert_eq!(indices.len(), 1);

    let index = model.index(indices[0]);
    assert_eq!(index.properties(), [customer_id]);
    assert!(!index.is_unique());
    assert_eq!(
        model.config_source(index.id(), Aspect::Existence),
        Some(ConfigSource::Convention)
    );
}

#[test]
fn existing_properties_are_reused() {
    let mut builder = ModelBuilder::new();
    builder.entity("Customer").property("Id", Type::I64).unwrap();
    let mut order = builder.entity("Order");
    order.property("Id", Type::I64).unwrap();
    let customer_id = order.property("CustomerId", Type::I64).unwrap();
    order.references("Customer", &[]).unwrap();

    let model = builder.model();
    let order = id(model, "Order");
    let fk = model.entity_type(order).foreign_keys()[0];

    assert_eq!(model.foreign_key(fk).properties(), [customer_id]);
    assert_eq!(model.shadow_properties(order).count(), 0);
}

#[test]
fn removing_the_relationship_removes_discovered_members() {
    let mut builder = customers_and_orders();
    let model = builder.model();
    let order = id(model, "Order");
    let fk = model.entity_type(order).foreign_keys()[0];

    assert!(builder.core().remove_foreign_key(fk, ConfigSource::Explicit));

    let model = builder.model();
    assert!(model.find_property(order, "CustomerId").is_none());
    assert!(model.entity_type(order).indices().is_empty());
    assert!(model.entity_type(order).foreign_keys().is_empty());
}

#[test]
fn explicit_members_outlive_the_relationship() {
    let mut builder = ModelBuilder::new();
    builder.entity("Customer").property("Id", Type::I64).unwrap();

    let mut order = builder.entity("Order");
    order.property("Id", Type::I64).unwrap();
    order.shadow_property("CustomerId", Type::I64).unwrap();
    order.has_index(&["CustomerId"]).unwrap();
    let fk = order.references("Customer", &["CustomerId"]).unwrap();

    assert!(builder.core().remove_foreign_key(fk, ConfigSource::Explicit));

    let model = builder.model();
    let order = id(model, "Order");
    assert!(model.find_property(order, "CustomerId").is_some());
    assert_eq!(model.entity_type(order).indices().len(), 1);
}

#[test]
fn keys_covering_the_properties_replace_the_index() {
    let mut builder = customers_and_orders();
    builder
        .entity("Order")
        .has_alternate_key(&["CustomerId", "Id"])
        .unwrap();

    let model = builder.model();
    let order = id(model, "Order");

    assert!(model.entity_type(order).indices().is_empty());
    assert_eq!(model.entity_type(order).keys().len(), 2);
}

#[test]
fn relationships_need_a_principal_key() {
    let mut builder = ModelBuilder::new();
    builder.entity("Tag");
    builder.entity("Post").property("Id", Type::I64).unwrap();

    let err = builder.entity("Post").references("Tag", &[]).unwrap_err();
    assert!(err.is_invalid_relationship());

    let message = err.to_string();
    assert!(message.contains("configuring relationship from `Post` to `Tag`"), "{message}");
    assert!(message.contains("no primary key"), "{message}");
}

#[test]
fn relationships_in_a_hierarchy() {
    let mut builder = ModelBuilder::new();
    builder.entity("Customer").property("Id", Type::I64).unwrap();
    builder.entity("Order").property("Id", Type::I64).unwrap();
    builder.entity("RushOrder").base_type("Order").unwrap();
    builder.entity("RushOrder").references("Customer", &[]).unwrap();

    let model = builder.model();
    let rush = id(model, "RushOrder");
    let customer_id = model.find_property(rush, "CustomerId").unwrap();

    assert_eq!(customer_id.declaring_entity_type(), rush);
    assert_eq!(model.entity_type(rush).indices().len(), 1);

    assert!(builder.finalize().is_ok());
}
