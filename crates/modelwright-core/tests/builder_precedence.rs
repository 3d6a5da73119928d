use modelwright_core::metadata::{EntityTypeId, PropertyId};
use modelwright_core::ConfigSource::{Convention, DataAnnotation, Explicit};
use modelwright_core::{AnnotationName, Aspect, Builder, ConventionSet, Options, Type, Value};

fn builder() -> Builder {
    Builder::new(ConventionSet::new(), Options::default())
}

fn with_id(builder: &mut Builder, name: &str) -> (EntityTypeId, PropertyId) {
    let entity = builder.add_entity_type(name, Explicit).unwrap();
    let id = builder
        .add_property(entity, "Id", Type::I64, false, Explicit)
        .unwrap();
    assert!(builder.set_primary_key(entity, Some(&[id][..]), Explicit));
    (entity, id)
}

#[test]
fn explicit_container_name_survives_lower_levels() {
    let mut builder = builder();
    let invoice = builder.add_entity_type("billing::Invoice", Explicit).unwrap();

    assert_eq!(builder.model().container_name(invoice), "Invoice");

    assert!(builder.set_container_name(invoice, Some("Invoices"), Explicit));
    assert!(!builder.set_container_name(invoice, None, Convention));
    assert!(!builder.set_container_name(invoice, Some("Annotated"), DataAnnotation));

    assert_eq!(builder.model().container_name(invoice), "Invoices");
    assert_eq!(
        builder.model().config_source(invoice, Aspect::ContainerName),
        Some(Explicit)
    );

    assert!(builder.set_container_name(invoice, Some("AllInvoices"), Explicit));
    assert_eq!(builder.model().container_name(invoice), "AllInvoices");
}

#[test]
fn equal_levels_overwrite_each_other() {
    let mut builder = builder();
    let order = builder.add_entity_type("Order", Explicit).unwrap();

    assert!(builder.set_container_name(order, Some("A"), Convention));
    assert!(builder.set_container_name(order, Some("B"), Convention));
    assert_eq!(builder.model().container_name(order), "B");

    assert!(builder.set_container_name(order, Some("C"), DataAnnotation));
    assert!(!builder.set_container_name(order, Some("D"), Convention));
    assert_eq!(builder.model().container_name(order), "C");
}

#[test]
fn derived_types_resolve_their_root_container() {
    let mut builder = builder();
    let invoice = builder.add_entity_type("Invoice", Explicit).unwrap();
    let credit = builder.add_entity_type("CreditInvoice", Explicit).unwrap();

    builder.set_base_type(credit, Some(invoice), Explicit).unwrap();

    assert_eq!(builder.model().container_name(credit), "Invoice");
    assert_eq!(
        builder.model().derived_types(invoice).collect::<Vec<_>>(),
        [credit]
    );
}

#[test]
fn base_type_cycles_are_rejected() {
    let mut builder = builder();
    let a = builder.add_entity_type("A", Explicit).unwrap();
    let b = builder.add_entity_type("B", Explicit).unwrap();
    let c = builder.add_entity_type("C", Explicit).unwrap();

    builder.set_base_type(b, Some(a), Explicit).unwrap();
    builder.set_base_type(c, Some(b), Explicit).unwrap();

    let err = builder.set_base_type(a, Some(c), Explicit).unwrap_err();
    assert!(err.is_invalid_base_type());
    assert!(err.to_string().contains("`A`"), "{err}");

    let err = builder.set_base_type(a, Some(a), Explicit).unwrap_err();
    assert!(err.is_invalid_base_type());

    assert!(builder.model().entity_type(a).is_root());
}

#[test]
fn base_type_precedence() {
    let mut builder = builder();
    let a = builder.add_entity_type("A", Explicit).unwrap();
    let b = builder.add_entity_type("B", Explicit).unwrap();

    assert_eq!(builder.set_base_type(b, Some(a), Explicit).unwrap(), true);
    assert_eq!(builder.set_base_type(b, None, Convention).unwrap(), false);
    assert_eq!(builder.model().entity_type(b).base(), Some(a));
}

#[test]
fn primary_key_is_root_only_and_required() {
    let mut builder = builder();
    let (animal, _) = with_id(&mut builder, "Animal");
    let dog = builder.add_entity_type("Dog", Explicit).unwrap();
    builder.set_base_type(dog, Some(animal), Explicit).unwrap();

    let tag = builder
        .add_property(dog, "Tag", Type::String, false, Explicit)
        .unwrap();
    assert!(!builder.set_primary_key(dog, Some(&[tag][..]), Explicit));

    let id = builder.model().find_property(dog, "Id").unwrap().id();
    assert!(!builder.model().property(id).nullable());
    assert!(!builder.set_nullable(id, true, Explicit));

    assert_eq!(builder.model().primary_key(dog).map(|k| k.properties()), Some(&[id][..]));
}

#[test]
fn replacing_the_primary_key_drops_the_unused_previous_key() {
    let mut builder = builder();
    let (order, id) = with_id(&mut builder, "Order");
    let number = builder
        .add_property(order, "Number", Type::String, false, Explicit)
        .unwrap();

    let previous = builder.model().entity_type(order).primary_key().unwrap();
    assert!(builder.set_primary_key(order, Some(&[number][..]), Explicit));

    assert!(builder.model().get_key(previous).is_none());
    assert_eq!(builder.model().entity_type(order).keys().len(), 1);
    assert!(builder.set_nullable(id, true, Explicit));
}

#[test]
fn properties_used_by_keys_cannot_be_removed() {
    let mut builder = builder();
    let (order, id) = with_id(&mut builder, "Order");
    let placed = builder
        .add_property(order, "PlacedAt", Type::I64, false, Explicit)
        .unwrap();
    let index = builder.add_index(order, &[placed], Explicit).unwrap();

    assert!(!builder.remove_property(id, Explicit));
    assert!(builder.remove_property(placed, Explicit));

    assert!(builder.model().get_index(index).is_none());
    assert!(builder.model().find_property(order, "PlacedAt").is_none());
}

#[test]
fn convention_cannot_remove_explicit_property() {
    let mut builder = builder();
    let order = builder.add_entity_type("Order", Explicit).unwrap();
    let note = builder
        .add_property(order, "Note", Type::String, false, Explicit)
        .unwrap();

    assert!(!builder.remove_property(note, Convention));
    assert!(builder.model().get_property(note).is_some());
}

#[test]
fn property_type_changes_respect_precedence() {
    let mut builder = builder();
    let order = builder.add_entity_type("Order", Explicit).unwrap();
    let total = builder
        .add_property(order, "Total", Type::F64, false, Explicit)
        .unwrap();

    assert_eq!(
        builder.add_property(order, "Total", Type::I64, false, Convention),
        None
    );
    assert_eq!(
        builder.add_property(order, "Total", Type::F64, false, Convention),
        Some(total)
    );
    assert_eq!(builder.model().property(total).ty(), Type::F64);
}

#[test]
fn annotations_are_namespaced_and_precedence_checked() {
    let mut builder = builder();
    let order = builder.add_entity_type("Order", Explicit).unwrap();

    let mongo = AnnotationName::new("mongo", "CollectionName");
    let sql = AnnotationName::new("sql", "CollectionName");

    assert!(builder.set_annotation(order, mongo.clone(), Some("orders".into()), DataAnnotation));
    assert!(builder.set_annotation(order, sql.clone(), Some("order_rows".into()), Convention));
    assert!(!builder.set_annotation(order, mongo.clone(), Some("other".into()), Convention));

    let annotations = builder.model().entity_type(order).annotations();
    assert_eq!(annotations.get(&mongo), Some(&Value::from("orders")));
    assert_eq!(annotations.get(&sql), Some(&Value::from("order_rows")));

    assert!(builder.set_annotation(order, sql.clone(), None, Explicit));
    assert!(!builder.model().entity_type(order).annotations().contains(&sql));
}

#[test]
fn removing_an_entity_type_reparents_derived_types() {
    let mut builder = builder();
    let a = builder.add_entity_type("A", Explicit).unwrap();
    let b = builder.add_entity_type("B", Explicit).unwrap();
    let c = builder.add_entity_type("C", Explicit).unwrap();

    builder.set_base_type(b, Some(a), Explicit).unwrap();
    builder.set_base_type(c, Some(b), Explicit).unwrap();

    assert!(builder.remove_entity_type(b, Explicit));

    assert!(builder.model().get_entity_type(b).is_none());
    assert_eq!(builder.model().entity_type(c).base(), Some(a));
    assert_eq!(builder.model().derived_types(a).collect::<Vec<_>>(), [c]);
}

#[test]
fn removing_an_entity_type_removes_its_relationships() {
    let mut builder = builder();
    let (customer, _) = with_id(&mut builder, "Customer");
    let order = builder.add_entity_type("Order", Explicit).unwrap();
    let customer_id = builder
        .add_property(order, "CustomerId", Type::I64, false, Explicit)
        .unwrap();

    let fk = builder
        .add_foreign_key(order, customer, Some(&[customer_id][..]), Explicit)
        .unwrap();

    assert!(builder.remove_entity_type(customer, Explicit));
    assert!(builder.model().get_foreign_key(fk).is_none());
    assert!(builder.model().entity_type(order).foreign_keys().is_empty());
}

#[test]
fn foreign_keys_need_a_principal_key() {
    let mut builder = builder();
    let customer = builder.add_entity_type("Customer", Explicit).unwrap();
    let order = builder.add_entity_type("Order", Explicit).unwrap();

    let err = builder
        .add_foreign_key(order, customer, None, Explicit)
        .unwrap_err();
    assert!(err.is_invalid_relationship());
    assert!(err.to_string().contains("no primary key"), "{err}");
}

#[test]
fn foreign_key_property_count_must_match() {
    let mut builder = builder();
    let (customer, _) = with_id(&mut builder, "Customer");
    let order = builder.add_entity_type("Order", Explicit).unwrap();
    let a = builder
        .add_property(order, "A", Type::I64, false, Explicit)
        .unwrap();
    let b = builder
        .add_property(order, "B", Type::I64, false, Explicit)
        .unwrap();

    let err = builder
        .add_foreign_key(order, customer, Some(&[a, b][..]), Explicit)
        .unwrap_err();
    assert!(err.is_invalid_relationship());

    let fk = builder
        .add_foreign_key(order, customer, None, Explicit)
        .unwrap();
    assert!(!builder.set_foreign_key_properties(fk, &[a, b], Explicit));
    assert!(builder.set_foreign_key_properties(fk, &[a], Explicit));
    assert_eq!(builder.model().foreign_key(fk).properties(), [a]);
}

#[test]
fn removed_entity_types_are_not_added_back_at_lower_levels() {
    let mut builder = builder();
    let order = builder.add_entity_type("Order", Explicit).unwrap();
    assert!(builder.remove_entity_type(order, Explicit));

    let version = builder.model().version();
    assert_eq!(builder.add_entity_type("Order", Convention), None);
    assert_eq!(builder.add_entity_type("Order", DataAnnotation), None);
    assert_eq!(builder.model().version(), version);
    assert_eq!(builder.model().removed_at("Order"), Some(Explicit));

    // Explicit configuration brings it back and forgets the removal
    let order = builder.add_entity_type("Order", Explicit).unwrap();
    assert_eq!(builder.model().removed_at("Order"), None);
    assert_eq!(
        builder.model().config_source(order, Aspect::Existence),
        Some(Explicit)
    );
}

#[test]
fn equal_level_adds_forget_a_removal() {
    let mut builder = builder();
    let draft = builder.add_entity_type("Draft", Convention).unwrap();
    assert!(builder.remove_entity_type(draft, Convention));

    assert!(builder.add_entity_type("Draft", Convention).is_some());
    assert_eq!(builder.model().removed_at("Draft"), None);
}
