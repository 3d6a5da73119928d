use modelwright_core::metadata::EntityTypeId;
use modelwright_core::*;

use std::cell::RefCell;
use std::rc::Rc;

type Log = Rc<RefCell<Vec<String>>>;

fn record(log: &Log, label: &'static str) -> impl Fn(&mut Builder, &Event) -> Flow + 'static {
    let log = log.clone();
    move |_, event| {
        log.borrow_mut().push(format!("{label}:{:?}", event.kind()));
        Flow::Continue
    }
}

fn builder(conventions: ConventionSet) -> Builder {
    Builder::new(conventions, Options::default())
}

#[test]
fn handlers_run_in_registration_order() {
    let log = Log::default();
    let mut conventions = ConventionSet::new();
    conventions
        .add_fn(EventKind::EntityTypeAdded, "first", record(&log, "first"))
        .add_fn(EventKind::EntityTypeAdded, "second", record(&log, "second"));

    let mut builder = builder(conventions);
    builder.add_entity_type("Order", ConfigSource::Explicit);

    assert_eq!(
        *log.borrow(),
        ["first:EntityTypeAdded", "second:EntityTypeAdded"]
    );
}

#[test]
fn stop_skips_later_handlers() {
    let log = Log::default();
    let stopper = log.clone();

    let mut conventions = ConventionSet::new();
    conventions
        .add_fn(EventKind::EntityTypeAdded, "stopper", move |_, _| {
            stopper.borrow_mut().push("stopper".to_string());
            Flow::Stop
        })
        .add_fn(EventKind::EntityTypeAdded, "skipped", record(&log, "skipped"));

    let mut builder = builder(conventions);
    builder.add_entity_type("Order", ConfigSource::Explicit);
    builder.add_entity_type("Customer", ConfigSource::Explicit);

    assert_eq!(*log.borrow(), ["stopper", "stopper"]);
}

#[test]
fn nested_events_are_dispatched_after_the_current_event() {
    let log = Log::default();
    let first = log.clone();

    let mut conventions = ConventionSet::new();
    conventions
        .add_fn(EventKind::EntityTypeAdded, "adds_id", move |builder, event| {
            if let Event::EntityTypeAdded { entity } = *event {
                builder.add_property(entity, "Id", Type::I64, false, ConfigSource::Convention);
            }
            first.borrow_mut().push("adds_id".to_string());
            Flow::Continue
        })
        .add_fn(EventKind::EntityTypeAdded, "second", record(&log, "second"))
        .add_fn(EventKind::PropertyAdded, "property", record(&log, "property"));

    let mut builder = builder(conventions);
    let order = builder.add_entity_type("Order", ConfigSource::Explicit).unwrap();

    assert_eq!(
        *log.borrow(),
        ["adds_id", "second:EntityTypeAdded", "property:PropertyAdded"]
    );
    assert!(builder.model().find_property(order, "Id").is_some());
}

#[test]
fn batch_delays_dispatch() {
    let log = Log::default();
    let mut conventions = ConventionSet::new();
    conventions.add_fn(EventKind::EntityTypeAdded, "log", record(&log, "log"));

    let mut builder = builder(conventions);

    builder.batch(|builder| {
        builder.add_entity_type("Order", ConfigSource::Explicit);
        builder.add_entity_type("Customer", ConfigSource::Explicit);
        assert!(log.borrow().is_empty());
    });

    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn removed_subject_skips_remaining_handlers() {
    let log = Log::default();
    let mut conventions = ConventionSet::new();
    conventions
        .add_fn(EventKind::EntityTypeAdded, "remover", |builder, event| {
            if let Event::EntityTypeAdded { entity } = *event {
                builder.remove_entity_type(entity, ConfigSource::Explicit);
            }
            Flow::Continue
        })
        .add_fn(EventKind::EntityTypeAdded, "late", record(&log, "late"))
        .add_fn(EventKind::EntityTypeRemoved, "removed", record(&log, "removed"));

    let mut builder = builder(conventions);
    builder.add_entity_type("Ephemeral", ConfigSource::Explicit);

    assert_eq!(*log.borrow(), ["removed:EntityTypeRemoved"]);
    assert!(builder.model().find_entity_type("Ephemeral").is_none());
}

#[test]
fn model_initialized_runs_on_new() {
    let mut conventions = ConventionSet::new();
    conventions.add_fn(EventKind::ModelInitialized, "seed", |builder, _| {
        builder.add_entity_type("Seed", ConfigSource::Convention);
        Flow::Continue
    });

    let builder = builder(conventions);
    let seed = builder.model().find_entity_type("Seed").unwrap();

    assert_eq!(
        builder.model().config_source(seed.id(), Aspect::Existence),
        Some(ConfigSource::Convention)
    );
}

#[test]
fn event_limit_stops_runaway_conventions() {
    let mut conventions = ConventionSet::new();
    conventions.add_fn(EventKind::EntityTypeAdded, "runaway", |builder, event| {
        if let Event::EntityTypeAdded {
            entity: EntityTypeId(n),
        } = *event
        {
            builder.add_entity_type(format!("Generated{}", n + 1), ConfigSource::Convention);
        }
        Flow::Continue
    });

    let mut options = Options::default();
    options.convention_event_limit(10);

    let mut builder = Builder::new(conventions, options);
    builder.add_entity_type("Generated0", ConfigSource::Explicit);

    assert!(builder.model().entity_types().len() <= 11);

    let err = builder.finalize().unwrap_err();
    assert!(err.is_invalid_model());

    let violations = err.violations().unwrap();
    assert!(violations
        .iter()
        .any(|v| v.message.contains("did not converge")));
}

#[test]
fn rerun_at_fixed_point_changes_nothing() {
    let mut conventions = ConventionSet::new();
    conventions.add_fn(EventKind::EntityTypeAdded, "upper", |builder, event| {
        if let Event::EntityTypeAdded { entity } = *event {
            let name = builder
                .model()
                .entity_type(entity)
                .short_name()
                .to_uppercase();
            builder
                .entity(entity, ConfigSource::Convention)
                .container_name(Some(&name));
        }
        Flow::Continue
    });

    let mut builder = builder(conventions);
    let order = builder.add_entity_type("shop::Order", ConfigSource::Explicit).unwrap();

    assert_eq!(builder.model().container_name(order), "ORDER");
    assert_eq!(builder.rerun_conventions(), 0);
}

#[test]
fn identical_writes_do_not_change_the_version() {
    let mut builder = builder(ConventionSet::new());
    let order = builder.add_entity_type("Order", ConfigSource::Explicit).unwrap();

    assert!(builder.set_container_name(order, Some("Orders"), ConfigSource::Explicit));
    let version = builder.model().version();

    assert!(builder.set_container_name(order, Some("Orders"), ConfigSource::Explicit));
    assert_eq!(builder.model().version(), version);

    assert!(builder.set_container_name(order, Some("OrderRows"), ConfigSource::Explicit));
    assert!(builder.model().version() > version);
}

#[test]
fn removing_a_base_type_reports_members_of_derived_types() {
    use ConfigSource::Explicit;

    let log = Log::default();
    let mut conventions = ConventionSet::new();
    conventions
        .add_fn(EventKind::KeyRemoved, "key", record(&log, "key"))
        .add_fn(EventKind::IndexRemoved, "index", record(&log, "index"))
        .add_fn(EventKind::ForeignKeyRemoved, "fk", record(&log, "fk"));

    let mut builder = builder(conventions);

    let customer = builder.add_entity_type("Customer", Explicit).unwrap();
    let id = builder
        .add_property(customer, "Id", Type::I64, false, Explicit)
        .unwrap();
    assert!(builder.set_primary_key(customer, Some(&[id][..]), Explicit));

    let animal = builder.add_entity_type("Animal", Explicit).unwrap();
    let name = builder
        .add_property(animal, "Name", Type::String, false, Explicit)
        .unwrap();
    let owner_id = builder
        .add_property(animal, "OwnerId", Type::I64, true, Explicit)
        .unwrap();

    // Members of `Dog` over properties declared by `Animal`
    let dog = builder.add_entity_type("Dog", Explicit).unwrap();
    builder.set_base_type(dog, Some(animal), Explicit).unwrap();
    let key = builder.add_key(dog, &[name], Explicit).unwrap();
    let index = builder.add_index(dog, &[name], Explicit).unwrap();
    let fk = builder
        .add_foreign_key(dog, customer, Some(&[owner_id][..]), Explicit)
        .unwrap();

    assert!(builder.remove_entity_type(animal, Explicit));

    let model = builder.model();
    assert!(model.get_key(key).is_none());
    assert!(model.get_index(index).is_none());
    assert!(model.get_foreign_key(fk).is_none());
    assert!(model.primary_key(customer).is_some());

    assert_eq!(
        *log.borrow(),
        ["key:KeyRemoved", "index:IndexRemoved", "fk:ForeignKeyRemoved"]
    );
}
