//! Precedence-aware mutation of the model.
//!
//! Every mutation names the [`ConfigSource`] it is made at. A write only
//! succeeds when that level may override the level recorded for the aspect in
//! the provenance ledger. Successful structural changes enqueue an [`Event`];
//! once the outermost builder operation returns, queued events are dispatched
//! to the registered conventions until no further events are produced.

mod discriminator;

mod entity_type;
pub use entity_type::EntityTypeBuilder;

mod key;

mod property;
pub use property::PropertyBuilder;

use crate::annotation::AnnotationName;
use crate::metadata::{EntityTypeId, Model, TypeName, Value};
use crate::provenance::{Aspect, AspectId, ConfigSource, Target};
use crate::{verify, ConventionSet, Diagnostic, Error, Event, Flow, Options, Result, Violation};

use std::collections::VecDeque;
use tracing::{debug, error, warn};

/// Builds a [`Model`] by applying explicit configuration and running
/// conventions in reaction to each change.
pub struct Builder {
    model: Model,

    conventions: ConventionSet,

    options: Options,

    /// Events waiting to be dispatched
    pending: VecDeque<Event>,

    /// True while queued events are being dispatched
    dispatching: bool,

    /// Number of open [`Builder::batch`] scopes
    delayed: usize,

    /// Events dispatched since the outermost operation started
    dispatched: usize,

    /// Set once the event limit dropped events
    overflowed: bool,
}

impl Builder {
    /// Creates a builder with an empty model and runs the
    /// [`ModelInitialized`](Event::ModelInitialized) conventions.
    pub fn new(conventions: ConventionSet, options: Options) -> Builder {
        let mut builder = Builder {
            model: Model::default(),
            conventions,
            options,
            pending: VecDeque::new(),
            dispatching: false,
            delayed: 0,
            dispatched: 0,
            overflowed: false,
        };

        builder.notify(Event::ModelInitialized);
        builder
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn conventions(&self) -> &ConventionSet {
        &self.conventions
    }

    /// Returns a builder scoped to one entity type and one precedence level.
    pub fn entity(&mut self, id: EntityTypeId, source: ConfigSource) -> EntityTypeBuilder<'_> {
        EntityTypeBuilder::new(self, id, source)
    }

    /// Runs `f`, dispatching the events it produces only once it returns.
    pub fn batch<R>(&mut self, f: impl FnOnce(&mut Builder) -> R) -> R {
        self.delayed += 1;
        let ret = f(self);
        self.delayed -= 1;
        self.flush();
        ret
    }

    /// Replays the structural events of the whole model through the
    /// conventions and returns the number of changes they made. A model at a
    /// fixed point returns zero.
    pub fn rerun_conventions(&mut self) -> u64 {
        let before = self.model.version();

        let mut events = vec![Event::ModelInitialized];

        for entity_type in self.model.entity_types() {
            events.push(Event::EntityTypeAdded {
                entity: entity_type.id(),
            });
        }

        for entity_type in self.model.entity_types() {
            events.push(Event::BaseTypeChanged {
                entity: entity_type.id(),
                old_base: None,
            });
        }

        events.extend(
            self.model
                .properties()
                .map(|property| Event::PropertyAdded {
                    property: property.id(),
                }),
        );
        events.extend(self.model.keys().map(|key| Event::KeyAdded { key: key.id() }));

        for entity_type in self.model.entity_types() {
            if entity_type.primary_key().is_some() {
                events.push(Event::PrimaryKeyChanged {
                    entity: entity_type.id(),
                    previous: entity_type.primary_key(),
                });
            }
        }

        events.extend(self.model.foreign_keys().map(|fk| Event::ForeignKeyAdded {
            foreign_key: fk.id(),
        }));

        self.batch(|builder| {
            for event in events {
                builder.notify(event);
            }
        });

        let changes = self.model.version() - before;
        debug!(changes, "conventions re-run");
        changes
    }

    /// Runs the finalizing conventions, validates the model and returns the
    /// read-only snapshot.
    pub fn finalize(mut self) -> Result<Model> {
        self.notify(Event::ModelFinalizing);

        let mut violations = verify::verify(&self.model);

        if self.overflowed {
            violations.push(Violation::new(
                None,
                "conventions did not converge within the configured event limit",
            ));
        }

        if !violations.is_empty() {
            return Err(Error::invalid_model(violations));
        }

        self.model.finalized = true;
        debug!(
            entity_types = self.model.entity_types.len(),
            version = self.model.version(),
            "model finalized"
        );

        Ok(self.model)
    }

    /// Gets or adds the entity type named `name`.
    ///
    /// Returns `None` if a type of that name was removed at a level `source`
    /// may not override. Adding at an equal or higher level forgets the
    /// removal.
    pub fn add_entity_type(
        &mut self,
        name: impl Into<TypeName>,
        source: ConfigSource,
    ) -> Option<EntityTypeId> {
        let name = name.into();

        if let Some(id) = self.model.names.get(&name).copied() {
            self.claim(id, Aspect::Existence, source);
            return Some(id);
        }

        if let Some(removed_at) = self.model.removed.get(&name).copied() {
            if !source.overrides(Some(removed_at)) {
                debug!(
                    entity_type = %name,
                    %source,
                    %removed_at,
                    "entity type removed at a higher level"
                );
                return None;
            }

            self.model.removed.shift_remove(&name);
        }

        let id = self.model.insert_entity_type(name);
        self.claim(id, Aspect::Existence, source);
        debug!(entity_type = %self.model.entity_type(id).name(), %source, "entity type added");

        self.notify(Event::EntityTypeAdded { entity: id });
        Some(id)
    }

    /// Removes an entity type. Derived types are re-parented to its base and
    /// relationships to or from it are removed first.
    pub fn remove_entity_type(&mut self, id: EntityTypeId, source: ConfigSource) -> bool {
        if !self.model.contains(Target::EntityType(id))
            || !self.can_set(id, Aspect::Existence, source)
        {
            return false;
        }

        self.batch(|builder| {
            let foreign_keys: Vec<_> = builder
                .model
                .foreign_keys()
                .filter(|fk| fk.dependent() == id || fk.principal() == id)
                .map(|fk| fk.id())
                .collect();

            for fk in foreign_keys {
                builder.drop_foreign_key(fk);
            }

            let base = builder.model.entity_type(id).base();
            let derived: Vec<_> = builder.model.derived_types(id).collect();

            for entity in derived {
                builder.model.set_base(entity, base);
                builder.notify(Event::BaseTypeChanged {
                    entity,
                    old_base: Some(id),
                });
            }

            if base.is_some() {
                builder.model.set_base(id, None);
                builder.notify(Event::BaseTypeChanged {
                    entity: id,
                    old_base: base,
                });
            }

            // Members of other types that use the removed properties go with
            // them
            let members = builder.members_outside(id);

            if let Some(removed) = builder.model.remove_entity_type(id) {
                debug!(entity_type = %removed.name(), %source, "entity type removed");
                builder.model.removed.insert(removed.name.clone(), source);

                builder.notify_removed_members(members);
                builder.notify(Event::EntityTypeRemoved {
                    entity: id,
                    name: removed.name,
                    base,
                });
            }
        });

        true
    }

    /// Removal events for the keys, indexes and relationships declared
    /// outside `id`, each paired with the object it removes.
    fn members_outside(&self, id: EntityTypeId) -> Vec<(Target, Event)> {
        let mut members = vec![];

        for key in self.model.keys().filter(|key| key.declaring_entity_type() != id) {
            let entity = key.declaring_entity_type();

            members.push((
                Target::Key(key.id()),
                Event::KeyRemoved {
                    entity,
                    key: key.id(),
                    properties: key.properties().to_vec(),
                },
            ));

            if self.model.entity_type(entity).primary_key() == Some(key.id()) {
                members.push((
                    Target::Key(key.id()),
                    Event::PrimaryKeyChanged {
                        entity,
                        previous: Some(key.id()),
                    },
                ));
            }
        }

        for index in self.model.indices().filter(|index| index.declaring_entity_type() != id) {
            members.push((
                Target::Index(index.id()),
                Event::IndexRemoved {
                    entity: index.declaring_entity_type(),
                    index: index.id(),
                    properties: index.properties().to_vec(),
                },
            ));
        }

        for fk in self.model.foreign_keys().filter(|fk| fk.dependent() != id) {
            members.push((
                Target::ForeignKey(fk.id()),
                Event::ForeignKeyRemoved {
                    dependent: fk.dependent(),
                    principal: fk.principal(),
                    foreign_key: fk.id(),
                    properties: fk.properties().to_vec(),
                },
            ));
        }

        members
    }

    fn notify_removed_members(&mut self, members: Vec<(Target, Event)>) {
        for (target, event) in members {
            if !self.model.contains(target) {
                self.notify(event);
            }
        }
    }

    /// Sets the base type of `id`.
    ///
    /// Returns `Ok(false)` when the base type was configured at a higher
    /// level, and an error if the change would make the type its own
    /// ancestor.
    pub fn set_base_type(
        &mut self,
        id: EntityTypeId,
        base: Option<EntityTypeId>,
        source: ConfigSource,
    ) -> Result<bool> {
        if !self.can_set(id, Aspect::BaseType, source) {
            return Ok(false);
        }

        let old_base = self.model.entity_type(id).base();

        if old_base == base {
            self.claim(id, Aspect::BaseType, source);
            return Ok(true);
        }

        if let Some(base) = base {
            if self.model.is_ancestor_or_self(id, base) {
                return Err(Error::invalid_base_type(
                    self.model.entity_type(id).name(),
                    self.model.entity_type(base).name(),
                ));
            }
        }

        self.claim(id, Aspect::BaseType, source);
        self.model.set_base(id, base);
        debug!(entity_type = ?id, ?old_base, ?base, %source, "base type changed");

        self.notify(Event::BaseTypeChanged { entity: id, old_base });
        Ok(true)
    }

    /// Sets the container name of `id`. `None` clears the configured name so
    /// the type falls back to its root's container or its own short name.
    pub fn set_container_name(
        &mut self,
        id: EntityTypeId,
        name: Option<&str>,
        source: ConfigSource,
    ) -> bool {
        self.write(
            id,
            Aspect::ContainerName,
            source,
            name.map(str::to_string),
            |model| &mut model.entity_type_mut(id).container_name,
        )
        .is_some()
    }

    /// Sets or removes an annotation on any metadata object.
    pub fn set_annotation(
        &mut self,
        target: impl Into<Target>,
        name: AnnotationName,
        value: Option<Value>,
        source: ConfigSource,
    ) -> bool {
        let target = target.into();

        if !self.model.contains(target) {
            return false;
        }

        if !self.claim(target, Aspect::Annotation(name.clone()), source) {
            return false;
        }

        let Some(annotations) = self.model.annotations_mut(target) else {
            return false;
        };

        if annotations.get(&name) == value.as_ref() {
            return true;
        }

        let previous = match value {
            Some(value) => annotations.set(name.clone(), value),
            None => annotations.remove(&name),
        };

        self.model.bump();
        self.notify(Event::AnnotationChanged {
            target,
            name,
            previous,
        });

        true
    }

    /// Records that `convention` could not apply a change to `aspect` of
    /// `target` because of higher-precedence configuration.
    pub fn report_rejected(
        &mut self,
        convention: &'static str,
        target: impl Into<Target>,
        aspect: Aspect,
        message: impl Into<String>,
    ) {
        let target = target.into();
        let current = self.model.ledger.get(&AspectId::new(target, aspect.clone()));
        let message = message.into();

        warn!(convention, ?target, ?aspect, ?current, "{message}");

        if !self.options.report_rejected_conventions {
            return;
        }

        let exists = self.model.diagnostics.iter().any(|diagnostic| {
            diagnostic.convention == convention
                && diagnostic.target == target
                && diagnostic.aspect == aspect
        });

        if !exists {
            self.model.diagnostics.push(Diagnostic {
                convention,
                target,
                aspect,
                current,
                message,
            });
        }
    }

    pub(crate) fn can_set(&self, target: impl Into<Target>, aspect: Aspect, source: ConfigSource) -> bool {
        self.model.ledger.can_set(&AspectId::new(target, aspect), source)
    }

    /// Records `source` for `aspect` if it may override the current level.
    pub(crate) fn claim(&mut self, target: impl Into<Target>, aspect: Aspect, source: ConfigSource) -> bool {
        self.model.ledger.try_set(AspectId::new(target, aspect), source)
    }

    /// Writes `value` into the slot returned by `slot` if `source` may set
    /// `aspect`. Returns `None` when rejected, otherwise whether the value
    /// changed.
    pub(crate) fn write<T: PartialEq>(
        &mut self,
        target: impl Into<Target>,
        aspect: Aspect,
        source: ConfigSource,
        value: T,
        slot: impl FnOnce(&mut Model) -> &mut T,
    ) -> Option<bool> {
        if !self.claim(target, aspect, source) {
            return None;
        }

        let slot = slot(&mut self.model);
        if *slot == value {
            return Some(false);
        }

        *slot = value;
        self.model.bump();
        Some(true)
    }

    /// Queues `event` and dispatches the queue unless an operation further up
    /// the stack will.
    pub(crate) fn notify(&mut self, event: Event) {
        self.pending.push_back(event);
        self.flush();
    }

    fn flush(&mut self) {
        if self.dispatching || self.delayed > 0 {
            return;
        }

        self.dispatching = true;

        while let Some(event) = self.pending.pop_front() {
            if let Some(limit) = self.options.convention_event_limit {
                if self.dispatched >= limit {
                    error!(
                        limit,
                        dropped = self.pending.len() + 1,
                        "convention event limit exceeded; dropping remaining events"
                    );
                    self.pending.clear();
                    self.overflowed = true;
                    break;
                }
            }

            self.dispatched += 1;
            self.dispatch(&event);
        }

        self.dispatching = false;
        self.dispatched = 0;
    }

    fn dispatch(&mut self, event: &Event) {
        let kind = event.kind();
        let handlers = self.conventions.handlers(kind).to_vec();

        debug!(?event, handlers = handlers.len(), "dispatching event");

        for convention in handlers {
            if !event.is_live(&self.model) {
                debug!(?kind, "event subject removed; skipping remaining conventions");
                break;
            }

            debug!(convention = convention.name(), ?kind, "running convention");

            if convention.apply(self, event) == Flow::Stop {
                break;
            }
        }
    }
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("model", &self.model)
            .field("conventions", &self.conventions)
            .field("options", &self.options)
            .field("pending", &self.pending.len())
            .finish()
    }
}
