//! Convention pipeline: event kinds, the [`Convention`] trait and the ordered
//! registry of handlers per event kind.

mod event;
pub use event::{Event, EventKind};

use crate::Builder;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Whether later handlers for the same event instance should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,

    /// Skip the remaining handlers for this event
    Stop,
}

/// A rule deriving configuration in reaction to a model change.
///
/// Conventions mutate the model through the [`Builder`] at
/// [`ConfigSource::Convention`](crate::ConfigSource::Convention) level and
/// never fail. A write rejected by higher-precedence configuration is how a
/// convention opts out.
pub trait Convention {
    /// Name used in logs and diagnostics.
    fn name(&self) -> &'static str;

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow;
}

/// Ordered handlers for each event kind.
///
/// Handlers run in registration order. The same convention instance may be
/// registered for several kinds.
#[derive(Default, Clone)]
pub struct ConventionSet {
    slots: IndexMap<EventKind, Vec<Rc<dyn Convention>>>,
}

struct FnConvention<F> {
    name: &'static str,
    f: F,
}

impl ConventionSet {
    pub fn new() -> ConventionSet {
        ConventionSet::default()
    }

    /// Appends `convention` to the handlers of `kind`.
    pub fn add(&mut self, kind: EventKind, convention: impl Convention + 'static) -> &mut Self {
        self.register(&[kind], convention)
    }

    /// Appends one shared instance of `convention` to the handlers of every
    /// kind in `kinds`.
    pub fn register(
        &mut self,
        kinds: &[EventKind],
        convention: impl Convention + 'static,
    ) -> &mut Self {
        let convention: Rc<dyn Convention> = Rc::new(convention);

        for kind in kinds {
            self.slots
                .entry(*kind)
                .or_default()
                .push(convention.clone());
        }

        self
    }

    /// Registers a closure as a convention.
    pub fn add_fn<F>(&mut self, kind: EventKind, name: &'static str, f: F) -> &mut Self
    where
        F: Fn(&mut Builder, &Event) -> Flow + 'static,
    {
        self.add(kind, FnConvention { name, f })
    }

    /// Removes every registration of the convention named `name`. Returns
    /// `true` if anything was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let mut removed = false;

        for handlers in self.slots.values_mut() {
            let before = handlers.len();
            handlers.retain(|convention| convention.name() != name);
            removed |= handlers.len() != before;
        }

        removed
    }

    pub fn handlers(&self, kind: EventKind) -> &[Rc<dyn Convention>] {
        self.slots.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of the handlers registered for `kind`, in order.
    pub fn names(&self, kind: EventKind) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers(kind).iter().map(|convention| convention.name())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.values().all(Vec::is_empty)
    }
}

impl fmt::Debug for ConventionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, handlers) in &self.slots {
            let names: Vec<_> = handlers.iter().map(|c| c.name()).collect();
            map.entry(kind, &names);
        }
        map.finish()
    }
}

impl<F> Convention for FnConvention<F>
where
    F: Fn(&mut Builder, &Event) -> Flow,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        (self.f)(builder, event)
    }
}
