use crate::RootBindings;
use modelwright_core::{Builder, ConfigSource, Convention, Event, Flow};

use std::rc::Rc;
use tracing::debug;

/// Adds an entity type for every root binding when the model is
/// initialized.
#[derive(Debug)]
pub struct RootBindingDiscoveryConvention {
    bindings: Rc<RootBindings>,
}

impl RootBindingDiscoveryConvention {
    pub fn new(bindings: Rc<RootBindings>) -> Self {
        RootBindingDiscoveryConvention { bindings }
    }
}

impl Convention for RootBindingDiscoveryConvention {
    fn name(&self) -> &'static str {
        "root_binding_discovery"
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        if let Event::ModelInitialized = event {
            debug!(bindings = self.bindings.len(), "discovering root bindings");

            for (ty, _) in self.bindings.iter() {
                builder.add_entity_type(ty, ConfigSource::Convention);
            }
        }

        Flow::Continue
    }
}
