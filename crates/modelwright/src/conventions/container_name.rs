use crate::RootBindings;
use modelwright_core::metadata::EntityTypeId;
use modelwright_core::{Aspect, Builder, ConfigSource, Convention, Event, Flow};

use std::rc::Rc;

/// Names the container of a root entity type after its root binding.
///
/// A type that gains a base type loses its convention-level container name,
/// since derived types share the container of their root.
#[derive(Debug)]
pub struct ContainerNameConvention {
    bindings: Rc<RootBindings>,
}

impl ContainerNameConvention {
    pub fn new(bindings: Rc<RootBindings>) -> Self {
        ContainerNameConvention { bindings }
    }

    fn apply_binding(&self, builder: &mut Builder, entity: EntityTypeId) {
        let entity_type = builder.model().entity_type(entity);

        if !entity_type.is_root() {
            return;
        }

        if let Some(container) = self.bindings.get(entity_type.name()) {
            let container = container.to_string();
            builder
                .entity(entity, ConfigSource::Convention)
                .container_name(Some(&container));
        }
    }
}

impl Convention for ContainerNameConvention {
    fn name(&self) -> &'static str {
        "container_name"
    }

    fn apply(&self, builder: &mut Builder, event: &Event) -> Flow {
        match *event {
            Event::EntityTypeAdded { entity } => self.apply_binding(builder, entity),
            Event::BaseTypeChanged { entity, .. } => {
                let entity_type = builder.model().entity_type(entity);

                if entity_type.is_root() {
                    self.apply_binding(builder, entity);
                } else if entity_type.configured_container_name().is_some()
                    && !builder
                        .entity(entity, ConfigSource::Convention)
                        .container_name(None)
                {
                    builder.report_rejected(
                        self.name(),
                        entity,
                        Aspect::ContainerName,
                        "derived type keeps a container name configured at a higher level",
                    );
                }
            }
            _ => {}
        }

        Flow::Continue
    }
}
