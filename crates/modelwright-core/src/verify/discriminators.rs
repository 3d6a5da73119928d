use super::*;
use crate::metadata::Value;

impl Verify<'_> {
    /// A hierarchy with derived types needs a discriminator property on its
    /// root and a distinct, well-typed value on every type.
    pub(super) fn verify_discriminator(&mut self, root: &EntityType) {
        let model = self.model;
        let hierarchy = model.hierarchy(root.id());

        let Some(property) = root.declared_discriminator_property() else {
            if hierarchy.len() > 1 {
                self.report(root, "hierarchy has derived types but no discriminator property");
            }
            return;
        };

        let property = model.property(property);

        if property.declaring_entity_type() != root.id() {
            self.report(
                root,
                format!(
                    "discriminator property `{}` is declared by another type",
                    property.name()
                ),
            );
        }

        let mut seen: Vec<&Value> = vec![];

        for id in hierarchy {
            let entity_type = model.entity_type(id);

            let Some(value) = entity_type.discriminator_value() else {
                self.report(entity_type, "missing discriminator value");
                continue;
            };

            if !property.ty().is_compatible(value) {
                self.report(
                    entity_type,
                    format!(
                        "discriminator value `{value}` is not compatible with `{}`",
                        property.ty()
                    ),
                );
            }

            if seen.contains(&value) {
                self.report(
                    entity_type,
                    format!("discriminator value `{value}` is used by another type in the hierarchy"),
                );
            }

            seen.push(value);
        }
    }

    pub(super) fn verify_no_discriminator_off_root(&mut self, entity_type: &EntityType) {
        if entity_type.declared_discriminator_property().is_some() {
            self.report(entity_type, "discriminator property declared on a derived type");
        }
    }
}
