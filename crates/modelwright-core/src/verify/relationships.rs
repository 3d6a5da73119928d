use super::*;
use crate::metadata::{ForeignKey, Type};

impl Verify<'_> {
    pub(super) fn verify_foreign_key(&mut self, fk: &ForeignKey) {
        let model = self.model;
        let dependent = model.entity_type(fk.dependent());
        let principal = model.entity_type(fk.principal());
        let key = model.key(fk.principal_key());

        if fk.properties().len() != key.properties().len() {
            self.report(
                dependent,
                format!(
                    "foreign key to `{}` has {} properties but the principal key has {}",
                    principal.name(),
                    fk.properties().len(),
                    key.properties().len()
                ),
            );
            return;
        }

        for (dependent_property, principal_property) in fk.properties().iter().zip(key.properties()) {
            let dependent_property = model.property(*dependent_property);
            let principal_property = model.property(*principal_property);

            if !types_are_compatible(dependent_property.ty(), principal_property.ty()) {
                self.report(
                    dependent,
                    format!(
                        "foreign key property `{}` of type `{}` does not match `{}.{}` of type `{}`",
                        dependent_property.name(),
                        dependent_property.ty(),
                        principal.short_name(),
                        principal_property.name(),
                        principal_property.ty()
                    ),
                );
            }
        }
    }
}

fn types_are_compatible(dependent: Type, principal: Type) -> bool {
    dependent == principal || (dependent.is_integer() && principal.is_integer())
}
