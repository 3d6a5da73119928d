mod discriminators;
mod relationships;

use crate::metadata::{EntityType, Model, TypeName};
use std::fmt;

/// One structural problem found while finalizing a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// The entity type the problem was found on, if any
    pub entity: Option<TypeName>,

    pub message: String,
}

struct Verify<'a> {
    model: &'a Model,
    violations: Vec<Violation>,
}

/// Checks every structural invariant of `model` and returns all violations.
pub(crate) fn verify(model: &Model) -> Vec<Violation> {
    let mut verify = Verify {
        model,
        violations: vec![],
    };
    verify.verify();
    verify.violations
}

impl Violation {
    pub fn new(entity: Option<TypeName>, message: impl Into<String>) -> Violation {
        Violation {
            entity,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.entity {
            Some(entity) => write!(f, "`{entity}`: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl Verify<'_> {
    fn verify(&mut self) {
        let model = self.model;
        let mut acyclic = true;

        for entity_type in model.entity_types() {
            if self.verify_base_chain_is_acyclic(entity_type) {
                self.verify_primary_key_on_root(entity_type);
                self.verify_property_names_are_unique(entity_type);
            } else {
                acyclic = false;
            }
        }

        // Hierarchy walks are only meaningful once every chain terminates
        if !acyclic {
            return;
        }

        for entity_type in model.entity_types() {
            self.verify_members_are_visible(entity_type);

            if entity_type.is_root() {
                self.verify_discriminator(entity_type);
            } else {
                self.verify_no_discriminator_off_root(entity_type);
            }
        }

        for fk in model.foreign_keys() {
            self.verify_foreign_key(fk);
        }
    }

    fn report(&mut self, entity_type: &EntityType, message: impl Into<String>) {
        self.violations
            .push(Violation::new(Some(entity_type.name().clone()), message));
    }

    fn verify_base_chain_is_acyclic(&mut self, entity_type: &EntityType) -> bool {
        let model = self.model;
        let id = entity_type.id();
        let mut seen = vec![id];

        for ancestor in model.ancestors(id) {
            if seen.contains(&ancestor) {
                self.report(entity_type, "base type chain contains a cycle");
                return false;
            }
            seen.push(ancestor);
        }

        true
    }

    fn verify_primary_key_on_root(&mut self, entity_type: &EntityType) {
        if !entity_type.is_root() && entity_type.primary_key().is_some() {
            self.report(entity_type, "primary key declared on a derived type");
        }
    }

    fn verify_property_names_are_unique(&mut self, entity_type: &EntityType) {
        let model = self.model;
        let properties = model.properties_of(entity_type.id());

        for (i, property) in properties.iter().enumerate() {
            let duplicate = properties[..i]
                .iter()
                .any(|other| other.name() == property.name());

            if duplicate && property.declaring_entity_type() == entity_type.id() {
                self.report(
                    entity_type,
                    format!("property `{}` is declared more than once in the hierarchy", property.name()),
                );
            }
        }
    }

    fn verify_members_are_visible(&mut self, entity_type: &EntityType) {
        let model = self.model;
        let id = entity_type.id();

        for key in entity_type.keys() {
            let key = model.key(*key);
            if !key.properties().iter().all(|p| model.is_visible(id, *p)) {
                self.report(entity_type, "key uses a property not visible on the type");
            }
        }

        for index in entity_type.indices() {
            let index = model.index(*index);
            if !index.properties().iter().all(|p| model.is_visible(id, *p)) {
                self.report(entity_type, "index uses a property not visible on the type");
            }
        }

        for fk in entity_type.foreign_keys() {
            let fk = model.foreign_key(*fk);
            if !fk.properties().iter().all(|p| model.is_visible(id, *p)) {
                self.report(
                    entity_type,
                    "foreign key uses a property not visible on the type",
                );
            }
        }
    }
}
