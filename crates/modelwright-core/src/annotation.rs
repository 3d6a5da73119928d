//! Namespaced key/value extension slots.
//!
//! The store itself never refuses a write. Precedence is enforced by the
//! builder, which records provenance for every annotation it sets.

use crate::Value;
use indexmap::IndexMap;
use std::fmt;

/// Annotation name, qualified by the namespace of the subsystem owning it.
///
/// Two subsystems may both use `CollectionName` without colliding as long as
/// their namespaces differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnotationName {
    namespace: String,
    name: String,
}

/// Annotations attached to one metadata object, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Annotations {
    entries: IndexMap<AnnotationName, Value>,
}

impl AnnotationName {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> AnnotationName {
        AnnotationName {
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for AnnotationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)
    }
}

impl<N: Into<String>, M: Into<String>> From<(N, M)> for AnnotationName {
    fn from((namespace, name): (N, M)) -> AnnotationName {
        AnnotationName::new(namespace, name)
    }
}

impl Annotations {
    pub fn get(&self, name: &AnnotationName) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &AnnotationName) -> bool {
        self.entries.contains_key(name)
    }

    /// Stores `value` under `name`, returning the value it replaces.
    pub fn set(&mut self, name: AnnotationName, value: Value) -> Option<Value> {
        self.entries.insert(name, value)
    }

    pub fn remove(&mut self, name: &AnnotationName) -> Option<Value> {
        self.entries.shift_remove(name)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&AnnotationName, &Value)> {
        self.entries.iter()
    }

    /// Annotations belonging to one namespace.
    pub fn in_namespace<'a>(
        &'a self,
        namespace: &'a str,
    ) -> impl Iterator<Item = (&'a AnnotationName, &'a Value)> + 'a {
        self.entries
            .iter()
            .filter(move |(name, _)| name.namespace == namespace)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_do_not_collide() {
        let mut annotations = Annotations::default();
        let mongo = AnnotationName::new("mongo", "CollectionName");
        let cosmos = AnnotationName::new("cosmos", "CollectionName");

        annotations.set(mongo.clone(), Value::from("orders"));
        annotations.set(cosmos.clone(), Value::from("Orders"));

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations.get(&mongo), Some(&Value::from("orders")));
        assert_eq!(annotations.get(&cosmos), Some(&Value::from("Orders")));
        assert_eq!(annotations.in_namespace("mongo").count(), 1);
    }

    #[test]
    fn missing_annotation_is_none() {
        let annotations = Annotations::default();
        assert_eq!(annotations.get(&AnnotationName::new("core", "Comment")), None);
    }

    #[test]
    fn set_returns_replaced_value() {
        let mut annotations = Annotations::default();
        let name = AnnotationName::new("core", "Comment");

        assert_eq!(annotations.set(name.clone(), Value::from("a")), None);
        assert_eq!(
            annotations.set(name.clone(), Value::from("b")),
            Some(Value::from("a"))
        );
        assert_eq!(annotations.remove(&name), Some(Value::from("b")));
        assert!(annotations.is_empty());
    }

    #[test]
    fn display_is_qualified() {
        assert_eq!(
            AnnotationName::from(("relational", "TableName")).to_string(),
            "relational:TableName"
        );
    }
}
