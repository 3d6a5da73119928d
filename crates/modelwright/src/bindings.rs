use modelwright_core::TypeName;

use indexmap::IndexMap;

/// Container names declared for application types at the root of the
/// mapping, e.g. one per collection exposed by a context type.
///
/// Each binding adds its entity type when the model is initialized and names
/// the container of that type while it is a hierarchy root.
#[derive(Debug, Clone, Default)]
pub struct RootBindings {
    bindings: IndexMap<TypeName, String>,
}

impl RootBindings {
    pub fn new() -> RootBindings {
        RootBindings::default()
    }

    /// Binds `ty` to the container `container`, replacing any earlier
    /// binding of the same type.
    pub fn insert(&mut self, ty: impl Into<TypeName>, container: impl Into<String>) -> &mut Self {
        self.bindings.insert(ty.into(), container.into());
        self
    }

    pub fn get(&self, ty: &TypeName) -> Option<&str> {
        self.bindings.get(ty).map(String::as_str)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&TypeName, &str)> {
        self.bindings
            .iter()
            .map(|(ty, container)| (ty, container.as_str()))
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl<T: Into<TypeName>, C: Into<String>> FromIterator<(T, C)> for RootBindings {
    fn from_iter<I: IntoIterator<Item = (T, C)>>(iter: I) -> RootBindings {
        let mut bindings = RootBindings::new();
        for (ty, container) in iter {
            bindings.insert(ty, container);
        }
        bindings
    }
}
