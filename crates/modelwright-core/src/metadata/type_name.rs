use std::fmt;

/// Stable identity of an application type, e.g. `billing::Invoice`.
///
/// Path segments are separated by `::`. The last segment is the short name,
/// which seeds the default container name and discriminator value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> TypeName {
        TypeName(name.into())
    }

    /// The identity of a Rust type, as reported by [`std::any::type_name`].
    pub fn of<T: ?Sized>() -> TypeName {
        TypeName::new(std::any::type_name::<T>())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last path segment, ignoring generic arguments.
    pub fn short_name(&self) -> &str {
        let path = match self.0.find('<') {
            Some(generics) => &self.0[..generics],
            None => &self.0,
        };
        path.rsplit("::").next().unwrap_or(path)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(src: &str) -> TypeName {
        TypeName::new(src)
    }
}

impl From<String> for TypeName {
    fn from(src: String) -> TypeName {
        TypeName(src)
    }
}

impl From<&TypeName> for TypeName {
    fn from(src: &TypeName) -> TypeName {
        src.clone()
    }
}
