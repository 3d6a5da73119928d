use super::Value;
use std::fmt;

/// Declared type of a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    Bool,
    I16,
    I32,
    I64,
    F64,
    String,
    Uuid,
    Bytes,
}

impl Type {
    pub fn is_integer(self) -> bool {
        matches!(self, Type::I16 | Type::I32 | Type::I64)
    }

    pub fn is_textual(self) -> bool {
        matches!(self, Type::String)
    }

    /// Returns `true` if `value` can be stored in a property of this type.
    ///
    /// Integers widen (an `I16` value fits an `I64` property). `Null` is never
    /// compatible; nullability is a property of the field, not of its type.
    pub fn is_compatible(self, value: &Value) -> bool {
        match (self, value) {
            (Type::Bool, Value::Bool(_)) => true,
            (Type::I16, Value::I16(_)) => true,
            (Type::I32, Value::I16(_) | Value::I32(_)) => true,
            (Type::I64, Value::I16(_) | Value::I32(_) | Value::I64(_)) => true,
            (Type::F64, Value::F64(_)) => true,
            (Type::String, Value::String(_)) => true,
            (Type::Uuid, Value::Uuid(_)) => true,
            (Type::Bytes, Value::Bytes(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Type::Bool => "bool",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::String => "String",
            Type::Uuid => "Uuid",
            Type::Bytes => "Bytes",
        };
        f.write_str(name)
    }
}
