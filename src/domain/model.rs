use crate::domain::ports::JsonSerializable;
use crate::utils::error::{FieldError, JsonError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Insertion-ordered JSON object; the interchange value of this crate.
pub type JsonObject = serde_json::Map<String, Value>;

/// Lookup key for a reconstructible type.
///
/// Equality and hashing use the `TypeId` only; the name is a label, so a type
/// registered under a custom name still compares equal to
/// `TypeDescriptor::of::<T>()`.
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl TypeDescriptor {
    pub fn of<T: JsonSerializable + 'static>() -> Self {
        Self::named::<T>(T::type_name())
    }

    pub fn named<T: 'static>(name: &'static str) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Short name of a JSON value's kind, used in error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Field accessors for reconstruction entry points.
pub trait JsonObjectExt {
    /// Reads and converts a field that must be present and non-null.
    fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, FieldError>;

    /// Reads a field that may be absent or null.
    fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FieldError>;

    fn required_object(&self, key: &str) -> Result<&JsonObject, FieldError>;

    /// Inserts a value that may fail to convert, such as a map with
    /// non-string keys. On failure the object is left unchanged.
    fn try_put<T: Serialize + ?Sized>(&mut self, key: &str, value: &T)
        -> Result<&mut Self, JsonError>;

    /// Inserts a value whose conversion cannot fail (scalars, strings,
    /// sequences, string-keyed maps). A conversion failure is logged and the
    /// field is stored as null; use [`JsonObjectExt::try_put`] when it can happen.
    fn put<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> &mut Self;
}

fn convert<T: DeserializeOwned>(key: &str, value: &Value) -> Result<T, FieldError> {
    T::deserialize(value).map_err(|e| {
        FieldError::invalid(
            key,
            std::any::type_name::<T>(),
            format!("{} ({})", value_kind(value), e),
        )
    })
}

impl JsonObjectExt for JsonObject {
    fn required<T: DeserializeOwned>(&self, key: &str) -> Result<T, FieldError> {
        match self.get(key) {
            None | Some(Value::Null) => Err(FieldError::missing(key)),
            Some(value) => convert(key, value),
        }
    }

    fn optional<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FieldError> {
        match self.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => convert(key, value).map(Some),
        }
    }

    fn required_object(&self, key: &str) -> Result<&JsonObject, FieldError> {
        match self.get(key) {
            None | Some(Value::Null) => Err(FieldError::missing(key)),
            Some(Value::Object(object)) => Ok(object),
            Some(other) => Err(FieldError::invalid(key, "object", value_kind(other))),
        }
    }

    fn try_put<T: Serialize + ?Sized>(
        &mut self,
        key: &str,
        value: &T,
    ) -> Result<&mut Self, JsonError> {
        let value = serde_json::to_value(value).map_err(|source| JsonError::FieldSerialization {
            field: key.to_string(),
            source,
        })?;
        self.insert(key.to_string(), value);
        Ok(self)
    }

    fn put<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> &mut Self {
        let value = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::warn!("Field {} could not be converted to JSON, storing null: {}", key, e);
            Value::Null
        });
        self.insert(key.to_string(), value);
        self
    }
}
