use crate::domain::model::{value_kind, JsonObject, TypeDescriptor};
use crate::domain::ports::JsonSerializable;
use crate::utils::error::{FieldError, JsonError, Result};
use serde_json::Value;
use std::any::{Any, TypeId};
use std::collections::HashMap;

pub const TAG_FIELD: &str = "type";
pub const DATA_FIELD: &str = "data";

const ENVELOPE: &str = "tagged envelope";

/// Rebuilds a `T` from its JSON projection.
///
/// The entry point is a required trait item, so a missing one is a compile
/// error here. Failures inside it surface as [`JsonError::Construction`].
pub fn deserialize<T: JsonSerializable>(json: &JsonObject) -> Result<T> {
    tracing::debug!("Reconstructing {} from {} fields", T::type_name(), json.len());
    T::reconstruct(json).map_err(|source| construction_failed(T::type_name(), source))
}

fn construction_failed(type_name: &str, source: FieldError) -> JsonError {
    tracing::warn!("Failed to reconstruct {}: {}", type_name, source);
    JsonError::Construction {
        type_name: type_name.to_string(),
        source,
    }
}

type Factory = fn(&JsonObject) -> std::result::Result<Box<dyn Any>, FieldError>;

fn reconstruct_boxed<T: JsonSerializable + 'static>(
    json: &JsonObject,
) -> std::result::Result<Box<dyn Any>, FieldError> {
    T::reconstruct(json).map(|value| Box::new(value) as Box<dyn Any>)
}

#[derive(Clone, Copy)]
struct Entry {
    descriptor: TypeDescriptor,
    factory: Factory,
}

/// Explicit type-to-factory registry for types chosen at run time.
///
/// Built once at startup, then only read. Holds plain function pointers, so a
/// finished registry can be shared across threads.
#[derive(Default, Clone)]
pub struct CodecRegistry {
    entries: HashMap<TypeId, Entry>,
    names: HashMap<&'static str, TypeId>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: JsonSerializable + 'static>(&mut self) -> &mut Self {
        self.register_as::<T>(T::type_name())
    }

    /// Registers `T` under a caller-chosen name. Registering a type again, or
    /// reusing a name, replaces the previous entry.
    pub fn register_as<T: JsonSerializable + 'static>(&mut self, name: &'static str) -> &mut Self {
        let descriptor = TypeDescriptor::named::<T>(name);

        if let Some(previous) = self.entries.remove(&descriptor.id()) {
            self.names.remove(previous.descriptor.name());
        }
        if let Some(owner) = self.names.remove(name) {
            tracing::warn!("Name {} was bound to another type; replacing it", name);
            self.entries.remove(&owner);
        }

        tracing::debug!("Registered reconstruction entry point for {}", name);
        self.names.insert(name, descriptor.id());
        self.entries.insert(
            descriptor.id(),
            Entry {
                descriptor,
                factory: reconstruct_boxed::<T>,
            },
        );
        self
    }

    pub fn is_registered(&self, descriptor: &TypeDescriptor) -> bool {
        self.entries.contains_key(&descriptor.id())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.values().map(|entry| &entry.descriptor)
    }

    /// Looks up a descriptor by its registered name.
    pub fn descriptor_named(&self, name: &str) -> Option<TypeDescriptor> {
        self.names
            .get(name)
            .and_then(|id| self.entries.get(id))
            .map(|entry| entry.descriptor)
    }

    fn entry_for(&self, id: TypeId, type_name: &str) -> Result<&Entry> {
        self.entries.get(&id).ok_or_else(|| {
            tracing::warn!("No reconstruction entry point registered for {}", type_name);
            JsonError::Configuration {
                type_name: type_name.to_string(),
            }
        })
    }

    fn invoke(entry: &Entry, json: &JsonObject) -> Result<Box<dyn Any>> {
        let name = entry.descriptor.name();
        tracing::debug!("Dispatching {} fields to {}", json.len(), name);
        (entry.factory)(json).map_err(|source| construction_failed(name, source))
    }

    /// Rebuilds a `T` through its registered entry point.
    pub fn deserialize<T: 'static>(&self, json: &JsonObject) -> Result<T> {
        let type_name = std::any::type_name::<T>();
        let entry = self.entry_for(TypeId::of::<T>(), type_name)?;
        let value = Self::invoke(entry, json)?;
        value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| JsonError::Configuration {
                type_name: type_name.to_string(),
            })
    }

    pub fn deserialize_dyn(
        &self,
        descriptor: &TypeDescriptor,
        json: &JsonObject,
    ) -> Result<Box<dyn Any>> {
        let entry = self.entry_for(descriptor.id(), descriptor.name())?;
        Self::invoke(entry, json)
    }

    pub fn deserialize_named(&self, name: &str, json: &JsonObject) -> Result<Box<dyn Any>> {
        let id = self
            .names
            .get(name)
            .copied()
            .ok_or_else(|| JsonError::Configuration {
                type_name: name.to_string(),
            })?;
        let entry = self.entry_for(id, name)?;
        Self::invoke(entry, json)
    }

    /// Wraps `value` as `{"type": <registered name>, "data": <serialize()>}`.
    pub fn to_tagged<T: JsonSerializable + 'static>(&self, value: &T) -> Result<JsonObject> {
        let entry = self.entry_for(TypeId::of::<T>(), T::type_name())?;

        let mut envelope = JsonObject::new();
        envelope.insert(
            TAG_FIELD.to_string(),
            Value::String(entry.descriptor.name().to_string()),
        );
        envelope.insert(DATA_FIELD.to_string(), Value::Object(value.serialize()));
        Ok(envelope)
    }

    /// Reads the tag of an envelope produced by [`CodecRegistry::to_tagged`]
    /// and dispatches its payload by name.
    pub fn deserialize_tagged(&self, envelope: &JsonObject) -> Result<Box<dyn Any>> {
        let tag = match envelope.get(TAG_FIELD) {
            Some(Value::String(tag)) => tag,
            None | Some(Value::Null) => {
                return Err(construction_failed(ENVELOPE, FieldError::missing(TAG_FIELD)))
            }
            Some(other) => {
                return Err(construction_failed(
                    ENVELOPE,
                    FieldError::invalid(TAG_FIELD, "string", value_kind(other)),
                ))
            }
        };

        let data = match envelope.get(DATA_FIELD) {
            Some(Value::Object(data)) => data,
            None | Some(Value::Null) => {
                return Err(construction_failed(ENVELOPE, FieldError::missing(DATA_FIELD)))
            }
            Some(other) => {
                return Err(construction_failed(
                    ENVELOPE,
                    FieldError::invalid(DATA_FIELD, "object", value_kind(other)),
                ))
            }
        };

        self.deserialize_named(tag, data)
    }
}
