use crate::domain::model::JsonObject;
use crate::utils::error::FieldError;

/// A type that can project its state into a [`JsonObject`] and be rebuilt
/// from one.
///
/// Implementations must uphold the round-trip law:
/// `T::reconstruct(&value.serialize())` yields a value equal to `value`.
pub trait JsonSerializable: Sized {
    /// Writes every field needed for reconstruction. Must not mutate `self`.
    fn serialize(&self) -> JsonObject;

    /// Reconstruction entry point. Fails instead of returning a partially
    /// initialized value when a field is missing or malformed.
    fn reconstruct(json: &JsonObject) -> Result<Self, FieldError>;

    /// Stable name used for registry lookups and tagged envelopes.
    fn type_name() -> &'static str {
        std::any::type_name::<Self>()
    }
}
