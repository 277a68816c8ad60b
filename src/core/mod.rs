pub mod codec;
pub mod persistence;

pub use crate::domain::model::{JsonObject, JsonObjectExt, TypeDescriptor};
pub use crate::domain::ports::JsonSerializable;
pub use crate::utils::error::Result;
