pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use config::CodecConfig;
pub use core::codec::{deserialize, CodecRegistry};
pub use core::persistence::{load_from_file, save_to_file, JsonFiles};
pub use domain::model::{JsonObject, JsonObjectExt, TypeDescriptor};
pub use domain::ports::JsonSerializable;
pub use utils::error::{ErrorKind, FieldError, JsonError, Result};
