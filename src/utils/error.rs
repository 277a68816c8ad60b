use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a reconstruction entry point while reading its fields.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("missing required field `{field}`")]
    Missing { field: String },

    #[error("field `{field}` is invalid: expected {expected}, found {found}")]
    Invalid {
        field: String,
        expected: String,
        found: String,
    },

    #[error("invariant violated: {message}")]
    Invariant { message: String },
}

impl FieldError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing {
            field: field.into(),
        }
    }

    pub fn invalid(
        field: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            field: field.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant {
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Configuration error: type {type_name} has no registered reconstruction entry point")]
    Configuration { type_name: String },

    #[error("Construction error: failed to build {type_name}: {source}")]
    Construction {
        type_name: String,
        #[source]
        source: FieldError,
    },

    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Parse error in {}: expected a JSON object, found {found}", .path.display())]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Serialization error in field `{field}`: {source}")]
    FieldSerialization {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Invalid config value for {field} ({value}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Coarse classification used by callers deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Construction,
    Io,
    Parse,
}

impl JsonError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            JsonError::Configuration { .. }
            | JsonError::ConfigParse(_)
            | JsonError::InvalidConfigValue { .. } => ErrorKind::Configuration,
            JsonError::Construction { .. } => ErrorKind::Construction,
            JsonError::Io { .. } => ErrorKind::Io,
            JsonError::Parse { .. }
            | JsonError::NotAnObject { .. }
            | JsonError::Serialization(_)
            | JsonError::FieldSerialization { .. } => ErrorKind::Parse,
        }
    }

    /// 依錯誤類型決定 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.kind() {
            ErrorKind::Parse | ErrorKind::Construction => 2,
            ErrorKind::Configuration | ErrorKind::Io => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, JsonError>;
