use crate::utils::error::{JsonError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_INDENT: usize = 2;
pub const MAX_INDENT: usize = 8;

/// Immutable settings shared by every save and load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Write indented text instead of the compact canonical form.
    pub pretty: bool,
    pub indent: usize,
    /// Create missing parent directories on save.
    pub create_dirs: bool,
    /// Refuse to load files larger than this many bytes.
    pub max_file_bytes: Option<u64>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: DEFAULT_INDENT,
            create_dirs: true,
            max_file_bytes: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
    #[serde(default)]
    codec: CodecConfig,
}

impl CodecConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| JsonError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置並驗證
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: ConfigDocument = toml::from_str(content)?;
        document.codec.validate()?;
        Ok(document.codec)
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Validate for CodecConfig {
    fn validate(&self) -> Result<()> {
        validate_range("codec.indent", self.indent, 1, MAX_INDENT)?;

        if let Some(limit) = self.max_file_bytes {
            validate_positive_number("codec.max_file_bytes", limit, 1)?;
        }

        Ok(())
    }
}
