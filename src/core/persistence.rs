use crate::config::CodecConfig;
use crate::core::codec;
use crate::domain::model::{value_kind, JsonObject};
use crate::domain::ports::JsonSerializable;
use crate::utils::error::{JsonError, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Writes `json` to `path` in compact form, creating parent directories.
pub fn save_to_file<P: AsRef<Path>>(json: &JsonObject, path: P) -> Result<()> {
    JsonFiles::new(&CodecConfig::default()).save(json, path)
}

/// Reads a file holding one JSON object.
pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<JsonObject> {
    JsonFiles::new(&CodecConfig::default()).load(path)
}

/// Whole-file JSON persistence driven by a borrowed [`CodecConfig`].
#[derive(Debug, Clone, Copy)]
pub struct JsonFiles<'a> {
    config: &'a CodecConfig,
}

impl<'a> JsonFiles<'a> {
    pub fn new(config: &'a CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        self.config
    }

    /// Renders the UTF-8 text written by [`JsonFiles::save`]. No trailing newline.
    pub fn render(&self, json: &JsonObject) -> Result<Vec<u8>> {
        if !self.config.pretty {
            return Ok(serde_json::to_vec(json)?);
        }

        let indent = " ".repeat(self.config.indent);
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
        json.serialize(&mut serializer)?;
        Ok(buffer)
    }

    pub fn save<P: AsRef<Path>>(&self, json: &JsonObject, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.render(json)?;

        if self.config.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| JsonError::io(parent, e))?;
            }
        }

        let file = File::create(path).map_err(|e| JsonError::io(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(&bytes)
            .and_then(|_| writer.flush())
            .map_err(|e| JsonError::io(path, e))?;

        tracing::debug!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<JsonObject> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| JsonError::io(path, e))?;

        // 以實際讀到的位元組計算上限，FIFO 等特殊檔案的 metadata 長度為 0
        let limit = self.config.max_file_bytes;
        let mut bytes = Vec::new();
        BufReader::new(file)
            .take(limit.map_or(u64::MAX, |limit| limit.saturating_add(1)))
            .read_to_end(&mut bytes)
            .map_err(|e| JsonError::io(path, e))?;

        if let Some(limit) = limit {
            if bytes.len() as u64 > limit {
                return Err(JsonError::io(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("file exceeds the {} byte limit", limit),
                    ),
                ));
            }
        }

        let content = String::from_utf8(bytes).map_err(|e| {
            JsonError::io(path, std::io::Error::new(std::io::ErrorKind::InvalidData, e))
        })?;

        // 逐行串接，換行符號不保留
        let text: String = content.lines().collect();

        let value: Value = serde_json::from_str(&text).map_err(|source| JsonError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        match value {
            Value::Object(object) => {
                tracing::debug!("Loaded {} keys from {}", object.len(), path.display());
                Ok(object)
            }
            other => Err(JsonError::NotAnObject {
                path: path.to_path_buf(),
                found: value_kind(&other),
            }),
        }
    }

    pub fn save_serializable<T: JsonSerializable, P: AsRef<Path>>(
        &self,
        value: &T,
        path: P,
    ) -> Result<()> {
        self.save(&value.serialize(), path)
    }

    pub fn load_serializable<T: JsonSerializable, P: AsRef<Path>>(&self, path: P) -> Result<T> {
        let json = self.load(path)?;
        codec::deserialize(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::JsonObjectExt;
    use crate::utils::error::ErrorKind;
    use tempfile::TempDir;

    fn sample() -> JsonObject {
        let mut json = JsonObject::new();
        json.put("name", "kiln")
            .put("temperature", &1280.5)
            .put("active", &true)
            .put("zones", &[1, 2, 3]);
        json
    }

    #[test]
    fn test_compact_render_has_no_trailing_newline() {
        let config = CodecConfig::default();
        let text = JsonFiles::new(&config).render(&sample()).unwrap();
        assert_eq!(
            String::from_utf8(text).unwrap(),
            r#"{"name":"kiln","temperature":1280.5,"active":true,"zones":[1,2,3]}"#
        );
    }

    #[test]
    fn test_pretty_render_uses_indent() {
        let config = CodecConfig {
            pretty: true,
            indent: 4,
            ..CodecConfig::default()
        };
        let text = String::from_utf8(JsonFiles::new(&config).render(&sample()).unwrap()).unwrap();
        assert!(text.starts_with("{\n    \"name\": \"kiln\""));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_multiline_file_loads_like_single_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("multi.json");
        fs::write(&path, "{\r\n  \"a\": 1,\n  \"b\": [true,\nfalse]\n}\n").unwrap();

        let loaded = load_from_file(&path).unwrap();
        assert_eq!(loaded.required::<i32>("a").unwrap(), 1);
        assert_eq!(loaded.required::<Vec<bool>>("b").unwrap(), vec![true, false]);
    }

    #[test]
    fn test_without_create_dirs_missing_parent_fails() {
        let dir = TempDir::new().unwrap();
        let config = CodecConfig {
            create_dirs: false,
            ..CodecConfig::default()
        };

        let err = JsonFiles::new(&config)
            .save(&sample(), dir.path().join("absent/file.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_size_limit_rejects_large_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("big.json");
        save_to_file(&sample(), &path).unwrap();

        let config = CodecConfig {
            max_file_bytes: Some(8),
            ..CodecConfig::default()
        };
        let err = JsonFiles::new(&config).load(&path).unwrap_err();
        match err {
            JsonError::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_size_limit_applies_to_fifo() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pipe.json");
        let created = std::process::Command::new("mkfifo")
            .arg(&path)
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        assert!(created, "mkfifo is required for this test");

        let writer_path = path.clone();
        let writer = std::thread::spawn(move || {
            if let Ok(mut pipe) = fs::OpenOptions::new().write(true).open(&writer_path) {
                let _ = pipe.write_all(format!("{{\"payload\":\"{}\"}}", "x".repeat(64)).as_bytes());
            }
        });

        let config = CodecConfig {
            max_file_bytes: Some(16),
            ..CodecConfig::default()
        };
        let err = JsonFiles::new(&config).load(&path).unwrap_err();
        writer.join().unwrap();

        match err {
            JsonError::Io { source, .. } => {
                assert_eq!(source.kind(), std::io::ErrorKind::InvalidData)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_size_limit_allows_file_at_limit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exact.json");
        fs::write(&path, r#"{"a":1}"#).unwrap();

        let config = CodecConfig {
            max_file_bytes: Some(7),
            ..CodecConfig::default()
        };
        let loaded = JsonFiles::new(&config).load(&path).unwrap();
        assert_eq!(loaded.required::<i32>("a").unwrap(), 1);
    }

    #[test]
    fn test_non_object_and_invalid_text() {
        let dir = TempDir::new().unwrap();

        let array = dir.path().join("array.json");
        fs::write(&array, "[1, 2]").unwrap();
        assert!(matches!(
            load_from_file(&array).unwrap_err(),
            JsonError::NotAnObject { found: "array", .. }
        ));

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{\"a\": ").unwrap();
        let err = load_from_file(&broken).unwrap_err();
        assert!(matches!(err, JsonError::Parse { .. }));
        assert_eq!(err.kind(), ErrorKind::Parse);
    }
}
