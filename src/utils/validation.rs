use crate::utils::error::{JsonError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(JsonError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(JsonError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(JsonError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(JsonError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("codec.max_file_bytes", 5, 1).is_ok());
        assert!(validate_positive_number("codec.max_file_bytes", 0, 1).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("codec.indent", 2usize, 1, 8).is_ok());
        assert!(validate_range("codec.indent", 0usize, 1, 8).is_err());
        assert!(validate_range("codec.indent", 9usize, 1, 8).is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("file", "data/state.json").is_ok());
        assert!(validate_path("file", "").is_err());
        assert!(validate_path("file", "bad\0path").is_err());
    }
}
