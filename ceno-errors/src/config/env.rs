//! Environment variable parsing with type safety.
//!
//! Provides a type-safe parser for the CENO client's environment variables
//! with validation, error collection, and source tracking.

use super::source::Sourced;
use regex::Regex;
use std::env;
use std::path::PathBuf;
use std::sync::LazyLock;
use thiserror::Error;

static LOCALE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[a-z0-9]{2,8})*$").expect("locale tag pattern is valid")
});

/// Errors that can occur during environment variable parsing.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Invalid value for a variable.
    #[error("Invalid value for {var}: expected {expected}, got '{value}'")]
    InvalidValue {
        var: String,
        expected: String,
        value: String,
    },

    /// Value out of valid range.
    #[error("Value out of range for {var}: {value} (valid: {min}..={max})")]
    OutOfRange {
        var: String,
        value: String,
        min: String,
        max: String,
    },

    /// Not a usable language tag.
    #[error("Invalid locale for {var}: '{value}'")]
    InvalidLocale { var: String, value: String },
}

/// Type-safe environment variable parser.
///
/// Collects errors during parsing so all issues can be reported at once.
#[derive(Default)]
pub struct EnvParser {
    errors: Vec<EnvError>,
}

impl EnvParser {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Get all accumulated errors.
    pub fn errors(&self) -> &[EnvError] {
        &self.errors
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Take ownership of errors.
    pub fn take_errors(&mut self) -> Vec<EnvError> {
        std::mem::take(&mut self.errors)
    }

    /// Get a u64 value with default and range validation.
    pub fn get_u64_range(&mut self, var: &str, default: u64, min: u64, max: u64) -> Sourced<u64> {
        match env::var(var) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(n) if n >= min && n <= max => Sourced::from_env(n, var.to_string()),
                Ok(n) => {
                    self.errors.push(EnvError::OutOfRange {
                        var: var.to_string(),
                        value: n.to_string(),
                        min: min.to_string(),
                        max: max.to_string(),
                    });
                    Sourced::default_value(default)
                }
                Err(_) => {
                    self.errors.push(EnvError::InvalidValue {
                        var: var.to_string(),
                        expected: "unsigned 64-bit integer".to_string(),
                        value,
                    });
                    Sourced::default_value(default)
                }
            },
            Err(_) => Sourced::default_value(default),
        }
    }

    /// Get a path value. Empty values count as unset.
    pub fn get_optional_path(&mut self, var: &str) -> Sourced<Option<PathBuf>> {
        match env::var(var) {
            Ok(value) if value.trim().is_empty() => Sourced::default_value(None),
            Ok(value) => Sourced::from_env(Some(PathBuf::from(value)), var.to_string()),
            Err(_) => Sourced::default_value(None),
        }
    }

    /// Get a path value with default.
    pub fn get_path(&mut self, var: &str, default: &str) -> Sourced<PathBuf> {
        match self.get_optional_path(var) {
            Sourced {
                value: Some(path),
                var: Some(name),
                ..
            } => Sourced::from_env(path, name),
            _ => Sourced::default_value(PathBuf::from(default)),
        }
    }

    /// Get a language tag such as `en-us` or `pt_BR`.
    ///
    /// Tags are lowercased and `_` becomes `-`. An unset or empty variable
    /// yields the default without an error; a malformed one records an error.
    pub fn get_locale(&mut self, var: &str, default: &str) -> Sourced<String> {
        match env::var(var) {
            Ok(value) if value.trim().is_empty() => Sourced::default_value(default.to_string()),
            Ok(value) => {
                let tag = normalize_locale(&value);
                if LOCALE_TAG.is_match(&tag) {
                    Sourced::from_env(tag, var.to_string())
                } else {
                    self.errors.push(EnvError::InvalidLocale {
                        var: var.to_string(),
                        value,
                    });
                    Sourced::default_value(default.to_string())
                }
            }
            Err(_) => Sourced::default_value(default.to_string()),
        }
    }
}

/// Lowercase a language tag and use `-` as the separator.
pub fn normalize_locale(tag: &str) -> String {
    tag.trim().to_lowercase().replace('_', "-")
}
