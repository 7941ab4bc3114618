//! Tracking where a configuration value came from.

use serde::Serialize;
use std::fmt;

/// Source of a configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigSource {
    /// Built-in default.
    Default,
    /// Process environment.
    Environment,
}

/// A value paired with the place it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sourced<T> {
    pub value: T,
    pub source: ConfigSource,
    /// Environment variable name, when the value came from the environment.
    pub var: Option<String>,
}

impl<T> Sourced<T> {
    pub fn default_value(value: T) -> Self {
        Self {
            value,
            source: ConfigSource::Default,
            var: None,
        }
    }

    pub fn from_env(value: T, var: String) -> Self {
        Self {
            value,
            source: ConfigSource::Environment,
            var: Some(var),
        }
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => write!(f, "default"),
            Self::Environment => write!(f, "environment"),
        }
    }
}
