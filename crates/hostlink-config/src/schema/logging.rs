//! Logging configuration types.

use serde::{Deserialize, Serialize};

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` filter directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Debug => "hostlink=debug",
            Self::Info => "hostlink=info",
            Self::Warning => "hostlink=warn",
            Self::Error => "hostlink=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_uppercase() {
        let config: LoggingConfig = toml::from_str(r#"level = "WARNING""#).unwrap();
        assert_eq!(config.level, LogLevel::Warning);
    }

    #[test]
    fn directives() {
        assert_eq!(LogLevel::Debug.directive(), "hostlink=debug");
        assert_eq!(LogLevel::default().directive(), "hostlink=info");
        assert_eq!(LogLevel::Error.directive(), "hostlink=error");
    }
}
