//! Hostlink configuration.
//!
//! TOML-based configuration for the bridge (timeouts, inbound entry point
//! namespace), the window chrome (grip zone, toolbar header), and logging.
//! Every section uses serde defaults so partial files work.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use hostlink_config::{load_config, config_to_json};
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config_to_json(&config));
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    BridgeConfig, ChromeConfig, HostlinkConfig, LogLevel, LoggingConfig, CONFIG_SCHEMA_VERSION,
};
pub use toml_loader::{load_default, load_from_path};

use hostlink_common::ConfigError;

/// Load config from the platform default path and validate it.
///
/// Creates a default `config.toml` if none exists.
pub fn load_config() -> Result<HostlinkConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &HostlinkConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
