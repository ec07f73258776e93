//! Configuration schema types for Hostlink.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod bridge;
mod chrome;
mod logging;

pub use bridge::*;
pub use chrome::*;
pub use logging::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct HostlinkConfig {
    pub bridge: BridgeConfig,
    pub chrome: ChromeConfig,
    pub logging: LoggingConfig,
}
