//! Window chrome configuration types.

use serde::{Deserialize, Serialize};

/// Grip zone and toolbar header settings.
///
/// Heights are CSS pixels measured from the top of the surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromeConfig {
    /// Initial grip zone threshold. The host may change it at runtime.
    pub grip_zone_height: f64,
    /// Inject a fixed header that starts a window move on press.
    pub toolbar_enabled: bool,
    /// Header height (valid range: 0-200).
    pub toolbar_height: f64,
    /// Header background as any CSS color.
    pub toolbar_color: String,
}

impl Default for ChromeConfig {
    fn default() -> Self {
        Self {
            grip_zone_height: 20.0,
            toolbar_enabled: false,
            toolbar_height: 20.0,
            toolbar_color: "#2b2b2b".into(),
        }
    }
}
