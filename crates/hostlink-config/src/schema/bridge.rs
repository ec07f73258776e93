//! Bridge configuration types.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default JS object that exposes the two inbound entry points.
pub const DEFAULT_ENTRY_NAMESPACE: &str = "window.__HOSTLINK__";

/// Correlation bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Reject an `invoke` with `TimedOut` after this many milliseconds.
    /// `None` waits forever (valid range when set: 1-3600000).
    pub invoke_timeout_ms: Option<u64>,
    /// Object path the host calls into for `resolveDelivery`/`emitDelivery`.
    pub entry_namespace: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            invoke_timeout_ms: None,
            entry_namespace: DEFAULT_ENTRY_NAMESPACE.to_string(),
        }
    }
}

impl BridgeConfig {
    pub fn invoke_timeout(&self) -> Option<Duration> {
        self.invoke_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_wait_forever() {
        let config = BridgeConfig::default();
        assert_eq!(config.invoke_timeout(), None);
        assert_eq!(config.entry_namespace, DEFAULT_ENTRY_NAMESPACE);
    }

    #[test]
    fn timeout_converts_to_duration() {
        let config = BridgeConfig {
            invoke_timeout_ms: Some(1500),
            ..Default::default()
        };
        assert_eq!(config.invoke_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: BridgeConfig = toml::from_str("invoke_timeout_ms = 10").unwrap();
        assert_eq!(config.invoke_timeout_ms, Some(10));
        assert_eq!(config.entry_namespace, DEFAULT_ENTRY_NAMESPACE);
    }
}
