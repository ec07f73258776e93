//! Configuration validation.
//!
//! Each check pushes a message; all messages are joined into a single
//! `ConfigError::ValidationError`.

mod helpers;


use crate::schema::HostlinkConfig;
use hostlink_common::ConfigError;

use helpers::{validate_finite, validate_range_f64, validate_range_u64};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &HostlinkConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_bridge(&mut errors, config);
    validate_chrome(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_bridge(errors: &mut Vec<String>, config: &HostlinkConfig) {
    if let Some(timeout) = config.bridge.invoke_timeout_ms {
        validate_range_u64(errors, "bridge.invoke_timeout_ms", timeout, 1, 3_600_000);
    }
    if config.bridge.entry_namespace.trim().is_empty() {
        errors.push("bridge.entry_namespace must not be empty".into());
    }
}

// The grip zone is only checked for finiteness; the runtime resize event
// accepts any number, negative included.
fn validate_chrome(errors: &mut Vec<String>, config: &HostlinkConfig) {
    validate_finite(errors, "chrome.grip_zone_height", config.chrome.grip_zone_height);
    validate_range_f64(
        errors,
        "chrome.toolbar_height",
        config.chrome.toolbar_height,
        0.0,
        200.0,
    );
}
