//! Where hostlink keeps its config file, and first-run creation of it.

use hostlink_common::ConfigError;
use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::template::default_config_toml;

const APP_DIR: &str = "hostlink";
const CONFIG_FILE: &str = "config.toml";

/// `<base>/hostlink/config.toml`.
pub fn config_path_in(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(CONFIG_FILE)
}

/// [`config_path_in`] the platform config directory.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|base| config_path_in(&base))
        .ok_or_else(|| ConfigError::ParseError("no platform config directory for hostlink".into()))
}

/// Write the commented template to `path` unless a file is already there.
///
/// Returns `true` when the template was written. An existing file, even an
/// empty one, is left untouched.
pub fn create_default_config(path: &Path) -> Result<bool, ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_failure("create", parent, e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("config already present at {}", path.display());
            return Ok(false);
        }
        Err(e) => return Err(io_failure("create", path, e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_failure("write", path, e))?;

    info!("wrote default hostlink config to {}", path.display());
    Ok(true)
}

fn io_failure(action: &str, path: &Path, error: std::io::Error) -> ConfigError {
    ConfigError::ParseError(format!("cannot {action} {}: {error}", path.display()))
}
