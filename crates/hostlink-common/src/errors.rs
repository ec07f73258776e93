use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure handing an outbound envelope to the host channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("host channel closed")]
    Closed,

    #[error("host channel rejected message: {0}")]
    Rejected(String),
}

/// Errors surfaced by the bridge to `invoke` callers and inbound entry points.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BridgeError {
    /// The host answered with an `Err`-tagged result. The value is kept verbatim.
    #[error("host reported error: {0}")]
    HostReported(serde_json::Value),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// Malformed inbound payload, raised at the delivery entry point.
    #[error("malformed delivery: {0}")]
    Parse(String),

    #[error("payload encode error: {0}")]
    Encode(String),

    #[error("failed to decode output of `{command}`: {reason}")]
    Decode { command: String, reason: String },

    #[error("command `{command}` timed out after {after:?}")]
    TimedOut { command: String, after: Duration },

    #[error("command `{command}` cancelled before the host answered")]
    Cancelled { command: String },

    #[error("bridge has been shut down")]
    ShutDown,
}

impl BridgeError {
    /// The host's error value, if this is a host-reported rejection.
    pub fn host_value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::HostReported(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HostlinkError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}
