pub mod errors;
pub mod id;

pub use errors::{BridgeError, ConfigError, HostlinkError, TransportError};
pub use id::{ResolveId, ResolveIdGenerator, SurfaceId, MAX_RESOLVE_ID};

pub type Result<T> = std::result::Result<T, HostlinkError>;
