//! Bidirectional correlation bridge between a sandboxed UI surface and its
//! native host.
//!
//! The surface talks to the host over a one-way message channel
//! ([`Transport`]). The host talks back by calling two entry points on the
//! [`Bridge`]:
//!
//! - `resolve_delivery(resolve_id, result)` completes a pending `invoke`.
//! - `emit_delivery(event_id, payload)` runs the listener for an event.
//!
//! A webview host installs [`init_script`] so the page has the same entry
//! points under the configured namespace.
//!
//! ```rust,no_run
//! use hostlink_bridge::{Bridge, BridgeOptions, MemoryTransport};
//!
//! let outbox = MemoryTransport::new();
//! let bridge = Bridge::new(outbox.clone(), BridgeOptions::default());
//! let exists = bridge.invoke_with::<_, bool>("fs::exists", &serde_json::json!({"path": "a"}));
//! ```

pub mod bridge;
mod correlation;
mod events;
pub mod host;
pub mod ipc;
pub mod loopback;
pub mod result;
pub mod transport;

pub use bridge::{Bridge, BridgeOptions, Subscription};
pub use host::init_script;
pub use ipc::{CommandMessage, EventMessage, InboundDelivery, OutboundEnvelope};
pub use loopback::{CommandHandler, LoopbackHost};
pub use result::ResultEnvelope;
pub use transport::{ChannelTransport, MemoryTransport, Transport};

#[cfg(feature = "wry")]
pub use host::{attach_bridge, deliver_to_webview};
