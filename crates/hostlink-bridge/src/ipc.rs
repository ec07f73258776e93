//! Wire protocol between the UI surface and the host.
//!
//! Messages flow in both directions:
//! - **Surface -> Host**: one [`OutboundEnvelope`] per call, serialized as a
//!   single JSON object and posted over the one-way host channel.
//! - **Host -> Surface**: an [`InboundDelivery`], either injected as a call into
//!   the `resolveDelivery`/`emitDelivery` entry points or sent as a JSON frame.

use hostlink_common::{BridgeError, ResolveId};
use serde::{Deserialize, Serialize};

/// A message posted from the surface to the host.
///
/// ```json
/// {"type":"Command","message":{"id":"fs::exists","args":"{\"path\":\"a\"}","resolve_id":3}}
/// {"type":"Event","message":{"event_id":"log::println","payload":"{\"message\":\"hi\"}"}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum OutboundEnvelope {
    Command(CommandMessage),
    Event(EventMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandMessage {
    /// Namespaced command name, `<domain>::<action>`.
    pub id: String,
    /// JSON-encoded arguments. Absent when the command takes none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<String>,
    pub resolve_id: ResolveId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventMessage {
    pub event_id: String,
    /// JSON-encoded payload.
    pub payload: String,
}

impl OutboundEnvelope {
    /// Build a command envelope. A `null` argument is treated as absent.
    pub fn command(
        name: &str,
        args: Option<&serde_json::Value>,
        resolve_id: ResolveId,
    ) -> Result<Self, BridgeError> {
        let args = match args {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => Some(encode(value)?),
        };
        Ok(Self::Command(CommandMessage {
            id: name.to_string(),
            args,
            resolve_id,
        }))
    }

    pub fn event(event_id: &str, payload: &serde_json::Value) -> Result<Self, BridgeError> {
        Ok(Self::Event(EventMessage {
            event_id: event_id.to_string(),
            payload: encode(payload)?,
        }))
    }

    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Encode(e.to_string()))
    }

    /// Decode a posted message on the host side.
    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::Parse(e.to_string()))
    }
}

impl CommandMessage {
    /// Decode the encoded arguments, `None` when the command carried none.
    pub fn decoded_args(&self) -> Result<Option<serde_json::Value>, BridgeError> {
        self.args
            .as_deref()
            .map(|raw| serde_json::from_str(raw).map_err(|e| BridgeError::Parse(e.to_string())))
            .transpose()
    }
}

impl EventMessage {
    pub fn decoded_payload(&self) -> Result<serde_json::Value, BridgeError> {
        serde_json::from_str(&self.payload).map_err(|e| BridgeError::Parse(e.to_string()))
    }
}

/// A host-to-surface delivery.
///
/// As a JSON frame:
/// ```json
/// {"kind":"resolve","resolve_id":3,"result":{"Ok":true}}
/// {"kind":"event","event_id":"grip::resize","payload":48}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InboundDelivery {
    Resolve {
        resolve_id: ResolveId,
        result: serde_json::Value,
    },
    Event {
        event_id: String,
        payload: serde_json::Value,
    },
}

impl InboundDelivery {
    /// Resolution carrying an `Ok`-tagged result.
    pub fn ok(resolve_id: ResolveId, value: serde_json::Value) -> Self {
        Self::Resolve {
            resolve_id,
            result: serde_json::json!({ "Ok": value }),
        }
    }

    /// Resolution carrying an `Err`-tagged result.
    pub fn err(resolve_id: ResolveId, value: serde_json::Value) -> Self {
        Self::Resolve {
            resolve_id,
            result: serde_json::json!({ "Err": value }),
        }
    }

    pub fn event(event_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self::Event {
            event_id: event_id.into(),
            payload,
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, BridgeError> {
        serde_json::from_str(raw).map_err(|e| BridgeError::Parse(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, BridgeError> {
        serde_json::to_string(self).map_err(|e| BridgeError::Encode(e.to_string()))
    }
}

fn encode(value: &serde_json::Value) -> Result<String, BridgeError> {
    serde_json::to_string(value).map_err(|e| BridgeError::Encode(e.to_string()))
}
