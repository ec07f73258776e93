//! Host-side helpers for wiring a webview surface to the bridge protocol.
//!
//! In a webview the host cannot call Rust on the surface directly. It installs
//! [`init_script`] before any page script runs, receives the posted envelopes
//! through the IPC handler, and pushes answers back by evaluating a script that
//! calls the surface's entry points with the result or payload as a JSON
//! string literal.

use hostlink_common::BridgeError;
#[cfg(any(feature = "wry", test))]
use hostlink_common::TransportError;

use crate::bridge::Bridge;
use crate::ipc::InboundDelivery;

/// Surface runtime installed under the entry namespace.
///
/// Mirrors [`Bridge`]: monotonic resolve ids that skip outstanding ones and
/// wrap at `Number.MAX_SAFE_INTEGER`, `{"Ok"}`/`{"Err"}` unwrapping where `Ok`
/// wins, one listener per event id with generation-checked disposers.
const SURFACE_RUNTIME: &str = r#";(() => {
    const MAX_ID = Number.MAX_SAFE_INTEGER;
    const pending = new Map();
    const listeners = new Map();
    let nextId = 0;
    let generation = 0;

    const post = (type, message) => {
        window.ipc.postMessage(JSON.stringify({ type, message }));
    };

    const step = (id) => (id >= MAX_ID ? 0 : id + 1);

    const allocate = () => {
        while (pending.has(nextId)) {
            nextId = step(nextId);
        }
        const id = nextId;
        nextId = step(nextId);
        return id;
    };

    const unwrap = (value) => {
        if (value !== null && typeof value === 'object' && !Array.isArray(value)) {
            if ('Ok' in value) return [true, value.Ok];
            if ('Err' in value) return [false, value.Err];
        }
        return [true, value];
    };

    __NAMESPACE__ = {
        invoke(id, args) {
            return new Promise((resolve, reject) => {
                const resolve_id = allocate();
                const message = { id, resolve_id };
                if (args !== undefined && args !== null) {
                    message.args = JSON.stringify(args);
                }
                pending.set(resolve_id, { resolve, reject });
                try {
                    post('Command', message);
                } catch (e) {
                    pending.delete(resolve_id);
                    reject(e);
                }
            });
        },
        emit(event_id, payload) {
            post('Event', { event_id, payload: JSON.stringify(payload === undefined ? null : payload) });
        },
        listen(event_id, handler) {
            const token = ++generation;
            listeners.set(event_id, { token, handler });
            return () => {
                const current = listeners.get(event_id);
                if (current && current.token === token) {
                    listeners.delete(event_id);
                }
            };
        },
        resolveDelivery(resolve_id, output) {
            const entry = pending.get(resolve_id);
            pending.delete(resolve_id);
            let value;
            try {
                value = JSON.parse(output);
            } catch (e) {
                if (entry) entry.reject(e);
                throw e;
            }
            if (!entry) return false;
            const [ok, inner] = unwrap(value);
            (ok ? entry.resolve : entry.reject)(inner);
            return true;
        },
        emitDelivery(event_id, payload) {
            const entry = listeners.get(event_id);
            if (!entry) return false;
            entry.handler(JSON.parse(payload));
            return true;
        },
    };
})();"#;

/// Script defining the surface entry points (`invoke`, `emit`, `listen`,
/// `resolveDelivery`, `emitDelivery`) at `namespace`. Envelopes are posted
/// through `window.ipc.postMessage`.
pub fn init_script(namespace: &str) -> String {
    SURFACE_RUNTIME.replace("__NAMESPACE__", namespace)
}

impl Bridge {
    /// [`init_script`] for this bridge's entry namespace.
    pub fn init_script(&self) -> String {
        init_script(self.entry_namespace())
    }
}

impl InboundDelivery {
    /// Render this delivery as a script calling the entry points under
    /// `namespace`, e.g. `window.__HOSTLINK__.resolveDelivery(3, "{\"Ok\":1}");`.
    pub fn to_script(&self, namespace: &str) -> Result<String, BridgeError> {
        let script = match self {
            Self::Resolve { resolve_id, result } => format!(
                "{namespace}.resolveDelivery({resolve_id}, {});",
                quoted_json(result)?
            ),
            Self::Event { event_id, payload } => format!(
                "{namespace}.emitDelivery({}, {});",
                quote(event_id)?,
                quoted_json(payload)?
            ),
        };
        Ok(script)
    }
}

fn quote(text: &str) -> Result<String, BridgeError> {
    serde_json::to_string(text).map_err(|e| BridgeError::Encode(e.to_string()))
}

fn quoted_json(value: &serde_json::Value) -> Result<String, BridgeError> {
    let raw = serde_json::to_string(value).map_err(|e| BridgeError::Encode(e.to_string()))?;
    quote(&raw)
}

#[cfg(any(feature = "wry", test))]
fn webview_rejected(error: impl std::fmt::Display) -> BridgeError {
    BridgeError::Transport(TransportError::Rejected(error.to_string()))
}

/// Evaluate `delivery` inside `webview`.
#[cfg(feature = "wry")]
pub fn deliver_to_webview(
    webview: &wry::WebView,
    namespace: &str,
    delivery: &InboundDelivery,
) -> Result<(), BridgeError> {
    let script = delivery.to_script(namespace)?;
    webview.evaluate_script(&script).map_err(webview_rejected)
}

/// Install the surface runtime at `namespace` and hand every envelope the
/// page posts to `on_envelope`. Bodies that do not decode are dropped.
#[cfg(feature = "wry")]
pub fn attach_bridge<'a, F>(
    builder: wry::WebViewBuilder<'a>,
    namespace: &str,
    on_envelope: F,
) -> wry::WebViewBuilder<'a>
where
    F: Fn(crate::ipc::OutboundEnvelope) + 'static,
{
    builder
        .with_initialization_script(&init_script(namespace))
        .with_ipc_handler(move |request| {
            let body = request.body();
            match crate::ipc::OutboundEnvelope::from_json(body) {
                Ok(envelope) => on_envelope(envelope),
                Err(e) => {
                    tracing::warn!(body_len = body.len(), error = %e, "IPC body rejected");
                }
            }
        })
}
