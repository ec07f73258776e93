//! In-process host for tests and trace replay.
//!
//! [`LoopbackHost`] drains a [`MemoryTransport`], answers commands with
//! registered handlers, and records events, playing the part of the native
//! side of the channel.

use std::collections::HashMap;

use hostlink_common::BridgeError;
use serde_json::Value;
use tracing::debug;

use crate::bridge::Bridge;
use crate::ipc::{CommandMessage, EventMessage, InboundDelivery, OutboundEnvelope};
use crate::transport::MemoryTransport;

/// Answers one command. `Err` values are sent back `Err`-tagged.
pub type CommandHandler = Box<dyn Fn(Option<Value>) -> Result<Value, Value>>;

pub struct LoopbackHost {
    outbox: MemoryTransport,
    handlers: HashMap<String, CommandHandler>,
    fallback: Option<CommandHandler>,
    transcript: Vec<String>,
    events: Vec<EventMessage>,
    unanswered: Vec<CommandMessage>,
}

impl LoopbackHost {
    /// Serve whatever is posted into `outbox`. Give the bridge a clone.
    pub fn new(outbox: MemoryTransport) -> Self {
        Self {
            outbox,
            handlers: HashMap::new(),
            fallback: None,
            transcript: Vec::new(),
            events: Vec::new(),
            unanswered: Vec::new(),
        }
    }

    pub fn on_command(
        &mut self,
        name: &str,
        handler: impl Fn(Option<Value>) -> Result<Value, Value> + 'static,
    ) -> &mut Self {
        self.handlers.insert(name.to_string(), Box::new(handler));
        self
    }

    /// Answer commands that have no specific handler.
    pub fn with_fallback(
        mut self,
        handler: impl Fn(Option<Value>) -> Result<Value, Value> + 'static,
    ) -> Self {
        self.fallback = Some(Box::new(handler));
        self
    }

    /// Process everything posted so far, including anything posted while
    /// answers are delivered. Returns the number of envelopes handled.
    pub fn pump(&mut self, bridge: &Bridge) -> Result<usize, BridgeError> {
        let mut handled = 0;
        while let Some(raw) = self.outbox.pop() {
            let envelope = OutboundEnvelope::from_json(&raw)?;
            self.transcript.push(raw);
            handled += 1;

            match envelope {
                OutboundEnvelope::Command(msg) => self.answer(bridge, msg)?,
                OutboundEnvelope::Event(msg) => {
                    debug!(event_id = %msg.event_id, "loopback received event");
                    self.events.push(msg);
                }
            }
        }
        Ok(handled)
    }

    fn answer(&mut self, bridge: &Bridge, msg: CommandMessage) -> Result<(), BridgeError> {
        let handler = self.handlers.get(&msg.id).or(self.fallback.as_ref());
        let Some(handler) = handler else {
            debug!(command = %msg.id, resolve_id = %msg.resolve_id, "loopback has no handler");
            self.unanswered.push(msg);
            return Ok(());
        };

        let delivery = match handler(msg.decoded_args()?) {
            Ok(value) => InboundDelivery::ok(msg.resolve_id, value),
            Err(value) => InboundDelivery::err(msg.resolve_id, value),
        };
        bridge.deliver(delivery);
        Ok(())
    }

    /// Push a host event into the surface.
    pub fn send_event(&self, bridge: &Bridge, event_id: &str, payload: Value) -> bool {
        bridge.deliver(InboundDelivery::event(event_id, payload))
    }

    /// Raw envelopes seen by `pump`, oldest first.
    pub fn take_transcript(&mut self) -> Vec<String> {
        std::mem::take(&mut self.transcript)
    }

    pub fn events(&self) -> &[EventMessage] {
        &self.events
    }

    pub fn take_events(&mut self) -> Vec<EventMessage> {
        std::mem::take(&mut self.events)
    }

    pub fn unanswered(&self) -> &[CommandMessage] {
        &self.unanswered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::BridgeOptions;
    use futures_util::FutureExt;
    use serde_json::json;

    fn setup() -> (Bridge, LoopbackHost) {
        let outbox = MemoryTransport::new();
        let bridge = Bridge::new(outbox.clone(), BridgeOptions::default());
        (bridge, LoopbackHost::new(outbox))
    }

    #[test]
    fn answers_with_registered_handler() {
        let (bridge, mut host) = setup();
        host.on_command("math::double", |args| {
            let n = args.and_then(|v| v.as_i64()).ok_or(json!("need a number"))?;
            Ok(json!(n * 2))
        });

        let ok = bridge.invoke_raw("math::double", Some(json!(21)));
        let err = bridge.invoke_raw("math::double", None);
        assert_eq!(host.pump(&bridge).unwrap(), 2);

        assert_eq!(ok.now_or_never().unwrap().unwrap(), json!(42));
        let err = err.now_or_never().unwrap().unwrap_err();
        assert_eq!(err.host_value(), Some(&json!("need a number")));
    }

    #[test]
    fn unhandled_commands_stay_pending() {
        let (bridge, mut host) = setup();
        let _pending = bridge.invoke_raw("nobody::home", None);
        host.pump(&bridge).unwrap();
        assert_eq!(host.unanswered().len(), 1);
        assert_eq!(bridge.pending_count(), 1);
    }

    #[test]
    fn fallback_answers_everything_else() {
        let (bridge, host) = setup();
        let mut host = host.with_fallback(|_| Ok(Value::Null));
        let pending = bridge.invoke_raw("any::thing", None);
        host.pump(&bridge).unwrap();
        assert_eq!(pending.now_or_never().unwrap().unwrap(), Value::Null);
    }

    #[test]
    fn records_events_and_transcript() {
        let (bridge, mut host) = setup();
        bridge.emit("log::println", &json!("hi")).unwrap();
        host.pump(&bridge).unwrap();

        assert_eq!(host.events()[0].event_id, "log::println");
        assert_eq!(host.take_events()[0].decoded_payload().unwrap(), json!("hi"));
        assert_eq!(host.take_transcript().len(), 1);
        assert!(host.events().is_empty());
    }

    #[test]
    fn pumps_traffic_posted_by_listeners() {
        let (bridge, mut host) = setup();
        let inner = bridge.clone();
        let _sub = bridge.listen("ping", move |_| {
            inner.invoke_detached("pong::ack", None).unwrap();
        });

        assert!(host.send_event(&bridge, "ping", json!(1)));
        assert_eq!(host.pump(&bridge).unwrap(), 1);
        assert_eq!(host.unanswered()[0].id, "pong::ack");
    }
}
