//! The bridge facade: `invoke`, `emit`, `listen`, and the two inbound entry
//! points `resolve_delivery` and `emit_delivery`.
//!
//! A [`Bridge`] lives exactly as long as its UI surface and runs on that
//! surface's single event loop. It is a cheap `Rc` handle; clones share the
//! correlation table and the event registry.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};
use std::time::Duration;

use hostlink_common::{BridgeError, ResolveId, SurfaceId};
use hostlink_config::schema::DEFAULT_ENTRY_NAMESPACE;
use hostlink_config::BridgeConfig;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::correlation::{Completion, CorrelationTable};
use crate::events::{EventRegistry, SubscriptionToken};
use crate::ipc::{InboundDelivery, OutboundEnvelope};
use crate::result::ResultEnvelope;
use crate::transport::Transport;

/// Runtime options for a bridge instance.
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Reject unanswered commands with `TimedOut` after this long, awaited
    /// and detached alike. `None` keeps them pending until resolved, dropped,
    /// or shut down.
    ///
    /// Overdue entries are expired by the next call into the bridge or by
    /// [`Bridge::expire_overdue`]. Inside a tokio runtime an awaiting caller is
    /// also woken by tokio's timer; no runtime is required otherwise.
    pub invoke_timeout: Option<Duration>,
    /// JS object the host calls `resolveDelivery`/`emitDelivery` on.
    pub entry_namespace: String,
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            invoke_timeout: None,
            entry_namespace: DEFAULT_ENTRY_NAMESPACE.to_string(),
        }
    }
}

impl From<&BridgeConfig> for BridgeOptions {
    fn from(config: &BridgeConfig) -> Self {
        Self {
            invoke_timeout: config.invoke_timeout(),
            entry_namespace: config.entry_namespace.clone(),
        }
    }
}

struct Inner {
    surface_id: SurfaceId,
    transport: Box<dyn Transport>,
    options: BridgeOptions,
    table: RefCell<CorrelationTable>,
    events: RefCell<EventRegistry>,
    shut_down: Cell<bool>,
}

#[derive(Clone)]
pub struct Bridge {
    inner: Rc<Inner>,
}

impl Bridge {
    pub fn new(transport: impl Transport + 'static, options: BridgeOptions) -> Self {
        Self {
            inner: Rc::new(Inner {
                surface_id: SurfaceId::new(),
                transport: Box::new(transport),
                options,
                table: RefCell::new(CorrelationTable::default()),
                events: RefCell::new(EventRegistry::default()),
                shut_down: Cell::new(false),
            }),
        }
    }

    pub fn surface_id(&self) -> &SurfaceId {
        &self.inner.surface_id
    }

    pub fn entry_namespace(&self) -> &str {
        &self.inner.options.entry_namespace
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Send a command and wait for the host's answer as raw JSON.
    ///
    /// The envelope is posted before this returns; the future only waits.
    /// Dropping the future abandons the request and clears its table entry.
    pub fn invoke_raw(
        &self,
        command: &str,
        args: Option<Value>,
    ) -> impl Future<Output = Result<Value, BridgeError>> + 'static {
        let (sender, receiver) = oneshot::channel();
        let sent = self
            .post_command(command, args.as_ref(), Completion::Awaiting(sender))
            .map(|(resolve_id, deadline)| {
                let guard = PendingGuard {
                    inner: Rc::downgrade(&self.inner),
                    resolve_id,
                    armed: true,
                };
                (guard, deadline, receiver)
            });
        let timeout = self.inner.options.invoke_timeout;
        let command = command.to_string();

        async move {
            let (mut guard, deadline, receiver) = sent?;
            let received = match deadline.zip(timeout) {
                Some((deadline, after)) if Handle::try_current().is_ok() => {
                    match tokio::time::timeout_at(deadline, receiver).await {
                        Ok(received) => received,
                        Err(_) => {
                            warn!(resolve_id = %guard.resolve_id, %command, ?after, "command timed out");
                            return Err(BridgeError::TimedOut { command, after });
                        }
                    }
                }
                // Without a runtime the table sweep delivers `TimedOut`.
                _ => receiver.await,
            };
            guard.armed = false;
            received.unwrap_or(Err(BridgeError::Cancelled { command }))
        }
    }

    /// Send a command without arguments and decode the answer into `Out`.
    pub fn invoke<Out>(
        &self,
        command: &str,
    ) -> impl Future<Output = Result<Out, BridgeError>> + 'static
    where
        Out: DeserializeOwned,
    {
        let pending = self.invoke_raw(command, None);
        let command = command.to_string();
        async move { decode_output(&command, pending.await?) }
    }

    /// Send a command with serialized `args` and decode the answer into `Out`.
    pub fn invoke_with<Args, Out>(
        &self,
        command: &str,
        args: &Args,
    ) -> impl Future<Output = Result<Out, BridgeError>> + 'static
    where
        Args: Serialize + ?Sized,
        Out: DeserializeOwned,
    {
        let encoded = serde_json::to_value(args).map_err(|e| BridgeError::Encode(e.to_string()));
        let pending = encoded.map(|args| self.invoke_raw(command, Some(args)));
        let command = command.to_string();
        async move { decode_output(&command, pending?.await?) }
    }

    /// Send a command whose answer nobody awaits.
    ///
    /// The entry is still tracked so the host's answer is matched; a
    /// host-reported error is logged.
    pub fn invoke_detached(
        &self,
        command: &str,
        args: Option<Value>,
    ) -> Result<ResolveId, BridgeError> {
        self.post_command(command, args.as_ref(), Completion::Detached)
            .map(|(resolve_id, _)| resolve_id)
    }

    fn post_command(
        &self,
        command: &str,
        args: Option<&Value>,
        completion: Completion,
    ) -> Result<(ResolveId, Option<Instant>), BridgeError> {
        self.ensure_open()?;
        self.expire_overdue();

        let deadline = self.inner.options.invoke_timeout.map(|after| Instant::now() + after);
        let resolve_id = self
            .inner
            .table
            .borrow_mut()
            .register(command, completion, deadline);
        let body = OutboundEnvelope::command(command, args, resolve_id).and_then(|e| e.to_json());
        let sent = body.and_then(|body| {
            self.inner
                .transport
                .post_message(body)
                .map_err(BridgeError::from)
        });

        match sent {
            Ok(()) => {
                debug!(surface_id = %self.inner.surface_id, %resolve_id, command, "command posted");
                Ok((resolve_id, deadline))
            }
            Err(e) => {
                // Fail fast: the entry never outlives a failed send.
                self.inner.table.borrow_mut().take(resolve_id);
                warn!(%resolve_id, command, error = %e, "command not sent");
                Err(e)
            }
        }
    }

    // =========================================================================
    // EVENTS
    // =========================================================================

    /// Post a fire-and-forget event to the host.
    pub fn emit<P>(&self, event_id: &str, payload: &P) -> Result<(), BridgeError>
    where
        P: Serialize + ?Sized,
    {
        self.ensure_open()?;
        self.expire_overdue();
        let payload = serde_json::to_value(payload).map_err(|e| BridgeError::Encode(e.to_string()))?;
        let body = OutboundEnvelope::event(event_id, &payload)?.to_json()?;
        self.inner.transport.post_message(body)?;
        debug!(surface_id = %self.inner.surface_id, event_id, "event posted");
        Ok(())
    }

    /// Register the handler for `event_id`, replacing any previous one.
    pub fn listen(&self, event_id: &str, handler: impl Fn(Value) + 'static) -> Subscription {
        let token = self
            .inner
            .events
            .borrow_mut()
            .register(event_id, Rc::new(handler));
        debug!(event_id, generation = token.generation, "listener registered");
        Subscription {
            inner: Rc::downgrade(&self.inner),
            token,
        }
    }

    /// Like [`listen`](Self::listen), decoding each payload into `T`.
    /// Payloads that do not decode are logged and skipped.
    pub fn listen_as<T>(&self, event_id: &str, handler: impl Fn(T) + 'static) -> Subscription
    where
        T: DeserializeOwned,
    {
        let id = event_id.to_string();
        self.listen(event_id, move |payload| {
            match serde_json::from_value::<T>(payload) {
                Ok(value) => handler(value),
                Err(e) => warn!(event_id = %id, error = %e, "event payload did not decode"),
            }
        })
    }

    // =========================================================================
    // INBOUND ENTRY POINTS
    // =========================================================================

    /// Host entry point: resolve command `resolve_id` with raw JSON `result`.
    ///
    /// Returns `Ok(false)` when no such command is pending. A malformed
    /// payload is an error here, and also rejects the pending caller.
    pub fn resolve_delivery(&self, resolve_id: ResolveId, result: &str) -> Result<bool, BridgeError> {
        match serde_json::from_str::<Value>(result) {
            Ok(value) => Ok(self.resolve_delivery_value(resolve_id, value)),
            Err(e) => {
                let err = BridgeError::Parse(format!("resolution {resolve_id}: {e}"));
                let pending = self.inner.table.borrow_mut().take(resolve_id);
                if let Some(pending) = pending {
                    pending.complete(resolve_id, Err(err.clone()));
                }
                Err(err)
            }
        }
    }

    /// Resolve command `resolve_id` with an already-parsed result.
    pub fn resolve_delivery_value(&self, resolve_id: ResolveId, result: Value) -> bool {
        self.expire_overdue();
        let pending = self.inner.table.borrow_mut().take(resolve_id);
        let Some(pending) = pending else {
            debug!(%resolve_id, "unmatched resolution ignored");
            return false;
        };
        debug!(%resolve_id, command = %pending.command, "command resolved");
        pending.complete(resolve_id, ResultEnvelope::classify(result).into_result());
        true
    }

    /// Host entry point: deliver event `event_id` with raw JSON `payload`.
    ///
    /// Returns `Ok(false)` when nobody listens.
    pub fn emit_delivery(&self, event_id: &str, payload: &str) -> Result<bool, BridgeError> {
        let value = serde_json::from_str::<Value>(payload)
            .map_err(|e| BridgeError::Parse(format!("event `{event_id}`: {e}")))?;
        Ok(self.emit_delivery_value(event_id, value))
    }

    /// Deliver an event with an already-parsed payload. The handler runs
    /// synchronously and may itself call back into the bridge.
    pub fn emit_delivery_value(&self, event_id: &str, payload: Value) -> bool {
        self.expire_overdue();
        let handler = self.inner.events.borrow().handler(event_id);
        match handler {
            Some(handler) => {
                handler(payload);
                true
            }
            None => {
                debug!(event_id, "unmatched event ignored");
                false
            }
        }
    }

    pub fn deliver(&self, delivery: InboundDelivery) -> bool {
        match delivery {
            InboundDelivery::Resolve { resolve_id, result } => {
                self.resolve_delivery_value(resolve_id, result)
            }
            InboundDelivery::Event { event_id, payload } => {
                self.emit_delivery_value(&event_id, payload)
            }
        }
    }

    /// Decode and deliver one JSON frame from a channel-based host.
    pub fn deliver_frame(&self, frame: &str) -> Result<bool, BridgeError> {
        Ok(self.deliver(InboundDelivery::from_json(frame)?))
    }

    // =========================================================================
    // LIFECYCLE
    // =========================================================================

    /// Reject every pending command with `Cancelled`, drop all listeners, and
    /// refuse further traffic.
    pub fn shutdown(&self) {
        if self.inner.shut_down.replace(true) {
            return;
        }
        let pending = self.inner.table.borrow_mut().drain();
        let cancelled = pending.len();
        for (resolve_id, request) in pending {
            let command = request.command.clone();
            request.complete(resolve_id, Err(BridgeError::Cancelled { command }));
        }
        self.inner.events.borrow_mut().clear();
        info!(surface_id = %self.inner.surface_id, cancelled, "bridge shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.get()
    }

    /// Reject every command past its deadline with `TimedOut` and clear its
    /// entry. Returns how many expired.
    ///
    /// Every bridge call already does this; an idle surface can call it from
    /// its own event loop tick.
    pub fn expire_overdue(&self) -> usize {
        let Some(after) = self.inner.options.invoke_timeout else {
            return 0;
        };
        let expired = self.inner.table.borrow_mut().take_expired(Instant::now());
        let count = expired.len();
        if count > 0 {
            warn!(expired = count, ?after, "overdue commands timed out");
        }
        for (resolve_id, request) in expired {
            let command = request.command.clone();
            request.complete(resolve_id, Err(BridgeError::TimedOut { command, after }));
        }
        count
    }

    /// Commands still awaiting an answer. Overdue entries are expired first.
    pub fn pending_count(&self) -> usize {
        self.expire_overdue();
        self.inner.table.borrow().len()
    }

    pub fn is_pending(&self, resolve_id: ResolveId) -> bool {
        self.expire_overdue();
        self.inner.table.borrow().contains(resolve_id)
    }

    pub fn listener_count(&self) -> usize {
        self.inner.events.borrow().len()
    }

    fn ensure_open(&self) -> Result<(), BridgeError> {
        if self.inner.shut_down.get() {
            Err(BridgeError::ShutDown)
        } else {
            Ok(())
        }
    }
}

fn decode_output<Out: DeserializeOwned>(command: &str, value: Value) -> Result<Out, BridgeError> {
    serde_json::from_value(value).map_err(|e| BridgeError::Decode {
        command: command.to_string(),
        reason: e.to_string(),
    })
}

/// Clears a pending entry whose `invoke` future was dropped or timed out.
struct PendingGuard {
    inner: Weak<Inner>,
    resolve_id: ResolveId,
    armed: bool,
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let Some(inner) = self.inner.upgrade() else {
            return;
        };
        if let Ok(mut table) = inner.table.try_borrow_mut() {
            if table.take(self.resolve_id).is_some() {
                debug!(resolve_id = %self.resolve_id, "abandoned command cleared");
            }
        };
    }
}

/// Disposer for one `listen` registration.
///
/// Disposing removes the handler only while it is still the active one for
/// its event id. Dropping a `Subscription` without disposing keeps the
/// handler registered.
pub struct Subscription {
    inner: Weak<Inner>,
    token: SubscriptionToken,
}

impl Subscription {
    pub fn event_id(&self) -> &str {
        &self.token.event_id
    }

    /// Whether this registration still receives deliveries.
    pub fn is_active(&self) -> bool {
        self.inner
            .upgrade()
            .is_some_and(|inner| inner.events.borrow().is_active(&self.token))
    }

    /// Remove this registration. Returns `false` if it was already gone or
    /// had been superseded.
    pub fn dispose(&self) -> bool {
        let Some(inner) = self.inner.upgrade() else {
            return false;
        };
        let removed = inner.events.borrow_mut().remove(&self.token);
        debug!(event_id = %self.token.event_id, removed, "listener disposed");
        removed
    }
}
