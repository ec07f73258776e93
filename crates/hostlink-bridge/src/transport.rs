//! Transport adapters for the one-way surface-to-host channel.
//!
//! The bridge serializes exactly one envelope per call and hands the JSON
//! text to a [`Transport`]. The channel preserves order and is otherwise
//! opaque; nothing comes back through it.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use hostlink_common::{BridgeError, TransportError};
use tokio::sync::mpsc;

use crate::ipc::OutboundEnvelope;

/// The outbound leg of the bridge, `window.ipc.postMessage` in a webview.
pub trait Transport {
    /// Hand one serialized envelope to the host. Must not block.
    fn post_message(&self, body: String) -> Result<(), TransportError>;
}

// =============================================================================
// IN-MEMORY
// =============================================================================

/// Order-preserving in-memory outbox.
///
/// Clones share the same queue, so one clone can be given to a bridge while
/// another is drained by a loopback host or a test.
#[derive(Clone, Default)]
pub struct MemoryTransport {
    queue: Rc<RefCell<VecDeque<String>>>,
    failure: Rc<RefCell<Option<TransportError>>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following post fail with `error` until cleared with `None`.
    pub fn set_failure(&self, error: Option<TransportError>) {
        *self.failure.borrow_mut() = error;
    }

    pub fn pop(&self) -> Option<String> {
        self.queue.borrow_mut().pop_front()
    }

    pub fn take_all(&self) -> Vec<String> {
        self.queue.borrow_mut().drain(..).collect()
    }

    /// Drain and decode everything posted so far.
    pub fn take_envelopes(&self) -> Result<Vec<OutboundEnvelope>, BridgeError> {
        self.take_all()
            .iter()
            .map(|raw| OutboundEnvelope::from_json(raw))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }
}

impl Transport for MemoryTransport {
    fn post_message(&self, body: String) -> Result<(), TransportError> {
        if let Some(err) = self.failure.borrow().clone() {
            return Err(err);
        }
        self.queue.borrow_mut().push_back(body);
        Ok(())
    }
}

// =============================================================================
// CHANNEL
// =============================================================================

/// Posts envelopes into a tokio channel read by an in-process host task.
#[derive(Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<String>,
}

impl ChannelTransport {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn post_message(&self, body: String) -> Result<(), TransportError> {
        self.sender.send(body).map_err(|_| TransportError::Closed)
    }
}

// =============================================================================
// TESTS
// =============================================================================
