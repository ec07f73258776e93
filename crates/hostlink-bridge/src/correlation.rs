//! In-flight command tracking.
//!
//! Every `invoke` registers a [`PendingRequest`] under a fresh [`ResolveId`].
//! The entry leaves the table exactly once: when its resolution arrives, when
//! its send fails, when it passes its deadline or is dropped, or at shutdown.

use std::collections::HashMap;

use hostlink_common::{BridgeError, ResolveId, ResolveIdGenerator};
use serde_json::Value;
use tokio::sync::oneshot;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Where a resolution goes once it arrives.
pub(crate) enum Completion {
    /// An awaiting `invoke` future.
    Awaiting(oneshot::Sender<Result<Value, BridgeError>>),
    /// Nobody awaits; the outcome is only logged.
    Detached,
}

pub(crate) struct PendingRequest {
    pub(crate) command: String,
    deadline: Option<Instant>,
    completion: Completion,
}

impl PendingRequest {
    pub(crate) fn complete(self, resolve_id: ResolveId, outcome: Result<Value, BridgeError>) {
        match self.completion {
            Completion::Awaiting(sender) => {
                if sender.send(outcome).is_err() {
                    debug!(%resolve_id, command = %self.command, "caller gone before resolution");
                }
            }
            Completion::Detached => match outcome {
                Ok(_) => debug!(%resolve_id, command = %self.command, "detached command resolved"),
                Err(e) => warn!(%resolve_id, command = %self.command, error = %e, "detached command failed"),
            },
        }
    }
}

#[derive(Default)]
pub(crate) struct CorrelationTable {
    pending: HashMap<ResolveId, PendingRequest>,
    ids: ResolveIdGenerator,
}

impl CorrelationTable {
    #[cfg(test)]
    pub(crate) fn with_generator(ids: ResolveIdGenerator) -> Self {
        Self {
            pending: HashMap::new(),
            ids,
        }
    }

    /// Allocate an id not currently outstanding and register the entry under it.
    pub(crate) fn register(
        &mut self,
        command: &str,
        completion: Completion,
        deadline: Option<Instant>,
    ) -> ResolveId {
        let pending = &self.pending;
        let id = self.ids.next_free(|id| pending.contains_key(&id));
        self.pending.insert(
            id,
            PendingRequest {
                command: command.to_string(),
                deadline,
                completion,
            },
        );
        id
    }

    pub(crate) fn take(&mut self, id: ResolveId) -> Option<PendingRequest> {
        self.pending.remove(&id)
    }

    /// Remove every entry whose deadline is at or before `now`.
    pub(crate) fn take_expired(&mut self, now: Instant) -> Vec<(ResolveId, PendingRequest)> {
        let expired: Vec<ResolveId> = self
            .pending
            .iter()
            .filter(|(_, request)| request.deadline.is_some_and(|deadline| deadline <= now))
            .map(|(id, _)| *id)
            .collect();
        expired
            .into_iter()
            .filter_map(|id| self.pending.remove(&id).map(|request| (id, request)))
            .collect()
    }

    pub(crate) fn drain(&mut self) -> Vec<(ResolveId, PendingRequest)> {
        self.pending.drain().collect()
    }

    pub(crate) fn contains(&self, id: ResolveId) -> bool {
        self.pending.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}
