// Copyright 2026 Reclaim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Typed reconciliation events.
//!
//! The bus is a `tokio::sync::broadcast` channel carrying [`PatchEvent`]
//! values. The watch command, tests, or any embedder can subscribe
//! independently; with no subscribers, events are silently dropped.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::patch::PassReport;

/// Which of the three reconciliation triggers produced a pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// The one-time pass at startup.
    Initial,
    /// The change scanner noticed the mirror was rewritten.
    Mutation,
    /// The delayed re-check scheduled after a detected change.
    Recheck,
    /// The fixed-interval polling fallback.
    Poll,
}

/// Every event the reconciler emits. Serialized to JSON for `--json`
/// output.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PatchEvent {
    /// The reconciler started and ran its initial pass.
    ReconcilerStarted { root: String, timestamp: String },
    /// The reconciler was stopped via its handle.
    ReconcilerStopped { root: String },
    /// The scanner detected an external rewrite of a mirrored file.
    FileChanged { path: String },
    /// A pass over one file changed its content.
    FilePatched {
        path: String,
        trigger: Trigger,
        report: PassReport,
    },
    /// A pass over the whole mirror finished with at least one change.
    PassCompleted {
        trigger: Trigger,
        files_changed: usize,
    },
}

/// Broadcast bus for [`PatchEvent`] values.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PatchEvent>,
}

impl EventBus {
    /// Create a bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Emit an event. Silently ignored when nobody is subscribed.
    pub fn emit(&self, event: PatchEvent) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<PatchEvent> {
        self.sender.subscribe()
    }
}

/// RFC 3339 timestamp for event payloads.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
