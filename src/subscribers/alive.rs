//! # Attached-router tracker with sequence-based ordering.
//!
//! Maintains a view of which routers are currently attached, built purely
//! from tree events. Event sequence numbers protect the view against
//! out-of-order delivery.
//!
//! ## Architecture
//! ```text
//! Router ──► Bus ──► SubscriberSet ──► AttachedTracker::on_event()
//!                                              │
//!                                              ▼
//!                                   HashMap<String, NodeState>
//!                                     (name → {seq, attached})
//! ```
//!
//! ## Rules
//! - Only `Attached` / `Detached` change attached state
//! - Events with `seq <= last_seq` for a node are **rejected** (stale)
//! - Reads (`snapshot`, `is_attached`) are **eventually consistent**

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::events::{RibEvent, RibEventKind};
use crate::subscribers::Subscribe;

/// Per-node state for ordering validation.
#[derive(Debug, Clone)]
struct NodeState {
    /// Last seen sequence number for this node.
    last_seq: u64,
    /// True between `Attached` and `Detached`.
    attached: bool,
}

/// Thread-safe tracker of attached routers.
#[derive(Default)]
pub struct AttachedTracker {
    state: RwLock<HashMap<String, NodeState>>,
}

impl AttachedTracker {
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `ev` if it is newer than the last event seen for its node.
    ///
    /// Returns `true` if attached state changed hands (applied), `false` for
    /// stale, unrelated or anonymous events.
    pub async fn update(&self, ev: &RibEvent) -> bool {
        let Some(name) = ev.node.as_deref() else {
            return false;
        };

        let mut state = self.state.write().await;
        let entry = state.entry(name.to_string()).or_insert(NodeState {
            last_seq: 0,
            attached: false,
        });

        if entry.last_seq != 0 && ev.seq <= entry.last_seq {
            return false;
        }
        match ev.kind {
            RibEventKind::Attached => {
                entry.last_seq = ev.seq;
                entry.attached = true;
                true
            }
            RibEventKind::Detached => {
                entry.last_seq = ev.seq;
                entry.attached = false;
                true
            }
            RibEventKind::BackPressHandled => {
                entry.last_seq = ev.seq;
                false
            }
        }
    }

    /// Returns sorted list of currently attached router names.
    pub async fn snapshot(&self) -> Vec<String> {
        let state = self.state.read().await;
        let mut attached: Vec<String> = state
            .iter()
            .filter(|(_, ns)| ns.attached)
            .map(|(name, _)| name.clone())
            .collect();
        attached.sort_unstable();
        attached
    }

    /// Returns true if the router is currently attached.
    pub async fn is_attached(&self, name: &str) -> bool {
        self.state
            .read()
            .await
            .get(name)
            .map(|ns| ns.attached)
            .unwrap_or(false)
    }
}

#[async_trait]
impl Subscribe for AttachedTracker {
    async fn on_event(&self, event: &RibEvent) {
        self.update(event).await;
    }

    fn name(&self) -> &'static str {
        "AttachedTracker"
    }
}
