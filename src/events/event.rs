//! # Tree events emitted by routers.
//!
//! The [`RibEventKind`] enum classifies what happened to a node of the tree;
//! the [`RibEvent`] struct carries the node name, its parent and a timestamp.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order (for example across subscriber queues).
//!
//! ## Example
//! ```rust
//! use ribvisor::{RibEvent, RibEventKind};
//!
//! let ev = RibEvent::new(RibEventKind::Attached)
//!     .with_node("game")
//!     .with_parent("root");
//!
//! assert_eq!(ev.kind, RibEventKind::Attached);
//! assert_eq!(ev.node.as_deref(), Some("game"));
//! assert_eq!(ev.parent.as_deref(), Some("root"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of tree events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RibEventKind {
    /// Router (and its interactor) attached.
    ///
    /// Sets:
    /// - `node`: router name
    /// - `parent`: parent router name (absent for a root)
    Attached,

    /// Router (and its interactor) detached.
    ///
    /// Sets:
    /// - `node`: router name
    /// - `parent`: parent router name (absent for a root)
    Detached,

    /// Interactor consumed a back press.
    ///
    /// Sets:
    /// - `node`: router name
    BackPressHandled,
}

impl RibEventKind {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(self) -> &'static str {
        match self {
            RibEventKind::Attached => "attached",
            RibEventKind::Detached => "detached",
            RibEventKind::BackPressHandled => "back_press_handled",
        }
    }
}

/// Tree event with optional metadata.
#[derive(Debug, Clone)]
pub struct RibEvent {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: RibEventKind,
    /// Name of the router the event is about.
    pub node: Option<Arc<str>>,
    /// Name of that router's parent, if it has one.
    pub parent: Option<Arc<str>>,
}

impl RibEvent {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: RibEventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            node: None,
            parent: None,
        }
    }

    /// Attaches a node name.
    #[inline]
    pub fn with_node(mut self, node: impl Into<Arc<str>>) -> Self {
        self.node = Some(node.into());
        self
    }

    /// Attaches a parent name.
    #[inline]
    pub fn with_parent(mut self, parent: impl Into<Arc<str>>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the parent name if `parent` is `Some`.
    #[inline]
    pub fn with_parent_opt(mut self, parent: Option<impl Into<Arc<str>>>) -> Self {
        self.parent = parent.map(Into::into);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = RibEvent::new(RibEventKind::Attached);
        let b = RibEvent::new(RibEventKind::Detached);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_with_parent_opt() {
        let ev = RibEvent::new(RibEventKind::Attached).with_parent_opt(None::<&str>);
        assert!(ev.parent.is_none());

        let ev = RibEvent::new(RibEventKind::Attached).with_parent_opt(Some("root"));
        assert_eq!(ev.parent.as_deref(), Some("root"));
    }
}
