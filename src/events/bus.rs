//! # Tree event bus.
//!
//! Routers report attach, detach and handled back presses on a [`Bus`]. One
//! bus usually serves a whole tree: a child added with
//! `Router::attach_child` picks up its parent's bus unless it already has one.
//!
//! ```text
//! root ──┐
//! game ──┼─ publish(RibEvent) ─► Bus ─► SubscriberSet::listen, raw receivers
//! board ─┘
//! ```
//!
//! Publishing happens inside `dispatch_attach`/`dispatch_detach`, so it must
//! not wait: a send with nobody listening is simply discarded. A receiver
//! that falls more than the capacity behind loses the oldest tree events and
//! sees `RecvError::Lagged`; use `RibEvent::seq` to notice the gap.

use tokio::sync::broadcast;

use crate::config::Config;

use super::event::RibEvent;

/// Shared sender for the tree events of one router tree.
///
/// Clones publish into the same channel.
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<RibEvent>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (min 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<RibEvent>(capacity.max(1));
        Self { tx }
    }

    /// Creates a bus sized by [`Config::bus_capacity`].
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.bus_capacity_clamped())
    }

    /// Sends `ev` to every current receiver; discarded when there are none.
    pub fn publish(&self, ev: RibEvent) {
        let _ = self.tx.send(ev);
    }

    /// Receiver of tree events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<RibEvent> {
        self.tx.subscribe()
    }
}
