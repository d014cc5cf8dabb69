//! # Tree event subscribers.
//!
//! Implement [`Subscribe`] to react to routers attaching and detaching
//! anywhere in a tree: audit trails, analytics of screen visits, a debug
//! overlay of the live tree. Register implementations with a
//! [`SubscriberSet`](crate::SubscriberSet), which gives each one its own
//! task and queue.
//!
//! `on_event` runs off the attach/detach path, so a subscriber may await I/O
//! without delaying the tree. When its queue is full, further tree events
//! for that subscriber are discarded with a `warn`; size the queue through
//! [`Subscribe::queue_capacity`] or [`Config::subscriber_queue`](crate::Config).
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use ribvisor::{RibEvent, RibEventKind, Subscribe};
//!
//! struct Audit;
//!
//! #[async_trait]
//! impl Subscribe for Audit {
//!     async fn on_event(&self, ev: &RibEvent) {
//!         if ev.kind == RibEventKind::Detached {
//!             // write audit record...
//!         }
//!     }
//!     fn name(&self) -> &'static str { "audit" }
//! }
//! ```

use async_trait::async_trait;

use crate::events::RibEvent;

/// Receiver of tree events fed by a [`SubscriberSet`](crate::SubscriberSet).
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Called once per tree event, in publish order.
    async fn on_event(&self, event: &RibEvent);

    /// Name shown in queue overflow and panic logs.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Queue size this subscriber wants, unless `Config::subscriber_queue`
    /// overrides it.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
