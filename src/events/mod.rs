//! Tree events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** routers use to
//! report attach/detach activity across a whole tree.
//!
//! ## Contents
//! - [`RibEventKind`], [`RibEvent`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Router::dispatch_attach`, `Router::dispatch_detach`,
//!   `Router::handle_back_press`.
//! - **Consumers**: `SubscriberSet::listen` and any raw `Bus::subscribe` receiver.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{RibEvent, RibEventKind};
