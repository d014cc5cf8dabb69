//! # Tree event subscribers.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and built-in implementations for handling tree events broadcast through the
//! [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Router ── publish(RibEvent) ──► Bus ──► SubscriberSet::listen ──► emit
//!                                                                      │
//!                                                 ┌──────────┬─────────┴──┐
//!                                                 ▼          ▼            ▼
//!                                          AttachedTracker LogWriter    Custom
//! ```
//!
//! ## Subscriber types
//! - **Passive subscribers** - observe and react to events (logging, alerts)
//! - **Stateful subscribers** - maintain internal state based on events (AttachedTracker)

mod alive;
#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

pub use alive::AttachedTracker;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
