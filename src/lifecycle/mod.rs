//! Lifecycle events, replay-latest streams and cancellation scopes.
//!
//! This module groups the event **data model**, the **stream** every
//! interactor and loadable presenter owns, and the **scope** derivation that
//! turns the end of a cycle into cancellation.
//!
//! ## Contents
//! - [`LifecycleEvent`], [`InteractorEvent`], [`PresenterEvent`] event enums and the cycle mapping
//! - [`LifecycleStream`], [`LifecycleReceiver`] single-slot state + broadcast fan-out
//! - [`ScopeProvider`], [`LifecycleScope`] cancellation bound to one cycle
//!
//! ## Quick reference
//! - **Publishers**: `Interactor::dispatch_attach/dispatch_detach`,
//!   `PresenterLifecycle::dispatch_load/dispatch_unload`.
//! - **Consumers**: `WorkerBinder`, user code awaiting `LifecycleScope::ended`,
//!   anything holding a `LifecycleReceiver`.

mod event;
mod scope;
mod stream;

pub use event::{InteractorEvent, LifecycleEvent, PresenterEvent};
pub use scope::{LifecycleScope, ScopeProvider};
pub use stream::{LifecycleReceiver, LifecycleStream};
pub(crate) use stream::WeakLifecycleStream;
