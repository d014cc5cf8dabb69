//! Async work bound to lifecycle cycles.
//!
//! - [`Worker`], [`WorkerFn`], [`WorkerRef`] the unit of work
//! - [`WorkerBinder`], [`WorkerUnbinder`] run a worker once per open cycle

mod binder;
mod worker;

pub use binder::{WorkerBinder, WorkerUnbinder};
pub use worker::{Worker, WorkerFn, WorkerRef};
