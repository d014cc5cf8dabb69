//! # Interactors: business logic bound to a lifecycle.
//!
//! This module provides:
//! - [`Interactor`] - the attach/detach state machine of one tree node
//! - [`InteractorLogic`] - overridable hooks (activation, resignation, back press, saved state)
//! - [`InteractorType`] - object-safe view held by routers

mod dispatch;
mod logic;
mod slot;

pub use dispatch::Interactor;
pub use logic::{InteractorLogic, InteractorType};
