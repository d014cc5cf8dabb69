//! # Routers: the tree around interactors.
//!
//! - [`Router`] - owns one interactor and forwards attach/detach to its children
//! - [`RouterBuilder`] - optional name, tree event bus and `did_load` hook

mod builder;
mod node;

pub use builder::RouterBuilder;
pub use node::{CHILDREN_STATE_KEY, INTERACTOR_STATE_KEY, Router};
