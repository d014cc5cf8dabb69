//! # Presenters: capability, binding, and the loadable surface.
//!
//! - [`Presenter`] - capability interface with the [`Loadable`] interface query
//! - [`EmptyPresenter`] - presenter for interactors that drive nothing
//! - [`PresenterBinding`] - explicit-over-injected resolution
//! - [`PresenterLifecycle`] - ready-made [`Loadable`] with presenter scopes

mod binding;
mod capability;
mod lifecycle;

pub use binding::PresenterBinding;
pub use capability::{EmptyPresenter, Loadable, Presenter};
pub use lifecycle::PresenterLifecycle;
