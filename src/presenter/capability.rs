//! # Presenter capability and the optional loadable surface.
//!
//! A presenter is whatever an interactor drives. The core never inspects it
//! beyond one interface query: [`Presenter::as_loadable`]. When it returns a
//! [`Loadable`], the interactor loads the surface on attach and unloads it on
//! detach.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use ribvisor::{Loadable, Presenter, PresenterLifecycle};
//!
//! struct Board {
//!     lifecycle: PresenterLifecycle,
//! }
//!
//! impl Presenter for Board {
//!     fn as_loadable(&self) -> Option<&dyn Loadable> {
//!         Some(&self.lifecycle)
//!     }
//! }
//!
//! let board: Arc<dyn Presenter> = Arc::new(Board { lifecycle: PresenterLifecycle::new() });
//! assert!(board.as_loadable().is_some());
//! ```

use std::sync::Arc;

use crate::error::LifecycleError;

/// Capability object an interactor drives.
pub trait Presenter: Send + Sync + 'static {
    /// Returns the loadable surface of this presenter, if it has one.
    fn as_loadable(&self) -> Option<&dyn Loadable> {
        None
    }
}

/// Presentation surface with explicit load/unload steps.
pub trait Loadable: Send + Sync {
    /// Loads the surface. Called by the interactor right after it becomes active.
    fn dispatch_load(&self) -> Result<(), LifecycleError>;

    /// Unloads the surface. Called by the interactor first thing on detach.
    fn dispatch_unload(&self) -> Result<(), LifecycleError>;
}

impl<T: Presenter + ?Sized> Presenter for Arc<T> {
    fn as_loadable(&self) -> Option<&dyn Loadable> {
        (**self).as_loadable()
    }
}

/// Presenter for interactors that drive nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmptyPresenter;

impl Presenter for EmptyPresenter {}
