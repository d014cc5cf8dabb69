//! # Overridable interactor behavior.
//!
//! [`InteractorLogic`] carries the business logic of one tree node. Every hook
//! has a default so implementors override only what they need. Hooks receive
//! the owning [`Interactor`] to reach its presenter, router and scopes.
//!
//! [`InteractorType`] is the object-safe view of an interactor that routers
//! hold: routers do not know the presenter type.
//!
//! ## Example
//! ```rust
//! use ribvisor::{EmptyPresenter, Interactor, InteractorLogic, SavedState};
//!
//! struct Lobby;
//!
//! impl InteractorLogic<EmptyPresenter> for Lobby {
//!     fn did_become_active(
//!         &self,
//!         interactor: &Interactor<EmptyPresenter>,
//!         _saved: Option<&SavedState>,
//!     ) {
//!         assert!(interactor.is_attached());
//!     }
//!
//!     fn handle_back_press(&self, _interactor: &Interactor<EmptyPresenter>) -> bool {
//!         true
//!     }
//! }
//!
//! let lobby = Interactor::new("lobby", Lobby).with_presenter(EmptyPresenter);
//! lobby.dispatch_attach(None).unwrap();
//! assert!(lobby.handle_back_press());
//! ```

use std::sync::Weak;

use crate::error::LifecycleError;
use crate::router::Router;
use crate::state::SavedState;

use super::dispatch::Interactor;

/// Business logic hooks of an interactor.
///
/// All hooks run on the thread calling `dispatch_attach`/`dispatch_detach`.
pub trait InteractorLogic<P>: Send + Sync + 'static {
    /// Runs after the interactor became active and its presenter loaded.
    fn did_become_active(&self, _interactor: &Interactor<P>, _saved: Option<&SavedState>) {}

    /// Runs after the presenter unloaded, before the interactor goes inactive.
    fn will_resign_active(&self, _interactor: &Interactor<P>) {}

    /// Returns `true` if this interactor consumed a back press.
    fn handle_back_press(&self, _interactor: &Interactor<P>) -> bool {
        false
    }

    /// Writes state worth restoring into `out`.
    fn on_save_instance_state(&self, _interactor: &Interactor<P>, _out: &mut SavedState) {}
}

/// Logic with every hook left at its default.
impl<P: 'static> InteractorLogic<P> for () {}

/// Object-safe view of an interactor, as held by its [`Router`].
pub trait InteractorType: Send + Sync + 'static {
    /// Interactor name.
    fn name(&self) -> &str;

    /// True while the interactor is active.
    fn is_attached(&self) -> bool;

    /// Asks the interactor to consume a back press.
    fn handle_back_press(&self) -> bool;

    /// Runs the attach protocol.
    fn attach(&self, saved: Option<&SavedState>) -> Result<(), LifecycleError>;

    /// Runs the detach protocol, discarding the presenter.
    ///
    /// The detach always completes once started; a failing presenter unload
    /// is returned afterwards.
    fn detach(&self) -> Result<(), LifecycleError>;

    /// Lets the interactor write its state into `out`.
    fn save_instance_state(&self, out: &mut SavedState);

    /// Binds the owning router. Fails if a router is already bound.
    fn bind_router(&self, router: Weak<Router>) -> Result<(), LifecycleError>;
}
