//! # Interactor: the attach/detach state machine of one tree node.
//!
//! ## States
//! ```text
//!            dispatch_attach               dispatch_detach
//! DETACHED ──────────────────► ACTIVE ──────────────────► DETACHED
//!    ▲                                                       │
//!    └──────────────── (re-attach, router kept) ─────────────┘
//! ```
//!
//! ## Step order
//! ```text
//! dispatch_attach(saved):               dispatch_detach():
//!   ├─► resolve presenter (or fail)       ├─► resolve presenter (or fail)
//!   ├─► publish Active                    ├─► presenter.dispatch_unload()   (if loadable)
//!   ├─► presenter.dispatch_load()         ├─► logic.will_resign_active()
//!   │     (if loadable)                   ├─► publish Inactive ──► scopes end
//!   └─► logic.did_become_active(saved)    └─► return presenter
//! ```
//!
//! ## Rules
//! - Preconditions are checked **before** any step runs: a rejected call
//!   changes nothing.
//! - Once the first step ran, every step runs. A failing load is returned
//!   **after** the attach completed.
//! - A failing unload is logged at `warn`; `dispatch_detach` still returns
//!   the presenter so the caller can finish teardown. Routers see the unload
//!   error through [`InteractorType::detach`].
//! - Attach on an attached interactor → [`LifecycleError::AlreadyAttached`].
//! - Detach on a detached or never-attached interactor → [`LifecycleError::NotAttached`].

use std::borrow::Cow;
use std::sync::{Arc, Weak};

use crate::config::Config;
use crate::error::LifecycleError;
use crate::lifecycle::{
    InteractorEvent, LifecycleReceiver, LifecycleScope, LifecycleStream, ScopeProvider,
};
use crate::presenter::{Presenter, PresenterBinding};
use crate::router::Router;
use crate::state::SavedState;

use super::logic::{InteractorLogic, InteractorType};
use super::slot::RouterSlot;

/// Business-logic unit of one tree node.
///
/// Owns its lifecycle stream, presenter binding and router slot; delegates
/// behavior to an [`InteractorLogic`].
pub struct Interactor<P> {
    name: Cow<'static, str>,
    lifecycle: LifecycleStream<InteractorEvent>,
    presenter: PresenterBinding<P>,
    router: RouterSlot,
    logic: Box<dyn InteractorLogic<P>>,
}

impl<P: Presenter + Clone> Interactor<P> {
    /// Creates a detached interactor with default configuration.
    pub fn new(name: impl Into<Cow<'static, str>>, logic: impl InteractorLogic<P>) -> Self {
        Self::with_config(name, logic, &Config::default())
    }

    /// Creates a detached interactor sized by `cfg`.
    pub fn with_config(
        name: impl Into<Cow<'static, str>>,
        logic: impl InteractorLogic<P>,
        cfg: &Config,
    ) -> Self {
        Self {
            name: name.into(),
            lifecycle: LifecycleStream::from_config(cfg),
            presenter: PresenterBinding::new(),
            router: RouterSlot::new(),
            logic: Box::new(logic),
        }
    }

    /// Sets the explicit presenter at construction time.
    pub fn with_presenter(self, presenter: P) -> Self {
        self.presenter.set_explicit(presenter);
        self
    }

    /// Returns a shared handle to this interactor.
    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Interactor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    // ---- presenter ----

    /// Resolves the presenter: explicit first, then injected.
    pub fn presenter(&self) -> Result<P, LifecycleError> {
        self.presenter.get()
    }

    /// Supplies the framework-injected presenter.
    pub fn inject_presenter(&self, presenter: P) {
        self.presenter.inject(presenter);
    }

    /// Sets the explicit presenter; it shadows injection from now on.
    ///
    /// Mostly useful in tests that swap in a fake presenter.
    pub fn set_presenter(&self, presenter: P) {
        self.presenter.set_explicit(presenter);
    }

    // ---- router ----

    /// Returns the owning router, if one was bound and is still alive.
    pub fn router(&self) -> Option<Arc<Router>> {
        self.router.get()
    }

    /// Binds the owning router. Write-once: a second call keeps the first
    /// router and fails with [`LifecycleError::RouterAlreadySet`].
    pub fn set_router(&self, router: &Arc<Router>) -> Result<(), LifecycleError> {
        self.bind_router_weak(Arc::downgrade(router))
    }

    fn bind_router_weak(&self, router: Weak<Router>) -> Result<(), LifecycleError> {
        self.router.set(router).map_err(|_rejected| {
            tracing::warn!(interactor = %self.name, "router already set; keeping the first one");
            LifecycleError::RouterAlreadySet {
                interactor: self.name.to_string(),
            }
        })
    }

    // ---- lifecycle ----

    /// True while the current lifecycle event is `Active`.
    pub fn is_attached(&self) -> bool {
        self.lifecycle.peek() == Some(InteractorEvent::Active)
    }

    /// Most recent lifecycle event, if any.
    pub fn peek_lifecycle(&self) -> Option<InteractorEvent> {
        self.lifecycle.peek()
    }

    /// Subscribes to lifecycle events (replaying the latest one).
    pub fn lifecycle(&self) -> LifecycleReceiver<InteractorEvent> {
        self.lifecycle.subscribe()
    }

    /// Returns a handle to the lifecycle stream itself.
    pub fn lifecycle_stream(&self) -> LifecycleStream<InteractorEvent> {
        self.lifecycle.clone()
    }

    /// Runs the attach protocol.
    pub fn dispatch_attach(&self, saved: Option<&SavedState>) -> Result<(), LifecycleError> {
        if self.is_attached() {
            tracing::warn!(interactor = %self.name, "attach rejected: already attached");
            return Err(LifecycleError::AlreadyAttached {
                node: self.name.to_string(),
            });
        }
        let presenter = self.presenter.get()?;

        self.lifecycle.publish(InteractorEvent::Active)?;
        tracing::debug!(interactor = %self.name, restored = saved.is_some(), "interactor active");

        let loaded = match presenter.as_loadable() {
            Some(surface) => surface.dispatch_load(),
            None => Ok(()),
        };
        self.logic.did_become_active(self, saved);
        loaded
    }

    /// Runs the detach protocol and returns the presenter of the ending cycle.
    ///
    /// A failing unload does not fail the detach: it is logged at `warn` and
    /// the presenter is still returned.
    pub fn dispatch_detach(&self) -> Result<P, LifecycleError> {
        self.run_detach().map(|(presenter, _unloaded)| presenter)
    }

    /// Detach steps shared by [`dispatch_detach`](Self::dispatch_detach) and
    /// routers. The inner result is the unload outcome.
    fn run_detach(&self) -> Result<(P, Result<(), LifecycleError>), LifecycleError> {
        if !self.is_attached() {
            tracing::warn!(interactor = %self.name, "detach rejected: not attached");
            return Err(LifecycleError::NotAttached {
                node: self.name.to_string(),
            });
        }
        let presenter = self.presenter.get()?;

        let unloaded = match presenter.as_loadable() {
            Some(surface) => surface.dispatch_unload(),
            None => Ok(()),
        };
        if let Err(e) = &unloaded {
            tracing::warn!(interactor = %self.name, error = %e, "presenter unload failed");
        }
        self.logic.will_resign_active(self);
        self.lifecycle.publish(InteractorEvent::Inactive)?;
        tracing::debug!(interactor = %self.name, "interactor inactive");

        Ok((presenter, unloaded))
    }

    /// Asks the logic whether it consumes a back press. No state change.
    pub fn handle_back_press(&self) -> bool {
        self.logic.handle_back_press(self)
    }

    /// Lets the logic write its state into `out`.
    pub fn save_instance_state(&self, out: &mut SavedState) {
        self.logic.on_save_instance_state(self, out);
    }
}

impl<P: Presenter + Clone> ScopeProvider for Interactor<P> {
    fn request_scope(&self) -> Result<LifecycleScope, LifecycleError> {
        self.lifecycle.request_scope()
    }
}

impl<P: Presenter + Clone> InteractorType for Interactor<P> {
    fn name(&self) -> &str {
        Interactor::name(self)
    }

    fn is_attached(&self) -> bool {
        Interactor::is_attached(self)
    }

    fn handle_back_press(&self) -> bool {
        Interactor::handle_back_press(self)
    }

    fn attach(&self, saved: Option<&SavedState>) -> Result<(), LifecycleError> {
        self.dispatch_attach(saved)
    }

    fn detach(&self) -> Result<(), LifecycleError> {
        self.run_detach().and_then(|(_presenter, unloaded)| unloaded)
    }

    fn save_instance_state(&self, out: &mut SavedState) {
        Interactor::save_instance_state(self, out);
    }

    fn bind_router(&self, router: Weak<Router>) -> Result<(), LifecycleError> {
        self.bind_router_weak(router)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{EmptyPresenter, Loadable, PresenterLifecycle};
    use std::sync::Mutex;

    /// Records the order of observable steps.
    #[derive(Clone, Default)]
    struct Journal(Arc<Mutex<Vec<String>>>);

    impl Journal {
        fn push(&self, entry: impl Into<String>) {
            self.0.lock().unwrap().push(entry.into());
        }

        fn entries(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    struct Surface {
        lifecycle: PresenterLifecycle,
        journal: Journal,
    }

    impl Loadable for Surface {
        fn dispatch_load(&self) -> Result<(), LifecycleError> {
            self.journal.push("load");
            self.lifecycle.dispatch_load()
        }

        fn dispatch_unload(&self) -> Result<(), LifecycleError> {
            self.journal.push("unload");
            self.lifecycle.dispatch_unload()
        }
    }

    impl Presenter for Surface {
        fn as_loadable(&self) -> Option<&dyn Loadable> {
            Some(self)
        }
    }

    struct Recording {
        journal: Journal,
    }

    impl InteractorLogic<Arc<Surface>> for Recording {
        fn did_become_active(
            &self,
            interactor: &Interactor<Arc<Surface>>,
            _: Option<&SavedState>,
        ) {
            let loaded = interactor
                .presenter()
                .map(|p| p.lifecycle.is_loaded())
                .unwrap_or(false);
            self.journal.push(format!("did_become_active loaded={loaded}"));
        }

        fn will_resign_active(&self, interactor: &Interactor<Arc<Surface>>) {
            self.journal
                .push(format!("will_resign_active attached={}", interactor.is_attached()));
        }
    }

    fn surface(journal: &Journal) -> Arc<Surface> {
        Arc::new(Surface {
            lifecycle: PresenterLifecycle::new(),
            journal: journal.clone(),
        })
    }

    #[test]
    fn test_attach_loads_before_hook() {
        let journal = Journal::default();
        let interactor = Interactor::new(
            "game",
            Recording {
                journal: journal.clone(),
            },
        )
        .with_presenter(surface(&journal));

        interactor.dispatch_attach(None).unwrap();
        assert_eq!(
            journal.entries(),
            vec!["load", "did_become_active loaded=true"]
        );
    }

    #[test]
    fn test_detach_unloads_then_hook_then_publish() {
        let journal = Journal::default();
        let interactor = Interactor::new(
            "game",
            Recording {
                journal: journal.clone(),
            },
        )
        .with_presenter(surface(&journal));

        interactor.dispatch_attach(None).unwrap();
        let presenter = interactor.dispatch_detach().unwrap();

        assert_eq!(
            &journal.entries()[2..],
            &["unload", "will_resign_active attached=true"]
        );
        assert!(!presenter.lifecycle.is_loaded());
        assert!(!interactor.is_attached());
    }

    #[test]
    fn test_attach_without_presenter_changes_nothing() {
        let interactor = Interactor::<EmptyPresenter>::new("orphan", ());
        assert_eq!(
            interactor.dispatch_attach(None).unwrap_err(),
            LifecycleError::PresenterNotSet
        );
        assert_eq!(interactor.peek_lifecycle(), None);
    }

    #[test]
    fn test_double_attach_rejected() {
        let interactor = Interactor::new("twice", ()).with_presenter(EmptyPresenter);
        interactor.dispatch_attach(None).unwrap();
        assert!(matches!(
            interactor.dispatch_attach(None),
            Err(LifecycleError::AlreadyAttached { .. })
        ));
        assert!(interactor.is_attached());
    }

    #[test]
    fn test_detach_never_attached_fails() {
        let interactor = Interactor::new("fresh", ()).with_presenter(EmptyPresenter);
        assert_eq!(
            interactor.dispatch_detach().unwrap_err(),
            LifecycleError::NotAttached {
                node: "fresh".into()
            }
        );
    }

    #[test]
    fn test_reattach_starts_new_cycle() {
        let interactor = Interactor::new("again", ()).with_presenter(EmptyPresenter);
        interactor.dispatch_attach(None).unwrap();
        let first = interactor.request_scope().unwrap();
        interactor.dispatch_detach().unwrap();
        assert!(interactor.request_scope().is_err());

        interactor.dispatch_attach(None).unwrap();
        let second = interactor.request_scope().unwrap();
        assert!(first.is_ended());
        assert!(!second.is_ended());
    }

    #[test]
    fn test_failed_load_still_completes_attach() {
        let journal = Journal::default();
        let shared = surface(&journal);
        shared.lifecycle.dispatch_load().unwrap();

        let interactor = Interactor::new(
            "shared",
            Recording {
                journal: journal.clone(),
            },
        )
        .with_presenter(shared);

        assert!(matches!(
            interactor.dispatch_attach(None),
            Err(LifecycleError::OutOfSequence { .. })
        ));
        assert!(interactor.is_attached());
        assert!(
            journal
                .entries()
                .contains(&"did_become_active loaded=true".to_string())
        );
    }

    struct StuckSurface;

    impl Loadable for StuckSurface {
        fn dispatch_load(&self) -> Result<(), LifecycleError> {
            Ok(())
        }

        fn dispatch_unload(&self) -> Result<(), LifecycleError> {
            Err(LifecycleError::NotStarted)
        }
    }

    impl Presenter for StuckSurface {
        fn as_loadable(&self) -> Option<&dyn Loadable> {
            Some(self)
        }
    }

    #[test]
    fn test_failed_unload_still_returns_presenter() {
        let stuck = Arc::new(StuckSurface);
        let interactor = Interactor::new("stuck", ()).with_presenter(stuck.clone());

        interactor.dispatch_attach(None).unwrap();
        let returned = interactor.dispatch_detach().unwrap();
        assert!(Arc::ptr_eq(&returned, &stuck));
        assert!(!interactor.is_attached());
        assert_eq!(interactor.peek_lifecycle(), Some(InteractorEvent::Inactive));
    }

    #[test]
    fn test_failed_unload_reported_to_router_view() {
        let interactor = Interactor::new("stuck", ()).with_presenter(Arc::new(StuckSurface));
        let view: &dyn InteractorType = &interactor;

        view.attach(None).unwrap();
        assert_eq!(view.detach().unwrap_err(), LifecycleError::NotStarted);
        assert!(!view.is_attached());
    }

    #[test]
    fn test_router_slot_is_write_once() {
        let interactor = Interactor::new("solo", ()).with_presenter(EmptyPresenter);
        assert!(interactor.router().is_none());
        assert!(interactor.bind_router_weak(Weak::new()).is_ok());
        assert_eq!(
            interactor.bind_router_weak(Weak::new()).unwrap_err(),
            LifecycleError::RouterAlreadySet {
                interactor: "solo".into()
            }
        );
    }
}
