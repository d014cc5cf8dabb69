//! # ribvisor
//!
//! **Ribvisor** is the lifecycle core of a component-tree architecture.
//!
//! An application is a tree of nodes. Each node pairs an [`Interactor`]
//! (business logic) with a [`Router`] (tree structure) and optionally drives a
//! [`Presenter`]. Interactors publish their lifecycle as a replay-latest event
//! stream, and hand out [`LifecycleScope`]s that end synchronously when the
//! interactor detaches.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                     ┌──────────────────────────┐
//!                     │ Router (root)            │
//!                     │  - Interactor ──► Presenter (optional Loadable)
//!                     │  - children[]            │
//!                     └──────┬────────────┬──────┘
//!                            ▼            ▼
//!                     ┌────────────┐ ┌────────────┐
//!                     │ Router     │ │ Router     │
//!                     │ (child #1) │ │ (child #2) │
//!                     └────────────┘ └────────────┘
//!
//! Interactor
//!   ├─ LifecycleStream<InteractorEvent> ──► LifecycleReceiver (replay latest + live)
//!   │                                   ──► LifecycleScope    (ends on Inactive)
//!   │                                   ──► WorkerBinder      (one run per cycle)
//!   ├─ PresenterBinding (explicit over injected)
//!   └─ router slot (write once)
//!
//! Router ── publish(RibEvent) ──► Bus ──► SubscriberSet ──► AttachedTracker, LogWriter, ...
//! ```
//!
//! ### Lifecycle
//! ```text
//! Router::dispatch_attach(saved)
//!   └─► Interactor::dispatch_attach
//!         ├─► resolve presenter           (PresenterNotSet → nothing changes)
//!         ├─► publish Active              (scope window opens)
//!         ├─► presenter.dispatch_load()   (if loadable)
//!         └─► logic.did_become_active(saved)
//!   ├─► did_load (first attach only)
//!   └─► children, top-down
//!
//! Router::dispatch_detach()
//!   ├─► children, bottom-up
//!   └─► Interactor::dispatch_detach
//!         ├─► presenter.dispatch_unload() (if loadable)
//!         ├─► logic.will_resign_active()
//!         └─► publish Inactive            (every scope of the cycle ends here)
//! ```
//!
//! ## Features
//! | Area              | Description                                                      | Key types / traits                                   |
//! |-------------------|------------------------------------------------------------------|------------------------------------------------------|
//! | **Lifecycle**     | Replay-latest event streams with cycle validation.               | [`LifecycleStream`], [`LifecycleEvent`]              |
//! | **Scopes**        | Cancellation bound to one attach cycle.                          | [`ScopeProvider`], [`LifecycleScope`]                |
//! | **Interactors**   | Attach/detach protocol and overridable hooks.                    | [`Interactor`], [`InteractorLogic`]                  |
//! | **Presenters**    | Capability binding and optional load/unload surface.             | [`Presenter`], [`Loadable`], [`PresenterLifecycle`]  |
//! | **Routers**       | Tree structure, ordered attach/detach, saved state.              | [`Router`], [`RouterBuilder`], [`SavedState`]        |
//! | **Workers**       | Async work restarted in every cycle.                             | [`Worker`], [`WorkerFn`], [`WorkerBinder`]           |
//! | **Subscriber API**| Observe attach/detach across a whole tree.                       | [`Bus`], [`Subscribe`], [`SubscriberSet`]            |
//! | **Errors**        | Typed protocol and worker errors.                                | [`LifecycleError`], [`WorkerError`]                  |
//! | **Configuration** | Channel capacities.                                              | [`Config`]                                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use ribvisor::{
//!     EmptyPresenter, Interactor, InteractorEvent, LifecycleError, Router, ScopeProvider,
//! };
//!
//! let interactor = Interactor::new("root", ()).with_presenter(EmptyPresenter).into_arc();
//! let router = Router::new(interactor.clone())?;
//!
//! router.dispatch_attach(None)?;
//! let scope = interactor.request_scope()?;
//! assert_eq!(interactor.peek_lifecycle(), Some(InteractorEvent::Active));
//!
//! router.dispatch_detach()?;
//! assert!(scope.is_ended());
//! assert!(matches!(interactor.request_scope(), Err(LifecycleError::Ended { .. })));
//! # Ok::<(), LifecycleError>(())
//! ```
mod config;
mod error;
mod events;
mod interactor;
mod lifecycle;
mod presenter;
mod router;
mod state;
mod subscribers;
mod workers;

// ---- Public re-exports ----

pub use config::Config;
pub use error::{LifecycleError, WorkerError};
pub use events::{Bus, RibEvent, RibEventKind};
pub use interactor::{Interactor, InteractorLogic, InteractorType};
pub use lifecycle::{
    InteractorEvent, LifecycleEvent, LifecycleReceiver, LifecycleScope, LifecycleStream,
    PresenterEvent, ScopeProvider,
};
pub use presenter::{EmptyPresenter, Loadable, Presenter, PresenterBinding, PresenterLifecycle};
pub use router::{CHILDREN_STATE_KEY, INTERACTOR_STATE_KEY, Router, RouterBuilder};
pub use state::SavedState;
pub use subscribers::{AttachedTracker, Subscribe, SubscriberSet};
pub use workers::{Worker, WorkerBinder, WorkerFn, WorkerRef, WorkerUnbinder};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
