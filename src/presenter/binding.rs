//! # Presenter binding: explicit value first, injected value second.
//!
//! ```text
//! get()
//!   ├─► explicit set?  → clone explicit
//!   ├─► injected?      → clone injected
//!   └─► neither        → LifecycleError::PresenterNotSet
//! ```
//!
//! Resolution happens on every call, so an injection that lands between two
//! calls is observed without extra coordination. Once an explicit value is
//! set it shadows injection for good.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::error::LifecycleError;

struct Slots<P> {
    explicit: Option<P>,
    injected: Option<P>,
}

/// Lazily resolved presenter of one interactor.
pub struct PresenterBinding<P> {
    slots: Mutex<Slots<P>>,
}

impl<P: Clone> PresenterBinding<P> {
    /// Creates an empty binding.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                explicit: None,
                injected: None,
            }),
        }
    }

    /// Creates a binding with an explicit presenter already set.
    pub fn with_explicit(presenter: P) -> Self {
        let binding = Self::new();
        binding.set_explicit(presenter);
        binding
    }

    fn lock(&self) -> MutexGuard<'_, Slots<P>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Resolves the presenter.
    pub fn get(&self) -> Result<P, LifecycleError> {
        let slots = self.lock();
        slots
            .explicit
            .as_ref()
            .or(slots.injected.as_ref())
            .cloned()
            .ok_or(LifecycleError::PresenterNotSet)
    }

    /// Sets the explicit presenter, replacing a previous explicit one.
    pub fn set_explicit(&self, presenter: P) {
        self.lock().explicit = Some(presenter);
    }

    /// Supplies the framework-injected presenter.
    ///
    /// Has no visible effect while an explicit presenter is set.
    pub fn inject(&self, presenter: P) {
        self.lock().injected = Some(presenter);
    }

    /// True if [`get`](Self::get) would succeed.
    pub fn is_bound(&self) -> bool {
        let slots = self.lock();
        slots.explicit.is_some() || slots.injected.is_some()
    }
}

impl<P: Clone> Default for PresenterBinding<P> {
    fn default() -> Self {
        Self::new()
    }
}
