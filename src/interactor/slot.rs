//! # Write-once router slot.
//!
//! The router reference of an interactor is set at most once. A second write
//! is **rejected** and the first router stays bound; the caller gets the
//! rejected value back and turns it into
//! [`LifecycleError::RouterAlreadySet`](crate::LifecycleError::RouterAlreadySet).
//!
//! The slot holds a `Weak` reference: the router owns the interactor, not the
//! other way around.

use std::sync::{Arc, OnceLock, Weak};

use crate::router::Router;

/// Set-at-most-once holder of the owning router.
#[derive(Default)]
pub(crate) struct RouterSlot {
    cell: OnceLock<Weak<Router>>,
}

impl RouterSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `router` if the slot is empty; otherwise hands it back untouched.
    pub(crate) fn set(&self, router: Weak<Router>) -> Result<(), Weak<Router>> {
        self.cell.set(router)
    }

    /// Returns the router if one was set and it is still alive.
    pub(crate) fn get(&self) -> Option<Arc<Router>> {
        self.cell.get().and_then(Weak::upgrade)
    }

    #[cfg(test)]
    pub(crate) fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_set_is_rejected() {
        let slot = RouterSlot::new();
        assert!(!slot.is_set());
        assert!(slot.set(Weak::new()).is_ok());
        assert!(slot.set(Weak::new()).is_err());
        assert!(slot.is_set());
        assert!(slot.get().is_none());
    }
}
