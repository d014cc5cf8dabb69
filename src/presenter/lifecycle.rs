//! # Reusable loadable surface with its own lifecycle.
//!
//! [`PresenterLifecycle`] implements [`Loadable`] on top of a
//! [`LifecycleStream<PresenterEvent>`]. Embed it in a presenter and return it
//! from [`Presenter::as_loadable`](crate::Presenter::as_loadable) to get
//! presenter-scoped cancellation for free:
//!
//! ```text
//! Interactor::dispatch_attach ──► dispatch_load()   ──► publish Loaded
//! Interactor::dispatch_detach ──► dispatch_unload() ──► publish Unloaded ──► presenter scopes end
//! ```

use crate::config::Config;
use crate::error::LifecycleError;
use crate::lifecycle::{
    LifecycleReceiver, LifecycleScope, LifecycleStream, PresenterEvent, ScopeProvider,
};

use super::capability::Loadable;

/// Load/unload lifecycle of a presentation surface.
#[derive(Clone)]
pub struct PresenterLifecycle {
    stream: LifecycleStream<PresenterEvent>,
}

impl PresenterLifecycle {
    /// Creates an unloaded lifecycle with default configuration.
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Creates an unloaded lifecycle sized by `cfg`.
    pub fn with_config(cfg: &Config) -> Self {
        Self {
            stream: LifecycleStream::from_config(cfg),
        }
    }

    /// True between load and unload.
    pub fn is_loaded(&self) -> bool {
        self.stream.peek() == Some(PresenterEvent::Loaded)
    }

    /// Most recent presenter event, if any.
    pub fn peek_lifecycle(&self) -> Option<PresenterEvent> {
        self.stream.peek()
    }

    /// Subscribes to presenter events (replaying the latest one).
    pub fn lifecycle(&self) -> LifecycleReceiver<PresenterEvent> {
        self.stream.subscribe()
    }
}

impl Default for PresenterLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Loadable for PresenterLifecycle {
    fn dispatch_load(&self) -> Result<(), LifecycleError> {
        self.stream.publish(PresenterEvent::Loaded)?;
        tracing::debug!("presenter loaded");
        Ok(())
    }

    fn dispatch_unload(&self) -> Result<(), LifecycleError> {
        self.stream.publish(PresenterEvent::Unloaded)?;
        tracing::debug!("presenter unloaded");
        Ok(())
    }
}

impl ScopeProvider for PresenterLifecycle {
    fn request_scope(&self) -> Result<LifecycleScope, LifecycleError> {
        self.stream.request_scope()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_unload_cycle() {
        let lifecycle = PresenterLifecycle::new();
        assert!(!lifecycle.is_loaded());

        lifecycle.dispatch_load().unwrap();
        assert!(lifecycle.is_loaded());
        let scope = lifecycle.request_scope().unwrap();

        lifecycle.dispatch_unload().unwrap();
        assert!(!lifecycle.is_loaded());
        assert!(scope.is_ended());
        assert_eq!(lifecycle.peek_lifecycle(), Some(PresenterEvent::Unloaded));
    }

    #[test]
    fn test_double_load_is_out_of_sequence() {
        let lifecycle = PresenterLifecycle::new();
        lifecycle.dispatch_load().unwrap();
        assert_eq!(
            lifecycle.dispatch_load().unwrap_err(),
            LifecycleError::OutOfSequence {
                expected: "unloaded",
                got: "loaded"
            }
        );
    }

    #[test]
    fn test_unload_before_load_fails() {
        let lifecycle = PresenterLifecycle::new();
        assert!(lifecycle.dispatch_unload().is_err());
        assert_eq!(lifecycle.peek_lifecycle(), None);
    }
}
