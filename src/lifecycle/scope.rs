//! # Lifecycle-bound cancellation scopes.
//!
//! A [`LifecycleScope`] is a cancellation handle derived from a lifecycle
//! stream. It is live from the opening event of a cycle until the matching
//! terminal event, and is cancelled **inside** the `publish` call that
//! publishes that terminal event.
//!
//! ## Architecture
//! ```text
//! publish(Active)   ──► ScopeWindow::observe ──► open window (fresh root token)
//! request_scope()   ──► ScopeWindow::scope   ──► LifecycleScope(child of root)
//! publish(Inactive) ──► ScopeWindow::observe ──► root.cancel() ──► every scope ends
//! ```
//!
//! ## Rules
//! - No event published yet → [`LifecycleError::NotStarted`]
//! - Current event is terminal → [`LifecycleError::Ended`]
//! - Each window has its own root token: scopes never outlive their cycle and
//!   a later cycle never revives them
//! - Cancellation is idempotent, so a scope ends exactly once

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::LifecycleError;

use super::event::LifecycleEvent;

/// Anything that can hand out lifecycle scopes.
///
/// Implemented by [`LifecycleStream`](crate::LifecycleStream),
/// [`Interactor`](crate::Interactor) and
/// [`PresenterLifecycle`](crate::PresenterLifecycle).
pub trait ScopeProvider {
    /// Requests a scope bound to the current cycle.
    fn request_scope(&self) -> Result<LifecycleScope, LifecycleError>;
}

/// Cancellation handle valid for one cycle of a lifecycle.
///
/// Cheap to clone; clones share the same cancellation.
#[derive(Clone, Debug)]
pub struct LifecycleScope {
    token: CancellationToken,
    ends_on: &'static str,
}

impl LifecycleScope {
    fn new(token: CancellationToken, ends_on: &'static str) -> Self {
        Self { token, ends_on }
    }

    /// Label of the terminal event that ends this scope.
    pub fn ends_on(&self) -> &'static str {
        self.ends_on
    }

    /// True once the terminal event has been published.
    pub fn is_ended(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Returns a token cancelled when this scope ends.
    ///
    /// Cancelling the returned token does **not** end the lifecycle; it only
    /// cancels work bound to that token.
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    /// Completes when the scope ends.
    pub async fn ended(&self) {
        self.token.cancelled().await;
    }

    /// Runs `fut` until it completes or the scope ends, whichever comes first.
    ///
    /// Returns `None` if the scope ended first; the future is dropped at that
    /// point. A scope that already ended returns `None` without polling `fut`.
    pub async fn run<F>(&self, fut: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }
}

/// Per-stream window tracking the currently open cycle.
#[derive(Debug)]
pub(crate) struct ScopeWindow<E> {
    open: Option<(E, CancellationToken)>,
}

impl<E: LifecycleEvent> ScopeWindow<E> {
    pub(crate) fn new() -> Self {
        Self { open: None }
    }

    /// Validates `event` against the window and applies it.
    ///
    /// ### State transitions
    /// - closed + opening event  → open (fresh root token)
    /// - open   + awaited end    → cancel root, closed
    /// - anything else           → `OutOfSequence`, window untouched
    pub(crate) fn observe(&mut self, event: E) -> Result<(), LifecycleError> {
        match (&self.open, event.terminal_successor()) {
            (None, Some(end)) => {
                self.open = Some((end, CancellationToken::new()));
                Ok(())
            }
            (None, None) => Err(LifecycleError::OutOfSequence {
                expected: E::opening().as_label(),
                got: event.as_label(),
            }),
            (Some((end, _)), _) if *end == event => {
                if let Some((_, root)) = self.open.take() {
                    root.cancel();
                }
                Ok(())
            }
            (Some((end, _)), _) => Err(LifecycleError::OutOfSequence {
                expected: end.as_label(),
                got: event.as_label(),
            }),
        }
    }

    /// Derives a scope for the cycle `current` belongs to.
    pub(crate) fn scope(&self, current: Option<E>) -> Result<LifecycleScope, LifecycleError> {
        let current = current.ok_or(LifecycleError::NotStarted)?;
        let Some(end) = current.terminal_successor() else {
            return Err(LifecycleError::Ended {
                event: current.as_label(),
            });
        };
        match &self.open {
            Some((awaited, root)) if *awaited == end => {
                Ok(LifecycleScope::new(root.child_token(), end.as_label()))
            }
            _ => Err(LifecycleError::OutOfSequence {
                expected: end.as_label(),
                got: current.as_label(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::event::InteractorEvent;

    #[test]
    fn test_scope_before_start_fails() {
        let window = ScopeWindow::<InteractorEvent>::new();
        assert_eq!(window.scope(None).unwrap_err(), LifecycleError::NotStarted);
    }

    #[test]
    fn test_scope_ends_on_terminal() {
        let mut window = ScopeWindow::new();
        window.observe(InteractorEvent::Active).unwrap();
        let scope = window.scope(Some(InteractorEvent::Active)).unwrap();
        assert_eq!(scope.ends_on(), "inactive");
        assert!(!scope.is_ended());

        window.observe(InteractorEvent::Inactive).unwrap();
        assert!(scope.is_ended());
    }

    #[test]
    fn test_scope_after_terminal_fails() {
        let mut window = ScopeWindow::new();
        window.observe(InteractorEvent::Active).unwrap();
        window.observe(InteractorEvent::Inactive).unwrap();
        assert_eq!(
            window.scope(Some(InteractorEvent::Inactive)).unwrap_err(),
            LifecycleError::Ended { event: "inactive" }
        );
    }

    #[test]
    fn test_out_of_sequence_rejected_without_mutation() {
        let mut window = ScopeWindow::new();
        assert_eq!(
            window.observe(InteractorEvent::Inactive).unwrap_err(),
            LifecycleError::OutOfSequence {
                expected: "active",
                got: "inactive"
            }
        );

        window.observe(InteractorEvent::Active).unwrap();
        let scope = window.scope(Some(InteractorEvent::Active)).unwrap();
        assert!(window.observe(InteractorEvent::Active).is_err());
        assert!(!scope.is_ended());
    }

    #[test]
    fn test_new_cycle_does_not_revive_old_scope() {
        let mut window = ScopeWindow::new();
        window.observe(InteractorEvent::Active).unwrap();
        let first = window.scope(Some(InteractorEvent::Active)).unwrap();
        window.observe(InteractorEvent::Inactive).unwrap();

        window.observe(InteractorEvent::Active).unwrap();
        let second = window.scope(Some(InteractorEvent::Active)).unwrap();
        assert!(first.is_ended());
        assert!(!second.is_ended());
    }

    #[test]
    fn test_cancelling_derived_token_keeps_scope() {
        let mut window = ScopeWindow::new();
        window.observe(InteractorEvent::Active).unwrap();
        let scope = window.scope(Some(InteractorEvent::Active)).unwrap();

        scope.token().cancel();
        assert!(!scope.is_ended());
    }

    #[tokio::test]
    async fn test_run_returns_none_once_ended() {
        let mut window = ScopeWindow::new();
        window.observe(InteractorEvent::Active).unwrap();
        let scope = window.scope(Some(InteractorEvent::Active)).unwrap();

        assert_eq!(scope.run(async { 7 }).await, Some(7));

        window.observe(InteractorEvent::Inactive).unwrap();
        assert_eq!(scope.run(async { 7 }).await, None);
    }
}
