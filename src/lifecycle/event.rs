//! # Lifecycle events for interactors and presenters.
//!
//! Every lifecycle in this crate is a repetition of one **cycle**: an opening
//! event followed by exactly one terminal event.
//!
//! ```text
//! InteractorEvent:  Active ──► Inactive ──► Active ──► Inactive ...
//! PresenterEvent:   Loaded ──► Unloaded ──► Loaded ──► Unloaded ...
//! ```
//!
//! The [`LifecycleEvent`] trait exposes the finite correspondence mapping
//! `opening → terminal` that scope derivation relies on. A terminal event has
//! no successor: nothing can be "closed" by it twice.
//!
//! ## Example
//! ```rust
//! use ribvisor::{InteractorEvent, LifecycleEvent};
//!
//! assert_eq!(InteractorEvent::Active.terminal_successor(), Some(InteractorEvent::Inactive));
//! assert_eq!(InteractorEvent::Inactive.terminal_successor(), None);
//! assert!(InteractorEvent::Inactive.is_terminal());
//! ```

use std::fmt;

/// Common interface of lifecycle event enums.
///
/// Implementors are small `Copy` enums with exactly one opening event.
pub trait LifecycleEvent: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// The event that opens a cycle.
    fn opening() -> Self;

    /// The event that ends the cycle opened by `self`, or `None` if `self`
    /// is itself terminal.
    fn terminal_successor(self) -> Option<Self>;

    /// Short stable label (snake_case) for logs and errors.
    fn as_label(self) -> &'static str;

    /// True if `self` ends a cycle.
    #[inline]
    fn is_terminal(self) -> bool {
        self.terminal_successor().is_none()
    }
}

/// Lifecycle of an [`Interactor`](crate::Interactor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractorEvent {
    /// The interactor was attached and is running.
    Active,
    /// The interactor was detached.
    Inactive,
}

impl LifecycleEvent for InteractorEvent {
    fn opening() -> Self {
        InteractorEvent::Active
    }

    fn terminal_successor(self) -> Option<Self> {
        match self {
            InteractorEvent::Active => Some(InteractorEvent::Inactive),
            InteractorEvent::Inactive => None,
        }
    }

    fn as_label(self) -> &'static str {
        match self {
            InteractorEvent::Active => "active",
            InteractorEvent::Inactive => "inactive",
        }
    }
}

/// Lifecycle of a loadable presentation surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenterEvent {
    /// The surface finished loading.
    Loaded,
    /// The surface was unloaded.
    Unloaded,
}

impl LifecycleEvent for PresenterEvent {
    fn opening() -> Self {
        PresenterEvent::Loaded
    }

    fn terminal_successor(self) -> Option<Self> {
        match self {
            PresenterEvent::Loaded => Some(PresenterEvent::Unloaded),
            PresenterEvent::Unloaded => None,
        }
    }

    fn as_label(self) -> &'static str {
        match self {
            PresenterEvent::Loaded => "loaded",
            PresenterEvent::Unloaded => "unloaded",
        }
    }
}

impl fmt::Display for InteractorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

impl fmt::Display for PresenterEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_maps_to_terminal() {
        let open = InteractorEvent::opening();
        assert_eq!(open, InteractorEvent::Active);
        assert_eq!(open.terminal_successor(), Some(InteractorEvent::Inactive));

        let open = PresenterEvent::opening();
        assert_eq!(open.terminal_successor(), Some(PresenterEvent::Unloaded));
    }

    #[test]
    fn test_terminal_has_no_successor() {
        assert!(InteractorEvent::Inactive.is_terminal());
        assert!(PresenterEvent::Unloaded.is_terminal());
        assert!(!InteractorEvent::Active.is_terminal());
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(InteractorEvent::Inactive.to_string(), "inactive");
        assert_eq!(PresenterEvent::Loaded.to_string(), "loaded");
    }
}
