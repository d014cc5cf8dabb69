//! Error types used by the lifecycle core and bound workers.
//!
//! This module defines two main error enums:
//!
//! - [`LifecycleError`] - misuse of the attach/detach/scope API.
//! - [`WorkerError`] - errors raised by individual worker runs.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging.
//! Every [`LifecycleError`] is a programmer error: none of them is transient,
//! so nothing in this crate retries.

use thiserror::Error;

/// # Errors produced by the lifecycle core.
///
/// Returned at the call site that violated a precondition or the
/// ACTIVE → INACTIVE sequencing of a lifecycle stream.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The presenter was requested before one was set or injected.
    #[error("presenter requested before being set")]
    PresenterNotSet,

    /// A router was already bound to this interactor; the first one is kept.
    #[error("router already set for interactor {interactor:?}")]
    RouterAlreadySet {
        /// Name of the interactor.
        interactor: String,
    },

    /// A scope was requested before the lifecycle published any event.
    #[error("lifecycle not started")]
    NotStarted,

    /// A scope was requested while the lifecycle sits on a terminal event.
    #[error("lifecycle ended ({event})")]
    Ended {
        /// Label of the terminal event currently published.
        event: &'static str,
    },

    /// An event was observed out of its legal order.
    #[error("lifecycle event out of sequence: expected {expected}, got {got}")]
    OutOfSequence {
        /// What the sequence allowed next.
        expected: &'static str,
        /// What was actually observed.
        got: &'static str,
    },

    /// `dispatch_attach` on a node that is already attached.
    #[error("{node:?} is already attached")]
    AlreadyAttached {
        /// Name of the interactor or router.
        node: String,
    },

    /// `dispatch_detach` on a node that is not attached.
    #[error("{node:?} is not attached")]
    NotAttached {
        /// Name of the interactor or router.
        node: String,
    },

    /// The child router is already in the children list.
    #[error("router {child:?} is already a child of {parent:?}")]
    DuplicateChild {
        /// Parent router name.
        parent: String,
        /// Child router name.
        child: String,
    },

    /// The child router is not in the children list.
    #[error("router {child:?} is not a child of {parent:?}")]
    UnknownChild {
        /// Parent router name.
        parent: String,
        /// Child router name.
        child: String,
    },

    /// The child is the parent itself or one of its ancestors.
    #[error("router {child:?} is {parent:?} or one of its ancestors")]
    CycleDetected {
        /// Parent router name.
        parent: String,
        /// Child router name.
        child: String,
    },

    /// The child router already belongs to another parent.
    #[error("router {child:?} already has parent {current:?}")]
    ChildHasParent {
        /// Child router name.
        child: String,
        /// Name of the parent it belongs to.
        current: String,
    },

    /// `dispatch_attach` on a router whose parent is detached.
    #[error("{node:?} cannot attach while its parent {parent:?} is detached")]
    ParentNotAttached {
        /// Router name.
        node: String,
        /// Parent router name.
        parent: String,
    },
}

impl LifecycleError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use ribvisor::LifecycleError;
    ///
    /// assert_eq!(LifecycleError::PresenterNotSet.as_label(), "presenter_not_set");
    /// assert_eq!(LifecycleError::NotStarted.as_label(), "lifecycle_not_started");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LifecycleError::PresenterNotSet => "presenter_not_set",
            LifecycleError::RouterAlreadySet { .. } => "router_already_set",
            LifecycleError::NotStarted => "lifecycle_not_started",
            LifecycleError::Ended { .. } => "lifecycle_ended",
            LifecycleError::OutOfSequence { .. } => "lifecycle_out_of_sequence",
            LifecycleError::AlreadyAttached { .. } => "already_attached",
            LifecycleError::NotAttached { .. } => "not_attached",
            LifecycleError::DuplicateChild { .. } => "duplicate_child",
            LifecycleError::UnknownChild { .. } => "unknown_child",
            LifecycleError::CycleDetected { .. } => "tree_cycle",
            LifecycleError::ChildHasParent { .. } => "child_has_parent",
            LifecycleError::ParentNotAttached { .. } => "parent_not_attached",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LifecycleError::PresenterNotSet => "presenter not set".to_string(),
            LifecycleError::RouterAlreadySet { interactor } => {
                format!("router rebind rejected: interactor={interactor}")
            }
            LifecycleError::NotStarted => "no lifecycle event published yet".to_string(),
            LifecycleError::Ended { event } => format!("lifecycle ended at {event}"),
            LifecycleError::OutOfSequence { expected, got } => {
                format!("out of sequence: expected={expected} got={got}")
            }
            LifecycleError::AlreadyAttached { node } => format!("already attached: {node}"),
            LifecycleError::NotAttached { node } => format!("not attached: {node}"),
            LifecycleError::DuplicateChild { parent, child } => {
                format!("duplicate child: parent={parent} child={child}")
            }
            LifecycleError::UnknownChild { parent, child } => {
                format!("unknown child: parent={parent} child={child}")
            }
            LifecycleError::CycleDetected { parent, child } => {
                format!("cycle rejected: parent={parent} child={child}")
            }
            LifecycleError::ChildHasParent { child, current } => {
                format!("child already parented: child={child} parent={current}")
            }
            LifecycleError::ParentNotAttached { node, parent } => {
                format!("parent detached: node={node} parent={parent}")
            }
        }
    }

    /// Indicates whether the error is a lifecycle sequencing violation
    /// (as opposed to a plain precondition failure).
    ///
    /// # Example
    /// ```
    /// use ribvisor::LifecycleError;
    ///
    /// assert!(LifecycleError::Ended { event: "inactive" }.is_sequencing());
    /// assert!(!LifecycleError::PresenterNotSet.is_sequencing());
    /// ```
    pub fn is_sequencing(&self) -> bool {
        matches!(
            self,
            LifecycleError::NotStarted
                | LifecycleError::Ended { .. }
                | LifecycleError::OutOfSequence { .. }
        )
    }
}

/// # Errors produced by worker runs.
///
/// A worker bound to a lifecycle returns one of these from a run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Worker run failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Worker observed its scope ending and stopped.
    #[error("scope ended")]
    Canceled,
}

impl WorkerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use ribvisor::WorkerError;
    ///
    /// let err = WorkerError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "worker_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Fail { .. } => "worker_failed",
            WorkerError::Canceled => "worker_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkerError::Fail { error } => format!("error: {error}"),
            WorkerError::Canceled => "scope ended".to_string(),
        }
    }
}
