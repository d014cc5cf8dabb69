//! # Router: one interactor plus a list of child routers.
//!
//! A router forwards attach/detach through the tree so that a parent is
//! always active while any of its children is active.
//!
//! ## Ordering
//! ```text
//! dispatch_attach(saved)                 dispatch_detach()
//!   ├─► interactor.attach(saved/interactor)   ├─► children.rev(): child.dispatch_detach()
//!   ├─► publish Attached                      ├─► interactor.detach()
//!   ├─► did_load() (first attach only)        └─► publish Detached
//!   └─► children: child.dispatch_attach(saved/children/<tag>)
//! ```
//!
//! ## Rules
//! - **Top-down attach / bottom-up detach** across the whole subtree.
//! - Children survive a detach: a re-attached router re-attaches them.
//! - The tree has no cycles: a router cannot be its own child or the child of
//!   one of its descendants, and a child has exactly one parent.
//! - A child attaches only while its parent is attached.
//! - Once the interactor changed state, the router finishes every step
//!   (tree event, `did_load`, children) and returns the first error at the end.
//! - The children list is never locked while a child or hook runs.
//!
//! ## Saved state layout
//! ```text
//! out
//!  ├─ "router.interactor" → interactor state
//!  └─ "router.children"   → { <tag> → child router state, ... }
//! ```

use std::borrow::Cow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use crate::error::LifecycleError;
use crate::events::{Bus, RibEvent, RibEventKind};
use crate::interactor::InteractorType;
use crate::state::SavedState;

use super::builder::RouterBuilder;

/// Saved-state key of the interactor's own state.
pub const INTERACTOR_STATE_KEY: &str = "router.interactor";
/// Saved-state key of the children's states (nested by tag).
pub const CHILDREN_STATE_KEY: &str = "router.children";

pub(crate) type DidLoad = Box<dyn Fn(&Arc<Router>) + Send + Sync>;

struct Child {
    tag: String,
    router: Arc<Router>,
}

/// Tree node owning one interactor and zero or more child routers.
pub struct Router {
    pub(super) name: Cow<'static, str>,
    pub(super) interactor: Arc<dyn InteractorType>,
    pub(super) bus: OnceLock<Bus>,
    pub(super) did_load: Option<DidLoad>,
    pub(super) loaded: AtomicBool,
    parent: Mutex<Weak<Router>>,
    children: Mutex<Vec<Child>>,
    restored_children: Mutex<Option<SavedState>>,
}

impl Router {
    /// Starts building a router around `interactor`.
    pub fn builder(interactor: Arc<dyn InteractorType>) -> RouterBuilder {
        RouterBuilder::new(interactor)
    }

    /// Builds a router with default settings and binds it to `interactor`.
    pub fn new(interactor: Arc<dyn InteractorType>) -> Result<Arc<Router>, LifecycleError> {
        RouterBuilder::new(interactor).build()
    }

    pub(super) fn from_parts(
        name: Cow<'static, str>,
        interactor: Arc<dyn InteractorType>,
        bus: Option<Bus>,
        did_load: Option<DidLoad>,
    ) -> Self {
        let cell = OnceLock::new();
        if let Some(bus) = bus {
            let _ = cell.set(bus);
        }
        Self {
            name,
            interactor,
            bus: cell,
            did_load,
            loaded: AtomicBool::new(false),
            parent: Mutex::new(Weak::new()),
            children: Mutex::new(Vec::new()),
            restored_children: Mutex::new(None),
        }
    }

    fn children_lock(&self) -> MutexGuard<'_, Vec<Child>> {
        self.children.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn parent_lock(&self) -> MutexGuard<'_, Weak<Router>> {
        self.parent.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The router this one is a child of, if any.
    pub fn parent(&self) -> Option<Arc<Router>> {
        self.parent_lock().upgrade()
    }

    fn parent_name(&self) -> Option<Arc<str>> {
        self.parent().map(|p| Arc::from(p.name()))
    }

    /// True if `other` is this router or one of its ancestors.
    fn is_self_or_ancestor(self: &Arc<Self>, other: &Arc<Router>) -> bool {
        let mut cursor = Some(Arc::clone(self));
        while let Some(node) = cursor {
            if Arc::ptr_eq(&node, other) {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    fn publish(&self, kind: RibEventKind) {
        if let Some(bus) = self.bus.get() {
            bus.publish(
                RibEvent::new(kind)
                    .with_node(self.name.as_ref())
                    .with_parent_opt(self.parent_name()),
            );
        }
    }

    /// Router name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The owned interactor.
    pub fn interactor(&self) -> &Arc<dyn InteractorType> {
        &self.interactor
    }

    /// A router is attached exactly when its interactor is.
    pub fn is_attached(&self) -> bool {
        self.interactor.is_attached()
    }

    /// Child routers in attach order.
    pub fn children(&self) -> Vec<Arc<Router>> {
        self.children_lock()
            .iter()
            .map(|c| Arc::clone(&c.router))
            .collect()
    }

    /// Finds a child by tag.
    pub fn find_child(&self, tag: &str) -> Option<Arc<Router>> {
        self.children_lock()
            .iter()
            .find(|c| c.tag == tag)
            .map(|c| Arc::clone(&c.router))
    }

    /// Attaches the interactor, then the subtree below it.
    ///
    /// Rejected without changes if this router is attached, or if it has a
    /// parent that is not attached. Otherwise every step runs; a failing
    /// presenter load or child attach is returned at the end.
    pub fn dispatch_attach(
        self: &Arc<Self>,
        saved: Option<&SavedState>,
    ) -> Result<(), LifecycleError> {
        if self.is_attached() {
            return Err(LifecycleError::AlreadyAttached {
                node: self.name.to_string(),
            });
        }
        if let Some(parent) = self.parent()
            && !parent.is_attached()
        {
            return Err(LifecycleError::ParentNotAttached {
                node: self.name.to_string(),
                parent: parent.name.to_string(),
            });
        }
        *self
            .restored_children
            .lock()
            .unwrap_or_else(PoisonError::into_inner) =
            saved.and_then(|s| s.nested(CHILDREN_STATE_KEY)).cloned();

        let mut first_err = None;
        if let Err(e) = self
            .interactor
            .attach(saved.and_then(|s| s.nested(INTERACTOR_STATE_KEY)))
        {
            if !self.is_attached() {
                return Err(e);
            }
            tracing::warn!(router = %self.name, error = %e, "attached with errors");
            first_err = Some(e);
        }
        tracing::debug!(router = %self.name, "router attached");
        self.publish(RibEventKind::Attached);

        if !self.loaded.swap(true, Ordering::AcqRel)
            && let Some(did_load) = &self.did_load
        {
            did_load(self);
        }

        let pending: Vec<(String, Arc<Router>)> = self
            .children_lock()
            .iter()
            .filter(|c| !c.router.is_attached())
            .map(|c| (c.tag.clone(), Arc::clone(&c.router)))
            .collect();
        for (tag, child) in pending {
            let child_saved = self.restored_child_state(&tag);
            if let Err(e) = child.dispatch_attach(child_saved.as_ref()) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }

    /// Detaches the subtree below the interactor, then the interactor.
    ///
    /// Every attached child is detached even if one of them fails, and the
    /// interactor is detached even if its presenter fails to unload. The
    /// first failure is returned at the end.
    pub fn dispatch_detach(&self) -> Result<(), LifecycleError> {
        if !self.is_attached() {
            return Err(LifecycleError::NotAttached {
                node: self.name.to_string(),
            });
        }

        let mut first_err = None;
        for child in self.children().iter().rev() {
            if child.is_attached()
                && let Err(e) = child.dispatch_detach()
            {
                first_err.get_or_insert(e);
            }
        }

        if let Err(e) = self.interactor.detach() {
            if self.is_attached() {
                return Err(first_err.unwrap_or(e));
            }
            tracing::warn!(router = %self.name, error = %e, "detached with errors");
            first_err.get_or_insert(e);
        }
        tracing::debug!(router = %self.name, "router detached");
        self.publish(RibEventKind::Detached);

        first_err.map_or(Ok(()), Err)
    }

    /// Adds `child` under `tag` and attaches it if this router is attached.
    ///
    /// Rejects this router itself, any of its ancestors, a child already in
    /// the list and a child that belongs to another parent. The child
    /// inherits this router's bus when it has none. If the child's attach is
    /// rejected it is removed again; if it attached with errors it stays.
    pub fn attach_child(
        self: &Arc<Self>,
        child: Arc<Router>,
        tag: impl Into<String>,
    ) -> Result<(), LifecycleError> {
        if self.is_self_or_ancestor(&child) {
            return Err(LifecycleError::CycleDetected {
                parent: self.name.to_string(),
                child: child.name.to_string(),
            });
        }
        let tag = tag.into();
        {
            let mut children = self.children_lock();
            if children.iter().any(|c| Arc::ptr_eq(&c.router, &child)) {
                return Err(LifecycleError::DuplicateChild {
                    parent: self.name.to_string(),
                    child: child.name.to_string(),
                });
            }
            let mut parent = child.parent_lock();
            if let Some(current) = parent.upgrade() {
                return Err(LifecycleError::ChildHasParent {
                    child: child.name.to_string(),
                    current: current.name.to_string(),
                });
            }
            *parent = Arc::downgrade(self);
            children.push(Child {
                tag: tag.clone(),
                router: Arc::clone(&child),
            });
        }

        if let Some(bus) = self.bus.get() {
            let _ = child.bus.set(bus.clone());
        }

        if self.is_attached() && !child.is_attached() {
            let child_saved = self.restored_child_state(&tag);
            if let Err(e) = child.dispatch_attach(child_saved.as_ref()) {
                if child.is_attached() {
                    return Err(e);
                }
                self.children_lock()
                    .retain(|c| !Arc::ptr_eq(&c.router, &child));
                *child.parent_lock() = Weak::new();
                return Err(e);
            }
        }
        Ok(())
    }

    /// Removes `child` and detaches its subtree if it is attached.
    pub fn detach_child(&self, child: &Arc<Router>) -> Result<(), LifecycleError> {
        let removed = {
            let mut children = self.children_lock();
            let idx = children
                .iter()
                .position(|c| Arc::ptr_eq(&c.router, child))
                .ok_or_else(|| LifecycleError::UnknownChild {
                    parent: self.name.to_string(),
                    child: child.name.to_string(),
                })?;
            children.remove(idx)
        };

        let detached = if removed.router.is_attached() {
            removed.router.dispatch_detach()
        } else {
            Ok(())
        };
        *removed.router.parent_lock() = Weak::new();
        detached
    }

    /// Delegates a back press to the interactor.
    pub fn handle_back_press(&self) -> bool {
        let handled = self.interactor.handle_back_press();
        if handled {
            self.publish(RibEventKind::BackPressHandled);
        }
        handled
    }

    /// Writes the interactor's state and every child's state into `out`.
    pub fn save_instance_state(&self, out: &mut SavedState) {
        let mut own = SavedState::new();
        self.interactor.save_instance_state(&mut own);
        out.put_nested(INTERACTOR_STATE_KEY, own);

        let mut children_state = SavedState::new();
        let children: Vec<(String, Arc<Router>)> = self
            .children_lock()
            .iter()
            .map(|c| (c.tag.clone(), Arc::clone(&c.router)))
            .collect();
        for (tag, child) in children {
            let mut state = SavedState::new();
            child.save_instance_state(&mut state);
            children_state.put_nested(tag, state);
        }
        out.put_nested(CHILDREN_STATE_KEY, children_state);
    }

    fn restored_child_state(&self, tag: &str) -> Option<SavedState> {
        self.restored_children
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|s| s.nested(tag))
            .cloned()
    }
}
