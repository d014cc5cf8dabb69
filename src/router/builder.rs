//! # Router builder.
//!
//! Collects the optional parts of a [`Router`] and binds the finished router
//! to its interactor in one step. Binding fails if the interactor already has
//! a router: an interactor belongs to exactly one router.

use std::borrow::Cow;
use std::sync::Arc;

use crate::error::LifecycleError;
use crate::events::Bus;
use crate::interactor::InteractorType;

use super::node::Router;

/// Builder for constructing a [`Router`] with optional features.
pub struct RouterBuilder {
    interactor: Arc<dyn InteractorType>,
    name: Option<Cow<'static, str>>,
    bus: Option<Bus>,
    did_load: Option<super::node::DidLoad>,
}

impl RouterBuilder {
    /// Creates a new builder around `interactor`.
    pub fn new(interactor: Arc<dyn InteractorType>) -> Self {
        Self {
            interactor,
            name: None,
            bus: None,
            did_load: None,
        }
    }

    /// Names the router. Defaults to the interactor's name.
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Publishes tree events of this router (and of children that have no
    /// bus of their own) to `bus`.
    pub fn with_bus(mut self, bus: Bus) -> Self {
        self.bus = Some(bus);
        self
    }

    /// Runs `f` once, right after the router's first attach. Typical use:
    /// attaching the initial children.
    pub fn with_did_load<F>(mut self, f: F) -> Self
    where
        F: Fn(&Arc<Router>) + Send + Sync + 'static,
    {
        self.did_load = Some(Box::new(f));
        self
    }

    /// Builds the router and binds it to its interactor.
    pub fn build(self) -> Result<Arc<Router>, LifecycleError> {
        let name = self
            .name
            .unwrap_or_else(|| Cow::Owned(self.interactor.name().to_string()));
        let interactor = Arc::clone(&self.interactor);

        let mut bound = Ok(());
        let router = Arc::new_cyclic(|weak| {
            bound = interactor.bind_router(weak.clone());
            Router::from_parts(name, self.interactor, self.bus, self.did_load)
        });
        bound.map(|()| router)
    }
}
