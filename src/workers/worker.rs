//! # Worker abstraction and function-backed worker implementation.
//!
//! A [`Worker`] is async work that only makes sense while a lifecycle cycle is
//! open: polling a feed while a screen is active, keeping a socket open while
//! a presenter is loaded. It receives a [`CancellationToken`] that is
//! cancelled when the cycle ends.
//!
//! [`WorkerRef`] (`Arc<dyn Worker>`) is the handle the binder shares across
//! cycles.

use std::{borrow::Cow, future::Future, sync::Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;

/// Shared handle to a worker object.
pub type WorkerRef = std::sync::Arc<dyn Worker>;

/// Asynchronous unit of work bound to one lifecycle cycle.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use ribvisor::{Worker, WorkerError};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Worker for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<(), WorkerError> {
///         ctx.cancelled().await;
///         Err(WorkerError::Canceled)
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Runs until done or until `ctx` is cancelled.
    ///
    /// Return `Err(WorkerError::Canceled)` (or `Ok`) after observing
    /// cancellation.
    async fn run(&self, ctx: CancellationToken) -> Result<(), WorkerError>;
}

/// Function-backed worker.
///
/// Wraps a closure `Fnc: FnMut(CancellationToken) -> Fut`. The mutex is held
/// only while the closure builds the future, so runs from different cycles
/// never wait on each other.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use ribvisor::{WorkerFn, WorkerRef, WorkerError};
///
/// let w: WorkerRef = WorkerFn::arc("poller", |ctx: CancellationToken| async move {
///     ctx.cancelled().await;
///     Ok::<_, WorkerError>(())
/// });
/// assert_eq!(w.name(), "poller");
/// ```
#[derive(Debug)]
pub struct WorkerFn<Fnc, Fut>
where
    Fnc: FnMut(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    name: Cow<'static, str>,
    func: Mutex<Fnc>,
}

impl<Fnc, Fut> WorkerFn<Fnc, Fut>
where
    Fnc: FnMut(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    /// Creates a new function-backed worker.
    pub fn new(name: impl Into<Cow<'static, str>>, func: Fnc) -> Self {
        Self {
            name: name.into(),
            func: Mutex::new(func),
        }
    }

    /// Creates the worker and returns it as a [`WorkerRef`].
    pub fn arc(name: impl Into<Cow<'static, str>>, func: Fnc) -> WorkerRef {
        std::sync::Arc::new(Self::new(name, func))
    }
}

#[async_trait]
impl<Fnc, Fut> Worker for WorkerFn<Fnc, Fut>
where
    Fnc: FnMut(CancellationToken) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken) -> Result<(), WorkerError> {
        let fut = {
            let mut f = self.func.lock().map_err(|_| WorkerError::Fail {
                error: "mutex poisoned".into(),
            })?;
            (f)(ctx)
        };
        fut.await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_closure_state_kept_between_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let seen = runs.clone();
        let mut calls = 0;
        let worker = WorkerFn::arc("count", move |_ctx| {
            calls += 1;
            let seen = seen.clone();
            let call = calls;
            async move {
                seen.store(call, Ordering::SeqCst);
                Ok(())
            }
        });

        worker.run(CancellationToken::new()).await.unwrap();
        worker.run(CancellationToken::new()).await.unwrap();
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_worker_observes_cancel() {
        let worker = WorkerFn::arc("wait", |ctx: CancellationToken| async move {
            ctx.cancelled().await;
            Err(WorkerError::Canceled)
        });
        let ctx = CancellationToken::new();
        ctx.cancel();
        assert!(matches!(worker.run(ctx).await, Err(WorkerError::Canceled)));
    }
}
