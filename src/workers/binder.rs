//! # Binding workers to a lifecycle.
//!
//! [`WorkerBinder::bind`] subscribes to a [`LifecycleStream`] and runs a
//! [`Worker`] once per open cycle, under a scope that ends with the cycle.
//!
//! ## Flow
//! ```text
//! rx.recv() ──► opening event ──► stream.request_scope()
//!                                   ├─ Ok(scope) ──► spawn run_in_scope(worker, scope)
//!                                   └─ Err(_)    ──► stale event, skip
//!           ──► terminal event ──► nothing (the scope already ended in publish)
//!           ──► None           ──► stream dropped: stop binding
//!
//! run_in_scope:
//!   select (biased) { worker.run(ctx) | scope.ended() | binding.cancelled() }
//! ```
//!
//! ## Rules
//! - At most one run per cycle: a replayed or repeated opening event while a
//!   run's scope is still open is ignored.
//! - `ctx` passed to the worker is derived from the scope: it is cancelled
//!   inside the `publish` call that ends the cycle.
//! - A worker that ignores `ctx` is dropped when the scope ends.
//! - [`WorkerUnbinder::unbind`] stops the binding and drops any in-flight run.
//! - The binding does not keep the stream alive.
//!
//! Requires a running tokio runtime.

use std::sync::Arc;

use tokio::task::{JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::interactor::Interactor;
use crate::lifecycle::{
    LifecycleEvent, LifecycleReceiver, LifecycleScope, LifecycleStream, ScopeProvider,
    WeakLifecycleStream,
};
use crate::presenter::Presenter;

use super::worker::WorkerRef;

/// Entry point for lifecycle-bound workers.
pub struct WorkerBinder;

impl WorkerBinder {
    /// Runs `worker` in every cycle of `lifecycle`, starting with the current
    /// one if it is open.
    pub fn bind<E: LifecycleEvent>(
        lifecycle: &LifecycleStream<E>,
        worker: WorkerRef,
    ) -> WorkerUnbinder {
        let binding = CancellationToken::new();
        let handle = tokio::spawn(drive(
            lifecycle.subscribe(),
            lifecycle.downgrade(),
            worker,
            binding.clone(),
        ));
        WorkerUnbinder { binding, handle }
    }

    /// Runs `worker` while `interactor` is attached.
    pub fn bind_interactor<P: Presenter + Clone>(
        interactor: &Interactor<P>,
        worker: WorkerRef,
    ) -> WorkerUnbinder {
        Self::bind(&interactor.lifecycle_stream(), worker)
    }
}

/// Handle returned by [`WorkerBinder::bind`].
///
/// Dropping it leaves the binding running until the stream is dropped.
pub struct WorkerUnbinder {
    binding: CancellationToken,
    handle: JoinHandle<()>,
}

impl WorkerUnbinder {
    /// Stops the binding; an in-flight run is dropped.
    pub fn unbind(&self) {
        self.binding.cancel();
    }

    /// True until unbound or until the stream was dropped.
    pub fn is_bound(&self) -> bool {
        !self.binding.is_cancelled() && !self.handle.is_finished()
    }

    /// Waits until the binding and its runs have finished.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "worker binding task failed");
        }
    }
}

async fn drive<E: LifecycleEvent>(
    mut rx: LifecycleReceiver<E>,
    source: WeakLifecycleStream<E>,
    worker: WorkerRef,
    binding: CancellationToken,
) {
    let mut runs = JoinSet::new();
    let mut current: Option<LifecycleScope> = None;

    loop {
        let event = tokio::select! {
            biased;
            _ = binding.cancelled() => break,
            Some(_) = runs.join_next(), if !runs.is_empty() => continue,
            ev = rx.recv() => match ev {
                Some(ev) => ev,
                None => break,
            },
        };
        if event.is_terminal() {
            continue;
        }
        if current.as_ref().is_some_and(|s| !s.is_ended()) {
            continue;
        }
        let Some(stream) = source.upgrade() else {
            break;
        };
        match stream.request_scope() {
            Ok(scope) => {
                tracing::debug!(
                    worker = worker.name(),
                    on = event.as_label(),
                    "worker starting"
                );
                runs.spawn(run_in_scope(
                    Arc::clone(&worker),
                    scope.clone(),
                    binding.clone(),
                ));
                current = Some(scope);
            }
            Err(e) => {
                tracing::debug!(
                    worker = worker.name(),
                    reason = e.as_label(),
                    "stale lifecycle event skipped"
                );
            }
        }
    }

    binding.cancel();
    while runs.join_next().await.is_some() {}
}

async fn run_in_scope(worker: WorkerRef, scope: LifecycleScope, binding: CancellationToken) {
    let ctx = scope.token();
    let res = tokio::select! {
        biased;
        res = worker.run(ctx.clone()) => res,
        _ = scope.ended() => Err(WorkerError::Canceled),
        _ = binding.cancelled() => Err(WorkerError::Canceled),
    };
    ctx.cancel();

    match res {
        Ok(()) => tracing::debug!(worker = worker.name(), "worker finished"),
        Err(WorkerError::Canceled) => {
            tracing::debug!(worker = worker.name(), ended_on = scope.ends_on(), "worker stopped")
        }
        Err(e) => tracing::warn!(
            worker = worker.name(),
            reason = e.as_label(),
            error = %e.as_message(),
            "worker failed"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::InteractorEvent;
    use crate::presenter::EmptyPresenter;
    use crate::workers::WorkerFn;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Finish(Arc<AtomicUsize>);

    impl Drop for Finish {
        fn drop(&mut self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Clone, Default)]
    struct Counters {
        started: Arc<AtomicUsize>,
        finished: Arc<AtomicUsize>,
    }

    impl Counters {
        fn started(&self) -> usize {
            self.started.load(Ordering::SeqCst)
        }

        fn finished(&self) -> usize {
            self.finished.load(Ordering::SeqCst)
        }
    }

    fn waiting_worker(counters: &Counters) -> WorkerRef {
        let counters = counters.clone();
        WorkerFn::arc("waiter", move |ctx: CancellationToken| {
            let counters = counters.clone();
            async move {
                counters.started.fetch_add(1, Ordering::SeqCst);
                let _finish = Finish(counters.finished.clone());
                ctx.cancelled().await;
                Err(WorkerError::Canceled)
            }
        })
    }

    async fn eventually(cond: impl Fn() -> bool) {
        for _ in 0..200 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached");
    }

    #[tokio::test]
    async fn test_worker_runs_once_per_cycle() {
        let stream = LifecycleStream::new(8);
        let counters = Counters::default();
        let unbinder = WorkerBinder::bind(&stream, waiting_worker(&counters));

        stream.publish(InteractorEvent::Active).unwrap();
        eventually(|| counters.started() == 1).await;

        stream.publish(InteractorEvent::Inactive).unwrap();
        eventually(|| counters.finished() == 1).await;

        stream.publish(InteractorEvent::Active).unwrap();
        eventually(|| counters.started() == 2).await;
        assert_eq!(counters.finished(), 1);

        unbinder.unbind();
        assert!(!unbinder.is_bound());
        unbinder.join().await;
        assert_eq!(counters.finished(), 2);
    }

    #[tokio::test]
    async fn test_bind_while_open_starts_immediately() {
        let stream = LifecycleStream::new(8);
        stream.publish(InteractorEvent::Active).unwrap();

        let counters = Counters::default();
        let _unbinder = WorkerBinder::bind(&stream, waiting_worker(&counters));
        eventually(|| counters.started() == 1).await;
    }

    #[tokio::test]
    async fn test_bind_after_cycle_ended_waits_for_next() {
        let stream = LifecycleStream::new(8);
        stream.publish(InteractorEvent::Active).unwrap();
        stream.publish(InteractorEvent::Inactive).unwrap();

        let counters = Counters::default();
        let _unbinder = WorkerBinder::bind(&stream, waiting_worker(&counters));
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(counters.started(), 0);

        stream.publish(InteractorEvent::Active).unwrap();
        eventually(|| counters.started() == 1).await;
    }

    #[tokio::test]
    async fn test_worker_ignoring_ctx_is_dropped_on_scope_end() {
        let stream = LifecycleStream::new(8);
        let finished = Arc::new(AtomicUsize::new(0));
        let seen = finished.clone();
        let worker = WorkerFn::arc("stubborn", move |_ctx| {
            let seen = seen.clone();
            async move {
                let _finish = Finish(seen);
                std::future::pending::<()>().await;
                Ok(())
            }
        });
        let _unbinder = WorkerBinder::bind(&stream, worker);

        stream.publish(InteractorEvent::Active).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        stream.publish(InteractorEvent::Inactive).unwrap();
        eventually(|| finished.load(Ordering::SeqCst) == 1).await;
    }

    #[tokio::test]
    async fn test_dropping_stream_ends_binding() {
        let stream = LifecycleStream::new(8);
        let counters = Counters::default();
        let unbinder = WorkerBinder::bind(&stream, waiting_worker(&counters));
        stream.publish(InteractorEvent::Active).unwrap();
        eventually(|| counters.started() == 1).await;

        drop(stream);
        unbinder.join().await;
        assert_eq!(counters.finished(), 1);
    }

    #[tokio::test]
    async fn test_bind_interactor_follows_attach() {
        let interactor = Interactor::new("feed", ()).with_presenter(EmptyPresenter);
        let counters = Counters::default();
        let _unbinder = WorkerBinder::bind_interactor(&interactor, waiting_worker(&counters));

        interactor.dispatch_attach(None).unwrap();
        eventually(|| counters.started() == 1).await;
        interactor.dispatch_detach().unwrap();
        eventually(|| counters.finished() == 1).await;
    }
}
