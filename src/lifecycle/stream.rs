//! # Replay-latest lifecycle stream.
//!
//! [`LifecycleStream`] is a single-slot state container composed with a
//! [`tokio::sync::broadcast`] fan-out. It answers two questions without
//! racing each other:
//!
//! - "what is the current event?" → [`LifecycleStream::peek`]
//! - "tell me the current event, then everything after it" → [`LifecycleStream::subscribe`]
//!
//! ## Architecture
//! ```text
//!                 ┌──────────── Mutex<State> ────────────┐
//! publish(e) ───► │ window.observe(e)  (validate, cancel) │
//!                 │ current = Some(e)                     │
//!                 │ tx.send(e) ───────────────────────────┼──► receivers
//!                 └───────────────────────────────────────┘
//! subscribe() ──► (under the same lock) replay = current, rx = tx.subscribe()
//! ```
//!
//! ## Rules
//! - **Single writer**: the owning interactor/presenter publishes; any number of readers.
//! - **Replay-latest-one**: a new receiver first yields the current event (if any).
//! - **Ordered**: receivers observe events in publish order.
//! - **Validated**: `publish` rejects events out of cycle order and leaves the
//!   stream unchanged.
//! - **Lag**: a receiver more than `capacity` events behind skips the oldest
//!   ones (logged at `warn`).
//! - **End of stream**: receivers return `None` once every clone of the stream
//!   is dropped.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use futures::Stream;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::config::Config;
use crate::error::LifecycleError;

use super::event::LifecycleEvent;
use super::scope::{LifecycleScope, ScopeProvider, ScopeWindow};

struct State<E> {
    current: Option<E>,
    window: ScopeWindow<E>,
    tx: broadcast::Sender<E>,
}

/// Ordered, replay-latest event stream of one lifecycle.
///
/// ### Properties
/// - **Cloneable**: clones share the same state (internally `Arc`-backed).
/// - **Synchronous publish**: never awaits; scopes end inside `publish`.
pub struct LifecycleStream<E> {
    state: Arc<Mutex<State<E>>>,
}

impl<E> Clone for LifecycleStream<E> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<E: LifecycleEvent> LifecycleStream<E> {
    /// Creates a stream with the given broadcast capacity (min 1).
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel::<E>(capacity.max(1));
        Self {
            state: Arc::new(Mutex::new(State {
                current: None,
                window: ScopeWindow::new(),
                tx,
            })),
        }
    }

    /// Creates a stream sized by [`Config::lifecycle_capacity`].
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.lifecycle_capacity_clamped())
    }

    fn lock(&self) -> MutexGuard<'_, State<E>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the most recently published event, if any.
    pub fn peek(&self) -> Option<E> {
        self.lock().current
    }

    /// Publishes `event` to every receiver.
    ///
    /// ### Ordering
    /// Within one call: validate → end/open scope window → update current →
    /// broadcast. On error nothing changes and nothing is broadcast.
    pub fn publish(&self, event: E) -> Result<(), LifecycleError> {
        let mut state = self.lock();
        state.window.observe(event)?;
        state.current = Some(event);
        let _ = state.tx.send(event);
        Ok(())
    }

    /// Returns a handle that does not keep the stream alive.
    pub(crate) fn downgrade(&self) -> WeakLifecycleStream<E> {
        WeakLifecycleStream {
            state: Arc::downgrade(&self.state),
        }
    }

    /// Creates a receiver that yields the current event first, then every
    /// later event in publish order.
    pub fn subscribe(&self) -> LifecycleReceiver<E> {
        let state = self.lock();
        LifecycleReceiver {
            replay: state.current,
            rx: state.tx.subscribe(),
        }
    }
}

impl<E: LifecycleEvent> ScopeProvider for LifecycleStream<E> {
    fn request_scope(&self) -> Result<LifecycleScope, LifecycleError> {
        let state = self.lock();
        state.window.scope(state.current)
    }
}

/// Non-owning handle to a [`LifecycleStream`].
pub(crate) struct WeakLifecycleStream<E> {
    state: Weak<Mutex<State<E>>>,
}

impl<E> WeakLifecycleStream<E> {
    pub(crate) fn upgrade(&self) -> Option<LifecycleStream<E>> {
        self.state.upgrade().map(|state| LifecycleStream { state })
    }
}

/// Receiving half of a [`LifecycleStream`] subscription.
pub struct LifecycleReceiver<E> {
    replay: Option<E>,
    rx: broadcast::Receiver<E>,
}

impl<E: LifecycleEvent> LifecycleReceiver<E> {
    /// Waits for the next event.
    ///
    /// Returns `None` once the stream is gone and every buffered event was
    /// delivered.
    pub async fn recv(&mut self) -> Option<E> {
        if let Some(ev) = self.replay.take() {
            return Some(ev);
        }
        loop {
            match self.rx.recv().await {
                Ok(ev) => return Some(ev),
                Err(RecvError::Closed) => return None,
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "lifecycle receiver lagged");
                }
            }
        }
    }

    /// Returns the next event if one is already available.
    pub fn try_recv(&mut self) -> Option<E> {
        if let Some(ev) = self.replay.take() {
            return Some(ev);
        }
        loop {
            match self.rx.try_recv() {
                Ok(ev) => return Some(ev),
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "lifecycle receiver lagged");
                }
            }
        }
    }

    /// Converts the receiver into a [`Stream`] of events.
    pub fn into_stream(self) -> impl Stream<Item = E> + Send + 'static {
        futures::stream::unfold(self, |mut rx| async move {
            let ev = rx.recv().await?;
            Some((ev, rx))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::event::InteractorEvent;
    use futures::StreamExt;

    #[test]
    fn test_peek_before_publish_is_none() {
        let stream = LifecycleStream::<InteractorEvent>::new(4);
        assert_eq!(stream.peek(), None);
    }

    #[test]
    fn test_late_subscriber_gets_latest_first() {
        let stream = LifecycleStream::new(4);
        stream.publish(InteractorEvent::Active).unwrap();

        let mut rx = stream.subscribe();
        assert_eq!(rx.try_recv(), Some(InteractorEvent::Active));
        assert_eq!(rx.try_recv(), None);

        stream.publish(InteractorEvent::Inactive).unwrap();
        assert_eq!(rx.try_recv(), Some(InteractorEvent::Inactive));
    }

    #[test]
    fn test_replay_only_latest_one() {
        let stream = LifecycleStream::new(4);
        stream.publish(InteractorEvent::Active).unwrap();
        stream.publish(InteractorEvent::Inactive).unwrap();

        let mut rx = stream.subscribe();
        assert_eq!(rx.try_recv(), Some(InteractorEvent::Inactive));
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_rejected_publish_is_not_broadcast() {
        let stream = LifecycleStream::new(4);
        let mut rx = stream.subscribe();

        assert!(stream.publish(InteractorEvent::Inactive).is_err());
        assert_eq!(stream.peek(), None);
        assert_eq!(rx.try_recv(), None);
    }

    #[test]
    fn test_scope_follows_stream() {
        let stream = LifecycleStream::new(4);
        assert_eq!(
            stream.request_scope().unwrap_err(),
            LifecycleError::NotStarted
        );

        stream.publish(InteractorEvent::Active).unwrap();
        let scope = stream.request_scope().unwrap();
        stream.publish(InteractorEvent::Inactive).unwrap();

        assert!(scope.is_ended());
        assert!(matches!(
            stream.request_scope(),
            Err(LifecycleError::Ended { .. })
        ));
    }

    #[tokio::test]
    async fn test_stream_ends_when_dropped() {
        let stream = LifecycleStream::new(4);
        stream.publish(InteractorEvent::Active).unwrap();
        let rx = stream.subscribe();
        stream.publish(InteractorEvent::Inactive).unwrap();
        drop(stream);

        let seen: Vec<_> = rx.into_stream().collect().await;
        assert_eq!(
            seen,
            vec![InteractorEvent::Active, InteractorEvent::Inactive]
        );
    }

    #[test]
    fn test_weak_handle_does_not_keep_stream_alive() {
        let stream = LifecycleStream::<InteractorEvent>::new(4);
        let weak = stream.downgrade();
        assert!(weak.upgrade().is_some());
        drop(stream);
        assert!(weak.upgrade().is_none());
    }

    #[tokio::test]
    async fn test_lagged_receiver_skips_oldest() {
        let stream = LifecycleStream::new(1);
        let mut rx = stream.subscribe();
        stream.publish(InteractorEvent::Active).unwrap();
        stream.publish(InteractorEvent::Inactive).unwrap();

        assert_eq!(rx.recv().await, Some(InteractorEvent::Inactive));
    }
}
