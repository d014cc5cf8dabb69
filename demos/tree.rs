//! # Example: tree
//!
//! A two-level tree with a loadable presenter, a lifecycle-bound worker and
//! tree event subscribers.
//!
//! Demonstrates how to:
//! - Build routers around interactors and attach a child in `did_load`.
//! - Bind a [`Worker`] to an interactor with [`WorkerBinder`].
//! - Observe the tree through [`Bus`] + [`SubscriberSet`] ([`LogWriter`], [`AttachedTracker`]).
//! - Save state on detach and restore it on the next attach.
//!
//! ## Flow
//! ```text
//! root.dispatch_attach(None)
//!   ├─► root active ──► did_load ──► attach_child(game)
//!   │                                  └─► game active ──► board loaded ──► ticker starts
//! root.save_instance_state()
//! root.dispatch_detach()
//!   ├─► board unloaded ──► game inactive ──► ticker ctx cancelled
//!   └─► root inactive
//! root.dispatch_attach(saved) ──► game restores its turn
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example tree --features logging
//! ```

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use ribvisor::{
    AttachedTracker, Bus, Config, Interactor, InteractorLogic, Loadable, LogWriter, Presenter,
    PresenterLifecycle, Router, SavedState, Subscribe, SubscriberSet, WorkerBinder, WorkerError,
    WorkerFn,
};

struct Board {
    lifecycle: PresenterLifecycle,
}

impl Presenter for Board {
    fn as_loadable(&self) -> Option<&dyn Loadable> {
        Some(&self.lifecycle)
    }
}

#[derive(Default)]
struct Game {
    turn: AtomicU32,
}

impl InteractorLogic<Arc<Board>> for Game {
    fn did_become_active(&self, interactor: &Interactor<Arc<Board>>, saved: Option<&SavedState>) {
        if let Some(turn) = saved.and_then(|s| s.get("turn")).and_then(|t| t.parse().ok()) {
            self.turn.store(turn, Ordering::SeqCst);
        }
        let loaded = interactor.presenter().map(|b| b.lifecycle.is_loaded());
        tracing::info!(turn = self.turn.load(Ordering::SeqCst), ?loaded, "game active");
    }

    fn will_resign_active(&self, _interactor: &Interactor<Arc<Board>>) {
        tracing::info!("game resigning");
    }

    fn on_save_instance_state(&self, _interactor: &Interactor<Arc<Board>>, out: &mut SavedState) {
        out.put("turn", self.turn.load(Ordering::SeqCst).to_string());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::default();
    let bus = Bus::from_config(&cfg);
    let tracker = Arc::new(AttachedTracker::new());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new()), tracker.clone()];
    let set = Arc::new(SubscriberSet::new(subs, &cfg));
    let listener = set.listen(&bus);

    let board = Arc::new(Board {
        lifecycle: PresenterLifecycle::with_config(&cfg),
    });
    let game = Interactor::with_config("game", Game::default(), &cfg)
        .with_presenter(board)
        .into_arc();
    let game_router = Router::new(game.clone())?;

    let ticks = Arc::new(AtomicU32::new(0));
    let counter = ticks.clone();
    let ticker = WorkerFn::arc("ticker", move |ctx: CancellationToken| {
        let counter = counter.clone();
        async move {
            loop {
                tokio::select! {
                    _ = ctx.cancelled() => return Err(WorkerError::Canceled),
                    _ = tokio::time::sleep(Duration::from_millis(20)) => {
                        counter.fetch_add(1, Ordering::SeqCst);
                    }
                }
            }
        }
    });
    let unbinder = WorkerBinder::bind_interactor(&game, ticker);

    let root = Interactor::new("root", ()).with_presenter(ribvisor::EmptyPresenter).into_arc();
    let root_router = Router::builder(root)
        .with_bus(bus.clone())
        .with_did_load(move |router| {
            if let Err(e) = router.attach_child(Arc::clone(&game_router), "game") {
                tracing::error!(error = %e, "attaching game failed");
            }
        })
        .build()?;

    root_router.dispatch_attach(None)?;
    tokio::time::sleep(Duration::from_millis(100)).await;
    tracing::info!(
        ticks = ticks.load(Ordering::SeqCst),
        attached = ?tracker.snapshot().await,
        "first cycle"
    );

    let mut saved = SavedState::new();
    root_router.save_instance_state(&mut saved);
    root_router.dispatch_detach()?;
    let after_detach = ticks.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(60)).await;
    tracing::info!(
        ticks = ticks.load(Ordering::SeqCst),
        after_detach,
        "ticker idle while detached"
    );

    root_router.dispatch_attach(Some(&saved))?;
    tokio::time::sleep(Duration::from_millis(60)).await;
    root_router.dispatch_detach()?;

    unbinder.unbind();
    unbinder.join().await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    tracing::info!(attached = ?tracker.snapshot().await, "done");

    drop(root_router);
    drop(bus);
    let _ = listener.await;
    if let Ok(set) = Arc::try_unwrap(set) {
        set.shutdown().await;
    }
    Ok(())
}
