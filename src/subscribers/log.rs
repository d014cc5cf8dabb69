//! # LogWriter: tree event logger
//!
//! A minimal subscriber that turns incoming [`RibEvent`]s into `tracing`
//! records at `info` level. Use it for tests or demos; install a `tracing`
//! subscriber to see the output.
//!
//! ## Example output (with `tracing_subscriber::fmt`)
//! ```text
//! INFO ribvisor::subscribers::log: [attached] seq=0 node="root" parent=None
//! INFO ribvisor::subscribers::log: [attached] seq=1 node="game" parent=Some("root")
//! INFO ribvisor::subscribers::log: [back-press] seq=2 node="game"
//! INFO ribvisor::subscribers::log: [detached] seq=3 node="game" parent=Some("root")
//! ```

use async_trait::async_trait;

use crate::events::{RibEvent, RibEventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &RibEvent) {
        match e.kind {
            RibEventKind::Attached => {
                tracing::info!("[attached] seq={} node={:?} parent={:?}", e.seq, e.node, e.parent);
            }
            RibEventKind::Detached => {
                tracing::info!("[detached] seq={} node={:?} parent={:?}", e.seq, e.node, e.parent);
            }
            RibEventKind::BackPressHandled => {
                tracing::info!("[back-press] seq={} node={:?}", e.seq, e.node);
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
