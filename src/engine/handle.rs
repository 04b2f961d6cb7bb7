use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use super::visibility::VisibilityGate;

/// A running recurring fetch.
///
/// The first tick fires immediately. Ticks that land while the page is hidden
/// are dropped. `on_tick` must not block: it spawns its own fetch so a slow
/// response never delays the next tick.
pub struct PollHandle {
    name: &'static str,
    token: CancellationToken,
    ticker: JoinHandle<()>,
}

impl PollHandle {
    pub(crate) fn spawn<F>(
        name: &'static str,
        period: Duration,
        visibility: VisibilityGate,
        mut on_tick: F,
    ) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let ticker = tokio::spawn(async move {
            let mut interval = time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = interval.tick() => {}
                }

                if !visibility.is_visible() {
                    trace!(poller = name, "Skipping tick while hidden");
                    continue;
                }
                on_tick();
            }

            debug!(poller = name, "Poller stopped");
        });

        debug!(poller = name, period_ms = period.as_millis() as u64, "Poller started");
        Self {
            name,
            token,
            ticker,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Stops future ticks. Fetches already in flight are left to finish.
    pub fn cancel(&self) {
        self.token.cancel();
        self.ticker.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
