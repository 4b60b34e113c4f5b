//! Periodic dashboard refresh.

use crate::client::DispatchClient;
use crate::stats::{DashboardStats, StatsWindow};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tokio_stream::Stream;
use tracing::{debug, warn};

/// Default refresh period for dashboard statistics.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Period used in place of a zero interval.
pub const MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(1);

/// Polls gateway statistics on a fixed interval.
///
/// The stream owns the timer; dropping it stops polling.
pub struct StatsRefresher {
    client: DispatchClient,
    interval: Duration,
    window: Option<StatsWindow>,
}

impl StatsRefresher {
    /// Create a new refresher. A zero `interval` is raised to
    /// [`MIN_REFRESH_INTERVAL`].
    pub fn new(client: DispatchClient, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            warn!(
                "Refresh interval must be non-zero, using {:?}",
                MIN_REFRESH_INTERVAL
            );
            MIN_REFRESH_INTERVAL
        } else {
            interval
        };

        Self {
            client,
            interval,
            window: None,
        }
    }

    /// Restrict every fetch to `window`.
    pub fn with_window(mut self, window: StatsWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Yield statistics now and then once per interval.
    ///
    /// Failed fetches are logged and skipped.
    pub fn stream(self) -> impl Stream<Item = DashboardStats> {
        async_stream::stream! {
            let mut ticker = interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let result = self.client.get_stats(self.window.as_ref()).await;
                match DashboardStats::from_result(&result) {
                    Some(stats) => {
                        debug!("Refreshed stats: {} sent this week", stats.this_week.total_sent);
                        yield stats;
                    }
                    None if result.success => warn!("Stats payload could not be decoded"),
                    None => warn!("Stats refresh failed: {}", result.error()),
                }
            }
        }
    }
}
