//! Dashboard statistics, once or on a refresh loop.

use crate::error::{AppError, AppResult};
use flashchat_client::{DashboardStats, DispatchClient, StatsRefresher, StatsWindow};
use std::time::Duration;
use tokio::signal;
use tokio_stream::StreamExt;
use tracing::info;

pub async fn show(client: &DispatchClient, window: Option<StatsWindow>) -> AppResult<String> {
    let result = client.get_stats(window.as_ref()).await;
    let stats = DashboardStats::from_result(&result).ok_or_else(|| AppError::RequestFailed {
        operation: "Fetching statistics",
        error: result.error_message.clone().unwrap_or_else(|| "Unreadable statistics".into()),
    })?;
    Ok(render(&stats))
}

/// Print statistics every `interval` until Ctrl-C.
pub async fn watch(client: DispatchClient, interval: Duration) -> AppResult<String> {
    info!("Refreshing statistics every {:?}", interval);
    let mut stream = Box::pin(StatsRefresher::new(client, interval).stream());

    loop {
        tokio::select! {
            Some(stats) = stream.next() => {
                println!("{}\n", render(&stats));
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok("Stopped".into())
}

pub fn render(stats: &DashboardStats) -> String {
    let week = &stats.this_week;
    format!(
        "Sent this week: {}\nDelivered: {}\nFailed: {}\nToday: {}\nWeek cost: {:.2}\nSuccess rate: {}%",
        week.total_sent,
        week.total_delivered,
        week.total_failed,
        stats.today.total_sent,
        week.total_cost,
        stats.success_rate()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashchat_client::PeriodStats;

    #[test]
    fn test_render() {
        let stats = DashboardStats {
            this_week: PeriodStats {
                total_sent: 40,
                total_delivered: 30,
                total_failed: 10,
                total_cost: 3.456,
            },
            today: PeriodStats {
                total_sent: 7,
                ..Default::default()
            },
        };

        assert_eq!(
            render(&stats),
            "Sent this week: 40\nDelivered: 30\nFailed: 10\nToday: 7\nWeek cost: 3.46\nSuccess rate: 75%"
        );
    }

    #[test]
    fn test_render_empty() {
        assert!(render(&DashboardStats::default()).ends_with("Success rate: 0%"));
    }
}
