//! Dashboard statistics.

use crate::types::DispatchResult;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Time range for aggregate statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl StatsWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self { from, to }
    }

    /// The window ending now and spanning `span`, or `None` when `span`
    /// reaches past the representable range.
    pub fn last(span: std::time::Duration) -> Option<Self> {
        let span = Duration::from_std(span).ok()?;
        let to = Utc::now();
        Some(Self {
            from: to.checked_sub_signed(span)?,
            to,
        })
    }

    pub(crate) fn query(&self) -> Vec<(&'static str, String)> {
        vec![
            ("from", self.from.to_rfc3339()),
            ("to", self.to.to_rfc3339()),
        ]
    }
}

/// Counters for one period.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PeriodStats {
    pub total_sent: u64,
    pub total_delivered: u64,
    pub total_failed: u64,
    pub total_cost: f64,
}

impl PeriodStats {
    /// Delivered share of sent messages as a whole percentage.
    pub fn success_rate(&self) -> u32 {
        if self.total_sent == 0 {
            return 0;
        }
        let rate = self.total_delivered as f64 / self.total_sent as f64 * 100.0;
        rate.round() as u32
    }
}

/// Statistics shown on the messaging dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardStats {
    pub this_week: PeriodStats,
    pub today: PeriodStats,
}

impl DashboardStats {
    /// Decode a successful `get_stats` result.
    pub fn from_result(result: &DispatchResult) -> Option<Self> {
        if !result.success {
            return None;
        }
        result.decode_data()
    }

    pub fn success_rate(&self) -> u32 {
        self.this_week.success_rate()
    }
}
