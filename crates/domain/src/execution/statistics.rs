//! Aggregate timing statistics over a batch

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::RequestExecution;

/// Counts and timings for a batch of executions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Number of records
    pub total: usize,
    /// Records with a 2xx response
    pub success: usize,
    /// All other records
    pub failed: usize,
    /// Sum of durations divided by `total`
    #[serde(with = "crate::duration_millis")]
    pub avg_time: Duration,
    /// Shortest duration among dispatched requests
    #[serde(with = "crate::duration_millis")]
    pub min_time: Duration,
    /// Longest duration among dispatched requests
    #[serde(with = "crate::duration_millis")]
    pub max_time: Duration,
}

impl Statistics {
    /// Computes statistics over a list of records.
    ///
    /// Records that were never dispatched count toward `total`, `failed` and
    /// the average, but not toward `min_time` or `max_time`.
    #[must_use]
    pub fn from_executions(executions: &[RequestExecution]) -> Self {
        let mut stats = Self {
            total: executions.len(),
            ..Self::default()
        };
        let mut sum = Duration::ZERO;
        let mut seeded = false;

        for execution in executions {
            if execution.is_success() {
                stats.success += 1;
            } else {
                stats.failed += 1;
            }
            sum += execution.duration;

            if !execution.dispatched {
                continue;
            }
            if seeded {
                stats.min_time = stats.min_time.min(execution.duration);
                stats.max_time = stats.max_time.max(execution.duration);
            } else {
                stats.min_time = execution.duration;
                stats.max_time = execution.duration;
                seeded = true;
            }
        }

        if let Ok(total) = u32::try_from(stats.total)
            && total > 0
        {
            stats.avg_time = sum / total;
        }
        stats
    }

    /// Fraction of successful records in `0.0..=1.0`; zero for an empty batch.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.success as f64 / self.total as f64
        }
    }
}
