//! Timing hooks for the per-tick update path.
//!
//! Subsystems that want to be measured accept an optional [`UpdateObserver`] when they are built
//! and report `(operation, elapsed)` pairs to it. With no observer attached nothing is timed.

use std::collections::HashMap;

use log::info;
use web_time::Duration;

use crate::core::StResource;

/// Receives the duration of named operations.
pub trait UpdateObserver {
    /// Called once per completed `operation`.
    fn observe(&mut self, operation: &'static str, elapsed: Duration);
}

impl<T: UpdateObserver> UpdateObserver for StResource<T> {
    fn observe(&mut self, operation: &'static str, elapsed: Duration) {
        self.get_mut().observe(operation, elapsed);
    }
}

/// Aggregate timings of one operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimedOperation {
    /// Number of recorded runs
    pub iterations: u64,
    /// Sum of all recorded durations
    pub total: Duration,
    /// Fastest run
    pub min: Duration,
    /// Slowest run
    pub max: Duration,
}

impl TimedOperation {
    fn first(elapsed: Duration) -> Self {
        Self {
            iterations: 1,
            total: elapsed,
            min: elapsed,
            max: elapsed,
        }
    }

    fn record(&mut self, elapsed: Duration) {
        self.iterations += 1;
        self.total += elapsed;
        self.min = self.min.min(elapsed);
        self.max = self.max.max(elapsed);
    }

    /// Average duration per run.
    pub fn mean(&self) -> Duration {
        match u32::try_from(self.iterations) {
            Ok(0) => Duration::ZERO,
            Ok(iterations) => self.total / iterations,
            Err(_) => Duration::from_secs_f64(self.total.as_secs_f64() / self.iterations as f64),
        }
    }
}

/// One row of [`Timer::summary`].
#[derive(Debug, Clone, PartialEq)]
pub struct TimingSummary {
    /// Operation name
    pub operation: &'static str,
    /// Average duration
    pub mean: Duration,
    /// Fastest run
    pub min: Duration,
    /// Slowest run
    pub max: Duration,
}

/// Collects mean/min/max timings per operation.
///
/// # Examples
///
/// ```
/// use tile_streamer::engine_state::profiling::{Timer, UpdateObserver};
/// use web_time::Duration;
///
/// let mut timer = Timer::new();
/// timer.observe("tick", Duration::from_millis(2));
/// timer.observe("tick", Duration::from_millis(4));
///
/// let tick = timer.operation("tick").unwrap();
/// assert_eq!(tick.mean(), Duration::from_millis(3));
/// ```
#[derive(Debug, Default)]
pub struct Timer {
    operations: HashMap<&'static str, TimedOperation>,
}

impl Timer {
    /// Creates an empty timer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregates recorded for `operation`.
    pub fn operation(&self, operation: &str) -> Option<&TimedOperation> {
        self.operations.get(operation)
    }

    /// Per-operation mean, min and max, sorted by operation name.
    pub fn summary(&self) -> Vec<TimingSummary> {
        let mut rows: Vec<TimingSummary> = self
            .operations
            .iter()
            .map(|(&operation, timed)| TimingSummary {
                operation,
                mean: timed.mean(),
                min: timed.min,
                max: timed.max,
            })
            .collect();
        rows.sort_by_key(|row| row.operation);
        rows
    }

    /// Writes the summary to the log at `info` level.
    pub fn log_summary(&self) {
        for row in self.summary() {
            info!(
                "    {}: {:.7} ({:.7} min) ({:.7} max)",
                row.operation,
                row.mean.as_secs_f64(),
                row.min.as_secs_f64(),
                row.max.as_secs_f64()
            );
        }
    }
}

impl UpdateObserver for Timer {
    fn observe(&mut self, operation: &'static str, elapsed: Duration) {
        self.operations
            .entry(operation)
            .and_modify(|timed| timed.record(elapsed))
            .or_insert_with(|| TimedOperation::first(elapsed));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_are_tracked_independently() {
        let mut timer = Timer::new();
        timer.observe("update", Duration::from_micros(50));
        timer.observe("update", Duration::from_micros(10));
        timer.observe("update", Duration::from_micros(90));

        let update = timer.operation("update").unwrap();
        assert_eq!(update.iterations, 3);
        assert_eq!(update.min, Duration::from_micros(10));
        assert_eq!(update.max, Duration::from_micros(90));
        assert_eq!(update.mean(), Duration::from_micros(50));
    }

    #[test]
    fn mean_survives_counts_beyond_u32() {
        let timed = TimedOperation {
            iterations: 1 << 32,
            total: Duration::from_secs(1 << 32),
            min: Duration::from_millis(500),
            max: Duration::from_millis(1500),
        };
        assert_eq!(timed.mean(), Duration::from_secs(1));

        let empty = TimedOperation {
            iterations: 0,
            ..timed
        };
        assert_eq!(empty.mean(), Duration::ZERO);
    }

    #[test]
    fn summary_is_sorted_by_name() {
        let mut timer = Timer::new();
        timer.observe("b", Duration::from_millis(1));
        timer.observe("a", Duration::from_millis(1));

        let names: Vec<&str> = timer.summary().iter().map(|row| row.operation).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn shared_timer_sees_observations_through_a_clone() {
        let timer = StResource::new(Timer::new());
        let mut observer: Box<dyn UpdateObserver> = Box::new(timer.clone());

        observer.observe("grid", Duration::from_millis(1));

        assert_eq!(timer.get().operation("grid").unwrap().iterations, 1);
    }
}
