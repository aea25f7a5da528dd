//! Rolling statistics over the tail of a monitor's history.

use pulse_sentiment::trend;
use pulse_types::stats::{mean, population_std_dev};
use pulse_types::Monitor;

/// Recompute `rolling_average`, `trend` and `volatility` over the last
/// `window` entries. `total_polls` is left alone.
pub fn refresh_stats(monitor: &mut Monitor, window: usize) {
    let scores: Vec<f64> = monitor.history.tail(window).map(|p| p.score).collect();
    monitor.stats.rolling_average = mean(&scores);
    monitor.stats.trend = trend(&scores);
    monitor.stats.volatility = population_std_dev(&scores);
}
