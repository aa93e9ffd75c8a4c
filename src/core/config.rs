//! # Scheduler configuration.
//!
//! Provides [`Config`], the settings of the tick loop and the overrun check.
//!
//! ## Processing budget
//! `budget = 1000ms - 1.5 × tick_period`, saturating at zero. The slack keeps
//! one tick's dispatch from running into the next wall-clock second.
//!
//! | tick_period | budget  |
//! |-------------|---------|
//! | 100ms       | 850ms   |
//! | 250ms       | 625ms   |
//! | 500ms       | 250ms   |
//! | ≥ 667ms     | 0       |

use std::time::Duration;

/// Longest tick period that still samples every integer second.
pub const MAX_RELIABLE_TICK: Duration = Duration::from_millis(1000);

/// Configuration for the scheduler runtime.
///
/// ## Field semantics
/// - `tick_period`: interval between ticks delivered by [`Scheduler::run`](crate::Scheduler::run)
///   (recommended 250ms; above 1s due seconds can be skipped)
#[derive(Clone, Debug)]
pub struct Config {
    /// Interval between ticks.
    pub tick_period: Duration,
}

impl Config {
    /// Creates a config with the given tick period in milliseconds.
    pub fn with_tick_ms(ms: u64) -> Self {
        Self {
            tick_period: Duration::from_millis(ms),
        }
    }

    /// Returns the tick period clamped to a minimum of 1ms.
    #[inline]
    pub fn tick_period_clamped(&self) -> Duration {
        self.tick_period.max(Duration::from_millis(1))
    }

    /// Maximum dispatch duration of one tick before an overrun is reported.
    #[inline]
    pub fn processing_budget(&self) -> Duration {
        Duration::from_secs(1).saturating_sub(self.tick_period * 3 / 2)
    }

    /// Returns `true` if ticks are too sparse to observe every second.
    #[inline]
    pub fn may_skip_seconds(&self) -> bool {
        self.tick_period > MAX_RELIABLE_TICK
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tick_period = 250ms` (four samples per second, budget 625ms)
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget() {
        let cfg = Config::default();
        assert_eq!(cfg.tick_period, Duration::from_millis(250));
        assert_eq!(cfg.processing_budget(), Duration::from_millis(625));
    }

    #[test]
    fn test_budget_formula() {
        assert_eq!(
            Config::with_tick_ms(100).processing_budget(),
            Duration::from_millis(850)
        );
        assert_eq!(
            Config::with_tick_ms(500).processing_budget(),
            Duration::from_millis(250)
        );
        assert_eq!(
            Config::with_tick_ms(660).processing_budget(),
            Duration::from_millis(10)
        );
    }

    #[test]
    fn test_budget_saturates_at_zero() {
        assert_eq!(Config::with_tick_ms(700).processing_budget(), Duration::ZERO);
        assert_eq!(Config::with_tick_ms(5000).processing_budget(), Duration::ZERO);
    }

    #[test]
    fn test_tick_period_clamped() {
        assert_eq!(
            Config::with_tick_ms(0).tick_period_clamped(),
            Duration::from_millis(1)
        );
        assert!(Config::with_tick_ms(1500).may_skip_seconds());
        assert!(!Config::with_tick_ms(1000).may_skip_seconds());
    }
}
