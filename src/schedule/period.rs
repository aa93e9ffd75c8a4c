//! # Schedules and named periods.
//!
//! [`Schedule`] bundles a period (seconds), a [`StepPattern`] and a [`Phase`].
//! It is resolved into a [`Window`] when inserted into the scheduler.
//!
//! ## Example
//! ```rust
//! use tickcron::{Phase, Schedule, StepPattern, PERIOD_MINUTE};
//!
//! let every_15s = Schedule::new(PERIOD_MINUTE, StepPattern::range(0, PERIOD_MINUTE, 15));
//! assert_eq!(every_15s.phase(), Phase::Offset(0));
//!
//! // Fire 11 seconds after registration, then every 11 seconds.
//! let relative = Schedule::new(11, StepPattern::at(0)).from_now();
//! assert_eq!(relative.phase(), Phase::FromNow);
//! ```

use crate::error::RegistryError;
use crate::schedule::steps::StepPattern;

pub const PERIOD_MINUTE: u64 = 60;
pub const PERIOD_HOUR: u64 = 60 * 60;
pub const PERIOD_DAY: u64 = 24 * 60 * 60;
pub const PERIOD_WEEK: u64 = 7 * 24 * 60 * 60;
pub const PERIOD_YEAR: u64 = 365 * 24 * 60 * 60;
/// A twelfth of [`PERIOD_YEAR`].
pub const PERIOD_MONTH: u64 = PERIOD_YEAR / 12;
pub const PERIOD_CENTURY: u64 = 100 * PERIOD_YEAR;

/// Where the window of a schedule starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Fixed shift added to the current time before reducing modulo the period.
    Offset(u64),
    /// Align the window so its boundary falls exactly one period after registration.
    ///
    /// Resolved at insert time to `(-now) mod period`. The registration
    /// second itself is never due.
    FromNow,
}

impl Default for Phase {
    /// Returns `Phase::Offset(0)`.
    fn default() -> Self {
        Phase::Offset(0)
    }
}

/// Resolved `(period, phase offset)` pair; the registry's outer index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Window {
    /// Period length in seconds (`> 0`).
    pub period: u64,
    /// Phase offset, reduced into `[0, period)`.
    pub offset: u64,
}

impl Window {
    /// Position of `now` inside this window: `(now + offset) mod period`.
    #[inline]
    pub fn pointer(&self, now: u64) -> u64 {
        // Modular addition without overflow; offset < period.
        let pos = now % self.period;
        let room = self.period - pos;
        if self.offset >= room {
            self.offset - room
        } else {
            pos + self.offset
        }
    }
}

/// When a callback is due: period, step pattern and phase.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    period: u64,
    steps: StepPattern,
    phase: Phase,
}

impl Schedule {
    /// Creates a schedule with a zero phase offset.
    pub fn new(period: u64, steps: impl Into<StepPattern>) -> Self {
        Self {
            period,
            steps: steps.into(),
            phase: Phase::Offset(0),
        }
    }

    /// Returns a new schedule with the given phase offset.
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.phase = Phase::Offset(offset);
        self
    }

    /// Returns a new schedule whose window starts at registration time.
    pub fn from_now(mut self) -> Self {
        self.phase = Phase::FromNow;
        self
    }

    /// Returns the period in seconds.
    pub fn period(&self) -> u64 {
        self.period
    }

    /// Returns the step pattern.
    pub fn steps(&self) -> &StepPattern {
        &self.steps
    }

    /// Returns the phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Validates the schedule and resolves its phase against `now`.
    pub(crate) fn resolve(self, now: u64) -> Result<(Window, StepPattern), RegistryError> {
        if self.period == 0 {
            return Err(RegistryError::invalid("period must be positive"));
        }
        self.steps.validate(self.period)?;

        let offset = match self.phase {
            Phase::Offset(n) => n % self.period,
            Phase::FromNow => (self.period - now % self.period) % self.period,
        };
        Ok((
            Window {
                period: self.period,
                offset,
            },
            self.steps,
        ))
    }
}
