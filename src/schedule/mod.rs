//! Schedules: when a callback is due.
//!
//! A callback is due when the current time, shifted by a phase offset and
//! reduced modulo a period, hits one of the offsets selected by a step pattern.
//!
//! ## Contents
//! - [`StepPattern`] which offsets inside the period are due (range or set)
//! - [`Schedule`] period + step pattern + [`Phase`], passed to `Scheduler::insert`
//! - [`Window`] resolved `(period, offset)` pair the registry indexes by
//! - `PERIOD_*` named periods in seconds
//!
//! ## Quick wiring
//! ```text
//! Schedule { period, steps, phase }
//!      └─► Scheduler::insert resolves phase (FromNow uses the clock)
//!           └─► Registry: Window(period, offset) → StepPattern → {ids}
//!                └─► dispatch: pointer = (now + offset) % period; steps.matches(pointer)
//! ```

mod period;
mod steps;

pub use period::{
    Phase, Schedule, Window, PERIOD_CENTURY, PERIOD_DAY, PERIOD_HOUR, PERIOD_MINUTE,
    PERIOD_MONTH, PERIOD_WEEK, PERIOD_YEAR,
};
pub use steps::StepPattern;
