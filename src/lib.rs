//! # tickcron
//!
//! **tickcron** is a small periodic callback dispatcher.
//!
//! Callbacks are registered against a *period* (seconds), a *step pattern*
//! selecting offsets inside that period, and an optional *phase offset*. A
//! timer delivers ticks a few times per second; on each new integer second
//! every due callback is invoked with its private [`Memory`].
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   insert(id, Schedule, Callback)             tick source
//!              │                        (Scheduler::run / external ISR)
//!              ▼                                     │
//! ┌──────────────────────────────────────────┐       │
//! │ Registry                                 │       ▼
//! │  Window(period, offset)                  │  ┌───────────────────────────┐
//! │    └─ StepPattern ─► {ids}               │◄─┤ TickCoordinator           │
//! │  callbacks: id ─► CallbackRef            │  │  - same second? skip      │
//! │  memory:    id ─► Memory (lazy)          │  │  - dispatch(now), timed   │
//! └──────────────────────────────────────────┘  │  - overrun? report        │
//!              ▲                                └────────────┬──────────────┘
//!              │ ctx.remove_self() / remove_all()            │
//!              │                                             ▼
//!     ┌────────┴─────────┐                      ┌───────────────────────────┐
//!     │ Callback::call   │◄─── due snapshot ────┤ dispatch                  │
//!     │  (decorators:    │                      │  - catch Err / panic      │
//!     │   RunTimes, ...) │                      └────────────┬──────────────┘
//!     └──────────────────┘                                   │ Event
//!                                                            ▼
//!                                               ┌───────────────────────────┐
//!                                               │ ProcessorSet (in order)   │
//!                                               │  LogWriter, custom, ...   │
//!                                               └───────────────────────────┘
//! ```
//!
//! ### Due rule
//! ```text
//! pointer = (now + offset) % period
//! due     = steps.matches(pointer)
//!   Range{start, stop, step}: start <= pointer < stop && (pointer - start) % step == 0
//!   Set{offsets}:             offsets.contains(pointer)
//! ```
//!
//! ## Features
//! | Area            | Description                                                   | Key types / traits                           |
//! |-----------------|---------------------------------------------------------------|----------------------------------------------|
//! | **Schedules**   | Period, step pattern and phase of a registration.             | [`Schedule`], [`StepPattern`], [`Phase`]     |
//! | **Callbacks**   | Invocable units with private memory.                          | [`Callback`], [`CallbackFn`], [`Memory`]     |
//! | **Decorators**  | Run limits and call counting by nesting.                      | [`RunTimes`], [`SuccessfullyRunTimes`], [`CallCounter`], [`DebugCall`] |
//! | **Processors**  | Handle callback failures and overruns.                        | [`Process`], [`ProcessorSet`], [`LogWriter`] |
//! | **Runtime**     | Registry, ticks, async run loop.                              | [`Scheduler`], [`Config`], [`Clock`]         |
//! | **Errors**      | Typed errors for registration and callbacks.                  | [`RegistryError`], [`CallbackError`]         |
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use tickcron::{
//!     CallbackFn, Config, ManualClock, RunTimes, Schedule, Scheduler, StepPattern, PERIOD_DAY,
//!     PERIOD_MINUTE,
//! };
//!
//! // 2020-12-24 06:30:00 UTC
//! let clock = Arc::new(ManualClock::new(1_608_791_400));
//! let sched = Scheduler::builder(Config::default())
//!     .with_clock(clock.clone())
//!     .build();
//!
//! // Every 15 seconds, three times.
//! sched
//!     .insert(
//!         "m15",
//!         Schedule::new(PERIOD_MINUTE, StepPattern::range(0, PERIOD_MINUTE, 15)),
//!         RunTimes::arc(3, CallbackFn::arc(|_| Ok(true))),
//!     )
//!     .unwrap();
//!
//! // 06:30 and 22:30 every day.
//! sched
//!     .insert(
//!         "daily2",
//!         Schedule::new(PERIOD_DAY, [6 * 3600 + 30 * 60, 22 * 3600 + 30 * 60]),
//!         CallbackFn::arc(|_| Ok(true)),
//!     )
//!     .unwrap();
//!
//! assert_eq!(sched.tick().unwrap().due.len(), 2);
//!
//! for _ in 0..2 {
//!     clock.advance(15);
//!     sched.tick();
//! }
//! assert!(!sched.contains("m15"));
//! assert!(sched.contains("daily2"));
//! ```
mod callbacks;
mod core;
mod decorators;
mod error;
mod events;
mod processors;
mod schedule;

// ---- Public re-exports ----

pub use callbacks::{CallContext, Callback, CallbackFn, CallbackId, CallbackRef, Memory};
pub use crate::core::{
    Clock, Config, ManualClock, Scheduler, SchedulerBuilder, SystemClock, TickReport,
    MAX_RELIABLE_TICK,
};
pub use decorators::{CallCounter, DebugCall, RunTimes, SuccessfullyRunTimes};
pub use error::{CallbackError, RegistryError, RuntimeError};
pub use events::{Event, EventKind};
pub use processors::{LogWriter, Process, ProcessorFn, ProcessorRef, ProcessorSet};
pub use schedule::{
    Phase, Schedule, StepPattern, Window, PERIOD_CENTURY, PERIOD_DAY, PERIOD_HOUR,
    PERIOD_MINUTE, PERIOD_MONTH, PERIOD_WEEK, PERIOD_YEAR,
};
