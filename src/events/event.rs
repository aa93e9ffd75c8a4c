//! # Conditions emitted by the dispatcher.
//!
//! The [`EventKind`] enum tells apart the two conditions the exception
//! processors receive:
//! - **callback failures**: a callback returned an error or panicked;
//! - **overruns**: one tick's dispatch took longer than the processing budget.
//!
//! The [`Event`] struct carries the metadata: callback id, tick time, elapsed
//! time, budget, the ids that were due, and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tickcron::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::CallbackFailed)
//!     .with_callback("m15")
//!     .with_time(1_608_823_800)
//!     .with_reason("execution failed: boom");
//!
//! assert_eq!(ev.kind, EventKind::CallbackFailed);
//! assert_eq!(ev.callback.as_deref(), Some("m15"));
//! assert_eq!(ev.reason.as_deref(), Some("execution failed: boom"));
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use crate::callbacks::CallbackId;
use crate::error::CallbackError;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of dispatcher conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A callback returned `Err` or panicked.
    ///
    /// Sets:
    /// - `callback`: callback id
    /// - `time`: tick time (seconds)
    /// - `error`: the callback error
    /// - `reason`: rendered error
    CallbackFailed,

    /// Dispatch of one tick exceeded the processing budget.
    ///
    /// Advisory only; the dispatch has already completed.
    ///
    /// Sets:
    /// - `time`: tick time (seconds)
    /// - `elapsed`: measured dispatch duration
    /// - `budget`: configured processing budget
    /// - `due`: ids that were due this tick
    TooLongProcessing,

    /// A processor panicked while handling another event.
    ///
    /// Delivered once to the processors that did not panic in the same emit.
    ///
    /// Sets:
    /// - `reason`: processor name and panic info
    ProcessorPanicked,
}

impl EventKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            EventKind::CallbackFailed => "callback_failed",
            EventKind::TooLongProcessing => "too_long_processing",
            EventKind::ProcessorPanicked => "processor_panicked",
        }
    }
}

/// Dispatcher condition with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Id of the callback concerned, if any.
    pub callback: Option<CallbackId>,
    /// Tick time (seconds) the event belongs to.
    pub time: Option<u64>,
    /// Measured dispatch duration.
    pub elapsed: Option<Duration>,
    /// Configured processing budget.
    pub budget: Option<Duration>,
    /// Ids due in the offending tick.
    pub due: Option<Arc<[CallbackId]>>,
    /// Error returned by the callback.
    pub error: Option<CallbackError>,
    /// Human-readable reason.
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            callback: None,
            time: None,
            elapsed: None,
            budget: None,
            due: None,
            error: None,
            reason: None,
        }
    }

    /// Attaches a callback id.
    #[inline]
    pub fn with_callback(mut self, id: impl Into<CallbackId>) -> Self {
        self.callback = Some(id.into());
        self
    }

    /// Attaches the tick time.
    #[inline]
    pub fn with_time(mut self, time: u64) -> Self {
        self.time = Some(time);
        self
    }

    /// Attaches the measured dispatch duration.
    #[inline]
    pub fn with_elapsed(mut self, d: Duration) -> Self {
        self.elapsed = Some(d);
        self
    }

    /// Attaches the processing budget.
    #[inline]
    pub fn with_budget(mut self, d: Duration) -> Self {
        self.budget = Some(d);
        self
    }

    /// Attaches the list of due ids.
    #[inline]
    pub fn with_due(mut self, due: impl Into<Arc<[CallbackId]>>) -> Self {
        self.due = Some(due.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a callback error (and its rendering as the reason).
    #[inline]
    pub fn with_error(mut self, err: CallbackError) -> Self {
        self.reason = Some(err.to_string().into());
        self.error = Some(err);
        self
    }

    /// Creates a callback failure event.
    pub fn callback_failed(id: &CallbackId, time: u64, err: CallbackError) -> Self {
        Event::new(EventKind::CallbackFailed)
            .with_callback(id.clone())
            .with_time(time)
            .with_error(err)
    }

    /// Creates an overrun event.
    pub fn too_long_processing(
        time: u64,
        elapsed: Duration,
        budget: Duration,
        due: Vec<CallbackId>,
    ) -> Self {
        Event::new(EventKind::TooLongProcessing)
            .with_time(time)
            .with_elapsed(elapsed)
            .with_budget(budget)
            .with_reason(format!(
                "tick {time} took {elapsed:?} (budget {budget:?}), due={}",
                due.len()
            ))
            .with_due(due)
    }

    /// Creates a processor panic event.
    pub fn processor_panicked(processor: &'static str, info: String) -> Self {
        Event::new(EventKind::ProcessorPanicked)
            .with_reason(format!("processor={processor} info={info}"))
    }

    #[inline]
    pub fn is_callback_failure(&self) -> bool {
        matches!(self.kind, EventKind::CallbackFailed)
    }

    #[inline]
    pub fn is_overrun(&self) -> bool {
        matches!(self.kind, EventKind::TooLongProcessing)
    }
}
