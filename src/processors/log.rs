//! # LogWriter: default exception processor
//!
//! Logs every event through `tracing`. Callback failures use the message
//! `Callback EXCEPTION: <details>`; overruns list the ids that were due.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! WARN tickcron::processors::log: Callback EXCEPTION: execution failed: sensor offline callback=temp time=1608823800
//! WARN tickcron::processors::log: tick overran processing budget time=1608823800 elapsed_ms=712 budget_ms=625 due=["temp", "m15"]
//! ```

use std::sync::Arc;

use tracing::{error, warn};

use crate::events::{Event, EventKind};
use crate::processors::Process;

/// Event logging processor.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Construct a shared [`LogWriter`].
    #[must_use]
    pub fn arc() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl Process for LogWriter {
    fn process(&self, e: &Event) {
        match e.kind {
            EventKind::CallbackFailed => {
                warn!(
                    callback = e.callback.as_deref().unwrap_or("unknown"),
                    time = e.time,
                    "Callback EXCEPTION: {}",
                    e.reason.as_deref().unwrap_or("unknown"),
                );
            }
            EventKind::TooLongProcessing => {
                let due: Vec<&str> = e.due.iter().flat_map(|d| d.iter()).map(|s| &**s).collect();
                warn!(
                    time = e.time,
                    elapsed_ms = e.elapsed.map(|d| d.as_millis() as u64),
                    budget_ms = e.budget.map(|d| d.as_millis() as u64),
                    due = ?due,
                    "tick overran processing budget"
                );
            }
            EventKind::ProcessorPanicked => {
                error!(
                    reason = e.reason.as_deref().unwrap_or("unknown"),
                    "processor panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
