//! # ProcessorSet: ordered, panic-isolated fan-out over processors
//!
//! [`ProcessorSet`] hands each [`Event`] to every processor, in order, on the
//! calling thread.
//!
//! ## What it guarantees
//! - Registration order is delivery order.
//! - A panic inside a processor is caught and logged; later processors still run.
//! - After the pass, each caught panic is delivered as a `ProcessorPanicked`
//!   event to the processors that did not panic during this emit.
//!
//! ## What it does **not** guarantee
//! - No retries: a processor that panicked does not see the event again.
//! - A panic while handling a `ProcessorPanicked` event is only logged.
//!
//! ## Diagram
//! ```text
//!    emit(&Event)
//!        ├──► P1.process()   (catch_unwind)
//!        ├──► P2.process()   (catch_unwind)  ── panics
//!        ├──► PN.process()   (catch_unwind)
//!        └──► ProcessorPanicked{P2} ──► P1, PN
//! ```

use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::error;

use crate::core::panic_message;
use crate::events::Event;

use super::{LogWriter, ProcessorRef};

/// Ordered chain of exception processors.
#[derive(Clone, Default)]
pub struct ProcessorSet {
    processors: Vec<ProcessorRef>,
}

impl ProcessorSet {
    /// Creates a set from the given processors.
    #[must_use]
    pub fn new(processors: Vec<ProcessorRef>) -> Self {
        Self { processors }
    }

    /// The default chain: a single [`LogWriter`].
    #[must_use]
    pub fn with_default_logger() -> Self {
        Self::new(vec![LogWriter::arc()])
    }

    /// Appends a processor to the end of the chain.
    pub fn push(&mut self, processor: ProcessorRef) {
        self.processors.push(processor);
    }

    /// Delivers one event to every processor, in order.
    pub fn emit(&self, event: &Event) {
        let mut panicked = Vec::new();
        for (i, p) in self.processors.iter().enumerate() {
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| p.process(event))) {
                let ev = Event::processor_panicked(p.name(), panic_message(payload.as_ref()));
                error!(
                    processor = p.name(),
                    event = event.kind.as_label(),
                    reason = ev.reason.as_deref().unwrap_or("unknown"),
                    "exception processor panicked"
                );
                panicked.push((i, ev));
            }
        }
        if panicked.is_empty() {
            return;
        }

        for (_, ev) in &panicked {
            for (i, p) in self.processors.iter().enumerate() {
                if panicked.iter().any(|(j, _)| *j == i) {
                    continue;
                }
                if let Err(payload) = catch_unwind(AssertUnwindSafe(|| p.process(ev))) {
                    error!(
                        processor = p.name(),
                        reason = %panic_message(payload.as_ref()),
                        "exception processor panicked on processor_panicked"
                    );
                }
            }
        }
    }

    /// Names of the processors, in order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    /// True if there are no processors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }

    /// Number of processors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.processors.len()
    }
}
