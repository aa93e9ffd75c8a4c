//! # Tick coordinator: de-duplication and overrun detection around a dispatch.
//!
//! ```text
//! tick(now)
//!   ├─ now == last_run_time ─► None (already processed this second)
//!   ├─ last_run_time = now
//!   ├─ started = Instant::now(); due = dispatch(now); elapsed = started.elapsed()
//!   └─ elapsed > budget ─► processors.emit(TooLongProcessing{now, elapsed, due})
//! ```
//!
//! The overrun report is observational: the dispatch has already finished.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::callbacks::CallbackId;
use crate::core::config::Config;
use crate::core::dispatch::dispatch;
use crate::core::registry::Registry;
use crate::events::Event;
use crate::processors::ProcessorSet;

/// Outcome of one processed tick.
#[derive(Clone, Debug)]
pub struct TickReport {
    /// Tick time in seconds.
    pub time: u64,
    /// Ids that were due (snapshot, in dispatch order).
    pub due: Vec<CallbackId>,
    /// Wall-clock duration of the dispatch.
    pub elapsed: Duration,
    /// `true` if `elapsed` exceeded the processing budget.
    pub overrun: bool,
}

/// De-duplicates ticks and reports overruns.
#[derive(Debug)]
pub(crate) struct TickCoordinator {
    last_run_time: Option<u64>,
    budget: Duration,
}

impl TickCoordinator {
    /// Creates a coordinator with the budget derived from `cfg`.
    pub(crate) fn new(cfg: &Config) -> Self {
        Self {
            last_run_time: None,
            budget: cfg.processing_budget(),
        }
    }

    /// Last tick time that was processed.
    pub(crate) fn last_run_time(&self) -> Option<u64> {
        self.last_run_time
    }

    /// Runs one tick at `now`; `None` if `now` was already processed.
    pub(crate) fn tick(
        &mut self,
        now: u64,
        registry: &Mutex<Registry>,
        processors: &ProcessorSet,
    ) -> Option<TickReport> {
        if self.last_run_time == Some(now) {
            return None;
        }
        self.last_run_time = Some(now);

        let started = Instant::now();
        let due = dispatch(registry, processors, now);
        let elapsed = started.elapsed();

        let overrun = elapsed > self.budget;
        if overrun {
            processors.emit(&Event::too_long_processing(
                now,
                elapsed,
                self.budget,
                due.clone(),
            ));
        }
        debug!(
            time = now,
            due = due.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "tick processed"
        );

        Some(TickReport {
            time: now,
            due,
            elapsed,
            overrun,
        })
    }
}
