use std::sync::Arc;

use crate::{
    core::{Clock, Config, SystemClock},
    processors::{ProcessorRef, ProcessorSet},
};

use super::scheduler::Scheduler;

/// Builder for constructing a Scheduler with optional features.
pub struct SchedulerBuilder {
    cfg: Config,
    processors: Option<Vec<ProcessorRef>>,
    clock: Arc<dyn Clock>,
}

impl SchedulerBuilder {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            processors: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Sets the exception processors.
    ///
    /// Processors receive callback failures and overrun reports, in order.
    /// Without this call the chain holds a single [`LogWriter`](crate::LogWriter).
    pub fn with_processors(mut self, processors: Vec<ProcessorRef>) -> Self {
        self.processors = Some(processors);
        self
    }

    /// Sets the time source (defaults to [`SystemClock`]).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Builds and returns the Scheduler instance.
    pub fn build(self) -> Arc<Scheduler> {
        let processors = match self.processors {
            Some(list) => ProcessorSet::new(list),
            None => ProcessorSet::with_default_logger(),
        };
        Arc::new(Scheduler::new_internal(self.cfg, self.clock, processors))
    }
}
