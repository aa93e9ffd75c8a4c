//! # Exception processor trait.
//!
//! Provides [`Process`], the extension point for plugging custom handling of
//! callback failures and overruns into the dispatcher (logging, metrics,
//! fault counters).
//!
//! ## Rules
//! - Processors run synchronously inside the tick, in registration order.
//! - A panicking processor is caught and logged; the rest of the chain still runs.
//! - Processors must not call back into the scheduler's tick.

use std::sync::Arc;

use crate::events::Event;

/// Handler for dispatcher conditions.
pub trait Process: Send + Sync + 'static {
    /// Handles a single event.
    fn process(&self, event: &Event);

    /// Returns the processor name used in logs.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Shared handle to a processor.
pub type ProcessorRef = Arc<dyn Process>;

/// Closure-backed processor.
///
/// ```rust
/// use tickcron::{ProcessorFn, ProcessorRef};
///
/// let p: ProcessorRef = ProcessorFn::arc("stderr", |ev| eprintln!("{:?}", ev.reason));
/// assert_eq!(p.name(), "stderr");
/// ```
pub struct ProcessorFn<F> {
    name: &'static str,
    f: F,
}

impl<F> ProcessorFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    /// Wraps a closure under the given name.
    pub fn new(name: &'static str, f: F) -> Self {
        Self { name, f }
    }

    /// Wraps a closure and returns it as a shared handle.
    pub fn arc(name: &'static str, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> Process for ProcessorFn<F>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    fn process(&self, event: &Event) {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
