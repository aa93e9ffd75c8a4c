//! # Exception processors.
//!
//! This module provides the [`Process`] trait and the built-in [`LogWriter`]
//! for handling the conditions the dispatcher emits instead of propagating them.
//!
//! ## Architecture
//! ```text
//! dispatch ── callback Err/panic ──► Event(CallbackFailed) ───┐
//! tick     ── elapsed > budget   ──► Event(TooLongProcessing) ┤
//!                                                             ▼
//!                                                      ProcessorSet::emit(&Event)
//!                                                 ┌───────────┼───────────┐
//!                                                 ▼           ▼           ▼
//!                                             LogWriter    Metrics     Custom
//!                                             (in order, panic isolated)
//! ```
//!
//! ## Implementing custom processors
//! ```no_run
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use tickcron::{Event, EventKind, Process};
//!
//! #[derive(Default)]
//! struct FaultCounter(AtomicU64);
//!
//! impl Process for FaultCounter {
//!     fn process(&self, event: &Event) {
//!         if event.kind == EventKind::CallbackFailed {
//!             self.0.fetch_add(1, Ordering::Relaxed);
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "fault-counter" }
//! }
//! ```

mod log;
mod processor;
mod set;

pub use log::LogWriter;
pub use processor::{Process, ProcessorFn, ProcessorRef};
pub use set::ProcessorSet;
