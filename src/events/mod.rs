//! Runtime events: conditions routed through the exception-processor chain.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//!
//! ## Quick reference
//! - **Publishers**: the dispatch engine (`CallbackFailed`), the tick
//!   coordinator (`TooLongProcessing`), `ProcessorSet` (`ProcessorPanicked`,
//!   logged only).
//! - **Consumers**: every [`Process`](crate::Process) in the scheduler's chain.

mod event;

pub use event::{Event, EventKind};
