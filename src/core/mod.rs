//! Runtime core: registry, dispatch and the tick loop.
//!
//! The public entry point is [`Scheduler`]; the rest is exposed for callers
//! that drive ticks themselves or need a different time source.
//!
//! Internal modules:
//! - [`registry`]: schedule index, callback table and memory table;
//! - [`dispatch`]: one pass over the callbacks due at a time;
//! - [`ticker`]: same-second de-duplication and overrun detection;
//! - [`scheduler`]: facade and async run loop.

mod builder;
mod clock;
mod config;
mod dispatch;
mod registry;
mod scheduler;
mod ticker;

pub use builder::SchedulerBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, MAX_RELIABLE_TICK};
pub use scheduler::Scheduler;
pub use ticker::TickReport;

pub(crate) use dispatch::panic_message;
pub(crate) use registry::{lock, Registry};
