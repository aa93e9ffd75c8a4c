//! # Decorators: callbacks wrapping callbacks.
//!
//! Each decorator is a [`Callback`](crate::Callback) holding the wrapped
//! callback and one reserved [`Memory`](crate::Memory) key. Composition is
//! plain nesting; distinct keys keep stacked decorators from sharing state.
//!
//! | Decorator                | Memory key        | Removes the callback            |
//! |--------------------------|-------------------|---------------------------------|
//! | [`RunTimes`]             | `__run_times`     | after the n-th invocation       |
//! | [`SuccessfullyRunTimes`] | `__s_run_times`   | after the n-th `Ok(true)`       |
//! | [`CallCounter`]          | `__call_counter`  | never                           |
//! | [`DebugCall`]            | `__debug_call`    | never (logs around each call)   |
//!
//! ## Example
//! ```rust
//! use tickcron::{CallCounter, CallbackFn, CallbackRef, RunTimes};
//!
//! // Counted, and gone after three runs.
//! let cb: CallbackRef = RunTimes::arc(
//!     3,
//!     CallCounter::arc(CallbackFn::arc(|ctx| Ok(ctx.now() % 10 == 0))),
//! );
//! # let _ = cb;
//! ```

mod call_counter;
mod debug_call;
mod run_times;
mod successfully_run_times;

pub use call_counter::CallCounter;
pub use debug_call::DebugCall;
pub use run_times::RunTimes;
pub use successfully_run_times::SuccessfullyRunTimes;
