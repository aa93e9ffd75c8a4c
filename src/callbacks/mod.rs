//! # Callback abstractions and per-callback state.
//!
//! This module provides the callback-related types:
//! - [`Callback`] - trait for anything invocable with `(id, time, memory)`
//! - [`CallbackFn`] - closure-backed implementation
//! - [`CallbackRef`] - shared handle (`Arc<dyn Callback>`) stored in the registry
//! - [`CallContext`] - what a callback sees during one invocation
//! - [`Memory`] - private scratch state surviving across invocations

mod callback;
mod callback_fn;
mod context;
mod memory;

pub use callback::{Callback, CallbackId, CallbackRef};
pub use callback_fn::CallbackFn;
pub use context::CallContext;
pub use memory::Memory;
