//! # Callback abstraction.
//!
//! A [`Callback`] is invoked by the dispatcher every time its schedule is due.
//! It receives a [`CallContext`] carrying its identifier, the current time and
//! its private [`Memory`](crate::Memory), and returns an outcome:
//!
//! - `Ok(true)` ran successfully (the "truthy" outcome decorators count)
//! - `Ok(false)` ran, but did not consider the run a success
//! - `Err(_)` failed; the error is forwarded to the exception processors
//!
//! Callbacks run synchronously inside the tick; they should be short.

use std::sync::Arc;

use crate::callbacks::CallContext;
use crate::error::CallbackError;

/// Identifier chosen by the registrant; unique while registered.
pub type CallbackId = Arc<str>;

/// Shared handle to a callback, as stored in the registry.
pub type CallbackRef = Arc<dyn Callback>;

/// # Invocable unit driven by the dispatcher.
///
/// Decorators implement this trait too and wrap another [`CallbackRef`],
/// so composition is plain nesting.
///
/// # Example
/// ```
/// use tickcron::{Callback, CallContext, CallbackError};
///
/// struct Blink;
///
/// impl Callback for Blink {
///     fn call(&self, ctx: &mut CallContext<'_>) -> Result<bool, CallbackError> {
///         let on = ctx.memory().bump("blinks") % 2 == 1;
///         Ok(on)
///     }
/// }
/// ```
pub trait Callback: Send + Sync + 'static {
    /// Runs one invocation.
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<bool, CallbackError>;
}
