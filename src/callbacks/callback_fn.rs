//! # Closure-backed callback (`CallbackFn`)
//!
//! [`CallbackFn`] wraps a closure `F: Fn(&mut CallContext) -> Result<bool, CallbackError>`.
//! State that must survive between invocations belongs in the callback's
//! [`Memory`](crate::Memory), not in captured variables.
//!
//! ## Example
//! ```rust
//! use tickcron::{CallbackFn, CallbackRef};
//!
//! let cb: CallbackRef = CallbackFn::arc(|ctx| {
//!     let n = ctx.memory().bump("seen");
//!     Ok(n > 1)
//! });
//! # let _ = cb;
//! ```

use std::sync::Arc;

use crate::callbacks::{CallContext, Callback};
use crate::error::CallbackError;

/// Function-backed callback implementation.
pub struct CallbackFn<F> {
    f: F,
}

impl<F> CallbackFn<F>
where
    F: Fn(&mut CallContext<'_>) -> Result<bool, CallbackError> + Send + Sync + 'static,
{
    /// Wraps a closure.
    ///
    /// Prefer [`CallbackFn::arc`] when you immediately need a [`CallbackRef`](crate::CallbackRef).
    pub fn new(f: F) -> Self {
        Self { f }
    }

    /// Wraps a closure and returns it as a shared handle.
    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Callback for CallbackFn<F>
where
    F: Fn(&mut CallContext<'_>) -> Result<bool, CallbackError> + Send + Sync + 'static,
{
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<bool, CallbackError> {
        (self.f)(ctx)
    }
}

impl<F> std::fmt::Debug for CallbackFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackFn").finish_non_exhaustive()
    }
}
