//! `RunTimes`: deregister a callback after a fixed number of invocations.

use std::sync::Arc;

use crate::callbacks::{CallContext, Callback, CallbackRef, Memory};
use crate::error::CallbackError;

/// Memory key of the invocation counter.
pub(crate) const KEY: &str = "__run_times";

/// Limits a callback to `n` invocations.
///
/// The counter advances on every call, failures included. Once it reaches
/// `n` the callback is deregistered; the n-th call is the last one.
pub struct RunTimes {
    times: u64,
    inner: CallbackRef,
}

impl RunTimes {
    /// Wraps `inner`.
    pub fn new(times: u64, inner: CallbackRef) -> Self {
        Self { times, inner }
    }

    /// Wraps `inner` and returns a shared handle.
    pub fn arc(times: u64, inner: CallbackRef) -> Arc<Self> {
        Arc::new(Self::new(times, inner))
    }

    /// Number of invocations recorded in `memory`.
    pub fn count(memory: &Memory) -> u64 {
        memory.counter(KEY)
    }
}

impl Callback for RunTimes {
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<bool, CallbackError> {
        let runs = ctx.memory().bump(KEY);
        let out = self.inner.call(ctx);
        if runs >= self.times {
            ctx.remove_self();
        }
        out
    }
}
