//! `CallCounter`: count invocations in the callback's memory.

use std::sync::Arc;

use crate::callbacks::{CallContext, Callback, CallbackRef, Memory};
use crate::error::CallbackError;

/// Memory key of the call counter.
pub(crate) const KEY: &str = "__call_counter";

/// Counts invocations of the wrapped callback; never removes anything.
pub struct CallCounter {
    inner: CallbackRef,
}

impl CallCounter {
    /// Wraps `inner`.
    pub fn new(inner: CallbackRef) -> Self {
        Self { inner }
    }

    /// Wraps `inner` and returns a shared handle.
    pub fn arc(inner: CallbackRef) -> Arc<Self> {
        Arc::new(Self::new(inner))
    }

    /// Calls recorded in `memory` (0 before the first one).
    pub fn count(memory: &Memory) -> u64 {
        memory.counter(KEY)
    }
}

impl Callback for CallCounter {
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<bool, CallbackError> {
        ctx.memory().bump(KEY);
        self.inner.call(ctx)
    }
}
