//! Call tracing for development: logs a `START`/`END` pair around each call
//! together with the callback's user memory keys.

use std::sync::Arc;

use tracing::debug;

use crate::callbacks::{CallContext, Callback, CallbackRef, Memory};
use crate::error::CallbackError;

/// Memory key of the traced call number.
pub(crate) const KEY: &str = "__debug_call";

/// Logs every invocation of the wrapped callback at `DEBUG` level.
///
/// Keeps its own call number under a separate key, so it can be stacked with
/// [`CallCounter`](crate::CallCounter) without either count doubling.
pub struct DebugCall {
    inner: CallbackRef,
}

impl DebugCall {
    /// Wraps `inner`.
    pub fn new(inner: CallbackRef) -> Self {
        Self { inner }
    }

    /// Wraps `inner` and returns a shared handle.
    pub fn arc(inner: CallbackRef) -> Arc<Self> {
        Arc::new(Self::new(inner))
    }

    /// Traced calls recorded in `memory` (0 before the first one).
    pub fn count(memory: &Memory) -> u64 {
        memory.counter(KEY)
    }
}

impl Callback for DebugCall {
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<bool, CallbackError> {
        let n = ctx.memory().bump(KEY);
        debug!(
            callback = ctx.id(),
            time = ctx.now(),
            memory = ?ctx.memory_ref().user_keys(),
            "START call({n})"
        );

        let out = self.inner.call(ctx);

        debug!(
            callback = ctx.id(),
            time = ctx.now(),
            memory = ?ctx.memory_ref().user_keys(),
            ok = ?out,
            "END call({n})"
        );
        out
    }
}
