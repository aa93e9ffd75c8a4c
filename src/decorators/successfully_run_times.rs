//! `SuccessfullyRunTimes`: deregister a callback after a fixed number of
//! `Ok(true)` results.

use std::sync::Arc;

use crate::callbacks::{CallContext, Callback, CallbackRef, Memory};
use crate::error::CallbackError;

/// Memory key of the success counter.
pub(crate) const KEY: &str = "__s_run_times";

/// Limits a callback to `n` successful runs.
///
/// Only `Ok(true)` advances the counter; `Ok(false)` and errors leave it as
/// is. The callback is deregistered once the counter reaches `n`.
pub struct SuccessfullyRunTimes {
    times: u64,
    inner: CallbackRef,
}

impl SuccessfullyRunTimes {
    /// Wraps `inner`.
    pub fn new(times: u64, inner: CallbackRef) -> Self {
        Self { times, inner }
    }

    /// Wraps `inner` and returns a shared handle.
    pub fn arc(times: u64, inner: CallbackRef) -> Arc<Self> {
        Arc::new(Self::new(times, inner))
    }

    /// Number of successful runs recorded in `memory`.
    pub fn count(memory: &Memory) -> u64 {
        memory.counter(KEY)
    }
}

impl Callback for SuccessfullyRunTimes {
    fn call(&self, ctx: &mut CallContext<'_>) -> Result<bool, CallbackError> {
        let out = self.inner.call(ctx);

        let memory = ctx.memory();
        let done = if matches!(out, Ok(true)) {
            memory.bump(KEY)
        } else {
            if !memory.has_counter(KEY) {
                memory.set_counter(KEY, 0);
            }
            memory.counter(KEY)
        };

        if done >= self.times {
            ctx.remove_self();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::CallbackFn;
    use crate::core::lock;
    use crate::decorators::testing::{call, registry_with};

    #[test]
    fn test_only_truthy_calls_count() {
        // true on even seconds
        let cb: CallbackRef =
            SuccessfullyRunTimes::arc(2, CallbackFn::arc(|ctx| Ok(ctx.now() % 2 == 0)));
        let reg = registry_with("x", cb.clone());
        let mut mem = Memory::new();

        call(&reg, "x", 1, &mut mem, &cb).unwrap();
        assert!(mem.has_counter(KEY));
        assert_eq!(SuccessfullyRunTimes::count(&mem), 0);

        call(&reg, "x", 2, &mut mem, &cb).unwrap();
        call(&reg, "x", 3, &mut mem, &cb).unwrap();
        call(&reg, "x", 5, &mut mem, &cb).unwrap();
        assert_eq!(SuccessfullyRunTimes::count(&mem), 1);
        assert!(lock(&reg).contains("x"));

        assert_eq!(call(&reg, "x", 4, &mut mem, &cb), Ok(true));
        assert!(!lock(&reg).contains("x"));
    }

    #[test]
    fn test_errors_do_not_count() {
        let cb: CallbackRef =
            SuccessfullyRunTimes::arc(1, CallbackFn::arc(|_| Err(CallbackError::fail("x"))));
        let reg = registry_with("x", cb.clone());
        let mut mem = Memory::new();

        for t in 0..5 {
            assert!(call(&reg, "x", t, &mut mem, &cb).is_err());
        }
        assert!(lock(&reg).contains("x"));
    }

    #[test]
    fn test_zero_times_removes_on_first_call() {
        let cb: CallbackRef = SuccessfullyRunTimes::arc(0, CallbackFn::arc(|_| Ok(false)));
        let reg = registry_with("x", cb.clone());
        call(&reg, "x", 0, &mut Memory::new(), &cb).unwrap();
        assert!(!lock(&reg).contains("x"));
    }
}
