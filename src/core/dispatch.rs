//! # Dispatch one pass: invoke every callback due at a given time.
//!
//! - **Snapshot** the due ids before the first invocation
//! - **Invoke** each with its private memory, lock released
//! - **Contain** errors and panics, forwarding them to the processors
//!
//! ## Flow
//!
//! ```text
//! lock registry → due_callbacks(now).collect() → unlock          (snapshot)
//! for id in snapshot:
//!   lock → checkout(id) → unlock
//!     └─ None (removed earlier in this pass) → skip
//!   callback.call(ctx)   (catch_unwind)
//!     ├─ Ok(_)      → nothing to report
//!     ├─ Err(e)     → processors.emit(CallbackFailed{e})
//!     └─ panic      → processors.emit(CallbackFailed{Panicked})
//!   lock → checkin(id, memory) → unlock
//! ```
//!
//! ## Rules
//! - Callbacks may remove any id (including their own) or everything; the
//!   snapshot is never invalidated, ids gone by their turn are skipped.
//! - An id listed twice in the snapshot is invoked twice.

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;

use tracing::trace;

use crate::callbacks::{CallContext, CallbackId};
use crate::core::registry::{lock, Registry};
use crate::error::CallbackError;
use crate::events::Event;
use crate::processors::ProcessorSet;

/// Renders a panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Invokes every callback due at `now`; returns the snapshot of due ids.
pub(crate) fn dispatch(
    registry: &Mutex<Registry>,
    processors: &ProcessorSet,
    now: u64,
) -> Vec<CallbackId> {
    let due: Vec<CallbackId> = lock(registry).due_callbacks(now).cloned().collect();

    for id in &due {
        let Some(mut checkout) = lock(registry).checkout(id) else {
            trace!(callback = %id, time = now, "skipping removed callback");
            continue;
        };

        let res = {
            let mut ctx = CallContext::new(id, now, &mut checkout.memory, registry);
            catch_unwind(AssertUnwindSafe(|| checkout.callback.call(&mut ctx)))
        };

        let failure = match res {
            Ok(Ok(_)) => None,
            Ok(Err(e)) => Some(e),
            Err(payload) => Some(CallbackError::Panicked {
                info: panic_message(payload.as_ref()),
            }),
        };

        lock(registry).checkin(id, checkout.generation, checkout.memory);

        if let Some(err) = failure {
            processors.emit(&Event::callback_failed(id, now, err));
        }
    }

    due
}
