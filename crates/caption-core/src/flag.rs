//! Self-clearing UI flags.
//!
//! A [`TransientFlag`] is raised by a user-visible event (caption copied,
//! feedback sent) and lowers itself after a fixed delay. The lowering runs as
//! a tokio task bound to a [`TimerScope`]; dropping the scope cancels every
//! pending task, so nothing touches the flag after its owner is gone.

use crate::{CaptionError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::trace;

/// Lifetime of the timers spawned by one component.
#[derive(Debug)]
pub struct TimerScope {
    token: CancellationToken,
    _guard: DropGuard,
}

impl TimerScope {
    pub fn new() -> Self {
        let token = CancellationToken::new();
        let guard = token.clone().drop_guard();
        Self {
            token,
            _guard: guard,
        }
    }

    /// Create a lowered flag whose timers die with this scope.
    pub fn flag(&self, name: &'static str) -> TransientFlag {
        TransientFlag {
            name,
            raised: Arc::new(AtomicBool::new(false)),
            cancel: self.token.clone(),
        }
    }
}

impl Default for TimerScope {
    fn default() -> Self {
        Self::new()
    }
}

/// Runtime that flag timers are spawned on.
pub fn timer_runtime() -> Result<Handle> {
    Handle::try_current().map_err(|e| {
        CaptionError::ConfigError(format!("transient flags need a tokio runtime: {}", e))
    })
}

/// A boolean that reverts to `false` a fixed time after being raised.
#[derive(Debug, Clone)]
pub struct TransientFlag {
    name: &'static str,
    raised: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl TransientFlag {
    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    pub fn lower(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }

    /// Raise the flag and schedule it to lower after `delay`.
    ///
    /// Each call schedules its own timer. A later raise does not postpone an
    /// earlier timer. Outside a tokio runtime the flag is left untouched and
    /// an error is returned.
    pub fn raise_for(&self, delay: Duration) -> Result<()> {
        self.raise_on(&timer_runtime()?, delay);
        Ok(())
    }

    /// Like [`raise_for`](Self::raise_for), spawning the timer on `handle`.
    pub fn raise_on(&self, handle: &Handle, delay: Duration) {
        self.raised.store(true, Ordering::SeqCst);

        let raised = Arc::clone(&self.raised);
        let cancel = self.cancel.clone();
        let name = self.name;
        handle.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    trace!(flag = name, "timer cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    raised.store(false, Ordering::SeqCst);
                    trace!(flag = name, "flag lowered");
                }
            }
        });
    }
}
