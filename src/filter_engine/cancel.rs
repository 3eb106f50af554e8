//! Cooperative cancellation
//!
//! A run observes its token at three checkpoints: before spawning each
//! worker, before each blocking receive, and before each region on the
//! sequential path. Cancellation never preempts a running filter; workers
//! that already started always run to completion and are joined.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::filter_engine::common::{EngineError, Result};

/// Shared cancellation flag, passed by reference to every component that
/// must observe it.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent; repeated calls have no further
    /// effect.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

static SIGINT_TOKEN: OnceLock<CancelToken> = OnceLock::new();

extern "C" fn on_sigint(_signum: libc::c_int) {
    // Only an atomic load and store here: both are async-signal-safe.
    if let Some(token) = SIGINT_TOKEN.get() {
        token.cancel();
    }
}

/// Route SIGINT to `token` so an interrupt becomes an orderly early
/// termination. May be installed once per process.
pub fn hook_sigint(token: &CancelToken) -> Result<()> {
    SIGINT_TOKEN
        .set(token.clone())
        .map_err(|_| EngineError::HookInstalled)?;

    let handler = on_sigint as extern "C" fn(libc::c_int);
    unsafe {
        libc::signal(libc::SIGINT, handler as libc::sighandler_t);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_clear_and_cancels_idempotently() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let observer = token.clone();
        token.cancel();
        assert!(observer.is_cancelled());
    }
}
