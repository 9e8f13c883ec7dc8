//! Lock-free terminal resize notification.
//!
//! The flag is raised from a signal handler (or the event loop) and consumed
//! at the top of the next draw pass. Raising it performs no terminal I/O.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared "terminal was resized" flag.
///
/// Clones share the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct ResizeFlag(Arc<AtomicBool>);

impl ResizeFlag {
    /// A lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the terminal as resized. Safe to call from a signal context.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether a resize is pending.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Consume a pending resize, returning whether one was pending.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::AcqRel)
    }

    /// Raise this flag whenever the process receives `SIGWINCH`.
    ///
    /// # Errors
    ///
    /// Returns the OS error if the handler cannot be installed.
    #[cfg(unix)]
    pub fn register_sigwinch(&self) -> std::io::Result<signal_hook::SigId> {
        signal_hook::flag::register(signal_hook::consts::SIGWINCH, Arc::clone(&self.0))
    }
}
