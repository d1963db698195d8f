//! One-shot interrupt flag shared between a front end and participants.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Flag raised by a front end (e.g. on Ctrl+C) and consumed by the first
/// participant that checks it.
#[derive(Debug, Clone, Default)]
pub struct InterruptSignal(Arc<AtomicBool>);

impl InterruptSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the flag.
    ///
    /// Returns `true` if it was already raised and nobody has consumed it
    /// since, i.e. the previous interrupt is still pending.
    pub fn raise(&self) -> bool {
        self.0.swap(true, Ordering::SeqCst)
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Clear the flag, returning whether it was raised.
    pub fn take(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}
