//! Participant adapters
//!
//! Reply sources that need no model backend: participants and a moderator
//! replaying scripted lines, plus the interrupt signal a front end raises to
//! hand the current turn to the admin.

mod interrupt;
mod moderator;
mod scripted;

pub use interrupt::InterruptSignal;
pub use moderator::ScriptedDecisionBackend;
pub use scripted::ScriptedParticipant;

use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// Lock a script, reading through poisoning left by a panicked holder.
///
/// Script state is a plain queue that stays consistent across a panic, so
/// the data is still usable; the poisoning is reported instead of hidden.
fn lock_script<'a, T>(mutex: &'a Mutex<T>, owner: &str, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!(owner, what, "Lock poisoned by a panicked holder; recovering");
        poisoned.into_inner()
    })
}

