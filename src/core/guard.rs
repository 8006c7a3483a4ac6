//! Reentrancy guard for action handlers.
//!
//! Only one action may run at a time on a machine. The guard is taken with a
//! compare-and-swap and released when the returned token is dropped, so a
//! handler that panics still releases it.

use std::sync::atomic::{AtomicBool, Ordering};

/// Flag marking that an action handler (or its change observers) is running.
///
/// # Example
///
/// ```rust
/// use switchyard::core::ReentrancyGuard;
///
/// let guard = ReentrancyGuard::new();
///
/// let token = guard.try_enter().expect("guard is free");
/// assert!(guard.is_held());
/// assert!(guard.try_enter().is_none());
///
/// drop(token);
/// assert!(!guard.is_held());
/// ```
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    running: AtomicBool,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self {
            running: AtomicBool::new(false),
        }
    }

    /// Take the guard, or return `None` if it is already held.
    pub fn try_enter(&self) -> Option<GuardToken<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| GuardToken { guard: self })
    }

    /// Whether the guard is currently held.
    pub fn is_held(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the [`ReentrancyGuard`] on drop.
#[must_use = "the guard is released as soon as the token is dropped"]
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}
