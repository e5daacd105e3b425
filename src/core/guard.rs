//! Guard conditions for controlling state transitions.
//!
//! Guards are boolean closures polled by the transition manager. They take
//! no arguments: whatever game state they depend on is captured when the
//! transition is declared.

use std::fmt;
use std::sync::Arc;

/// Condition that decides whether a transition may fire.
///
/// A guard may read mutable game state through whatever it captured, so two
/// checks in a row can disagree. Checking never mutates the machine.
///
/// # Example
///
/// ```rust
/// use combat_fsm::core::Guard;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let stunned = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&stunned);
/// let guard = Guard::new(move || flag.load(Ordering::Relaxed));
///
/// assert!(!guard.check());
/// stunned.store(true, Ordering::Relaxed);
/// assert!(guard.check());
/// ```
#[derive(Clone)]
pub struct Guard {
    predicate: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a predicate closure.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that always passes.
    pub fn always() -> Self {
        Guard::new(|| true)
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

impl<F> From<F> for Guard
where
    F: Fn() -> bool + Send + Sync + 'static,
{
    fn from(predicate: F) -> Self {
        Guard::new(predicate)
    }
}
