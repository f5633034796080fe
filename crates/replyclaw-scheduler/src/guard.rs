//! Single-slot mutual exclusion for dispatch runs.
//!
//! One compare-and-swap slot with an RAII permit: release happens on drop,
//! so every exit path — success, failure, panic inside the run task —
//! frees the slot. No queueing: a busy slot drops the cycle.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// The single run slot.
#[derive(Debug, Clone, Default)]
pub struct RunGuard {
    busy: Arc<AtomicBool>,
}

impl RunGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot. None while a prior run still holds it.
    pub fn try_acquire(&self) -> Option<RunPermit> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Some(RunPermit {
                busy: Arc::clone(&self.busy),
            })
        } else {
            None
        }
    }

    /// Whether a run currently holds the slot.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Held for the lifetime of one run; releases the slot when dropped.
#[derive(Debug)]
pub struct RunPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let guard = RunGuard::new();
        let permit = guard.try_acquire();
        assert!(permit.is_some());
        assert!(guard.try_acquire().is_none());
        assert!(guard.is_busy());
        drop(permit);
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_release_survives_panic_in_holder() {
        let guard = RunGuard::new();
        let cloned = guard.clone();
        let result = std::panic::catch_unwind(move || {
            let _permit = cloned.try_acquire().unwrap();
            panic!("run blew up");
        });
        assert!(result.is_err());
        assert!(!guard.is_busy());
        assert!(guard.try_acquire().is_some());
    }

    #[test]
    fn test_clones_share_the_slot() {
        let guard = RunGuard::new();
        let other = guard.clone();
        let _permit = guard.try_acquire().unwrap();
        assert!(other.try_acquire().is_none());
    }
}
