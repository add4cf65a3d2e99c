//! Cooperative cancellation, shared by every long-running migration step.
//! Spec.md §5: "workers MUST probe the session's abort flag (a) at the top
//! of the per-table loop and (b) at the top of the per-channel loop."

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A flag transfer/sync workers poll between suspension points. Cheap to
/// clone and share across the worker pool of one migration.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled_and_latches_once_set() {
        let flag = CancelFlag::new();
        assert!(!flag.is_cancelled());
        flag.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn clones_share_the_same_underlying_flag() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
    }
}
