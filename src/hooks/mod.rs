//! Resource hooks: one type per entry operation.
//!
//! ARCHITECTURE
//! ============
//! Every hook takes the shared `AuthSession`, attaches its bearer header to
//! the request, and reports `Result<_, Failure>`. Each carries a busy flag
//! that views read to disable controls; the flag is reset by a drop guard so
//! it clears on success, failure, or an abandoned future alike.
//!
//! The flags are advisory. Nothing stops a second call while one is in
//! flight; the list hook drops stale responses, the mutating hooks are
//! last-write-wins.

pub mod create;
pub mod delete;
pub mod edit;
pub mod list;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

pub use create::CreateRegistro;
pub use delete::DeleteRegistro;
pub use edit::EditRegistro;
pub use list::{ListRegistros, ListState};

/// Shared "call in flight" indicator. True while at least one guarded call
/// is running.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicUsize>);

impl BusyFlag {
    #[must_use]
    pub fn get(&self) -> bool {
        self.0.load(Ordering::SeqCst) > 0
    }

    #[must_use]
    pub fn enter(&self) -> BusyGuard {
        self.0.fetch_add(1, Ordering::SeqCst);
        BusyGuard(self.0.clone())
    }
}

/// Marks its flag busy until dropped.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicUsize>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_sets_and_resets() {
        let flag = BusyFlag::default();
        assert!(!flag.get());
        {
            let _guard = flag.enter();
            assert!(flag.get());
        }
        assert!(!flag.get());
    }

    #[test]
    fn overlapping_guards_stay_busy_until_last_drop() {
        let flag = BusyFlag::default();
        let first = flag.enter();
        let second = flag.enter();
        drop(first);
        assert!(flag.get());
        drop(second);
        assert!(!flag.get());
    }

    #[test]
    fn clones_share_state() {
        let flag = BusyFlag::default();
        let view = flag.clone();
        let _guard = flag.enter();
        assert!(view.get());
    }
}
