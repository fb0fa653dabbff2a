//! Single-active-run gate.
//!
//! The registry is the authority on whether a simulation run is in
//! progress. Controllers share it through [`SharedRunRegistry`] and must
//! acquire a run id before starting and release it when the run ends.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run#{}", self.0)
    }
}

pub type SharedRunRegistry = Rc<RefCell<RunRegistry>>;

#[derive(Debug, Default)]
pub struct RunRegistry {
    next_id: u64,
    active: Option<RunId>,
}

impl RunRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            active: None,
        }
    }

    pub fn shared() -> SharedRunRegistry {
        Rc::new(RefCell::new(Self::new()))
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn current(&self) -> Option<RunId> {
        self.active
    }

    /// Issue a fresh run id, or `None` while another run holds the gate
    pub fn try_acquire(&mut self) -> Option<RunId> {
        if let Some(active) = self.active {
            debug!(%active, "run gate busy");
            return None;
        }

        // `Default` leaves next_id at zero; ids start at 1 either way
        let id = RunId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.active = Some(id);
        Some(id)
    }

    /// Release the gate. Returns false if `id` is not the active run.
    pub fn release(&mut self, id: RunId) -> bool {
        if self.active == Some(id) {
            self.active = None;
            true
        } else {
            warn!(%id, active = ?self.active, "release of a run that does not hold the gate");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_is_exclusive() {
        let mut registry = RunRegistry::new();
        let first = registry.try_acquire().unwrap();
        assert!(registry.is_active());
        assert_eq!(registry.current(), Some(first));
        assert_eq!(registry.try_acquire(), None);
    }

    #[test]
    fn test_release_then_new_id() {
        let mut registry = RunRegistry::new();
        let first = registry.try_acquire().unwrap();
        assert!(registry.release(first));
        assert!(!registry.is_active());

        let second = registry.try_acquire().unwrap();
        assert_ne!(first, second);
        assert!(second > first);
    }

    #[test]
    fn test_release_wrong_id_keeps_gate() {
        let mut registry = RunRegistry::new();
        let first = registry.try_acquire().unwrap();
        assert!(!registry.release(RunId(first.0 + 100)));
        assert_eq!(registry.current(), Some(first));
    }

    #[test]
    fn test_default_starts_at_one() {
        let mut registry = RunRegistry::default();
        assert_eq!(registry.try_acquire(), Some(RunId(1)));
    }
}
