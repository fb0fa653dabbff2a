//! Deferred one-shot tasks and the application host.
//!
//! Timers are advanced by the same frame loop that advances the
//! simulation, so a scheduled action fires between frames on the caller's
//! thread. Tasks can be cancelled up to the frame they fall due.

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    TerminateApplication,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct PendingTask {
    id: TaskId,
    remaining_s: f64,
    action: DeferredAction,
}

#[derive(Debug, Default)]
pub struct DeferredScheduler {
    next_id: u64,
    pending: Vec<PendingTask>,
}

impl DeferredScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, delay_s: f64, action: DeferredAction) -> TaskId {
        self.next_id += 1;
        let id = TaskId(self.next_id);
        self.pending.push(PendingTask {
            id,
            remaining_s: delay_s.max(0.0),
            action,
        });
        debug!(?id, ?action, delay_s, "deferred task scheduled");
        id
    }

    /// Returns false if the task already fired or was cancelled
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.id != id);
        before != self.pending.len()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.pending.iter().any(|task| task.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn remaining_s(&self, id: TaskId) -> Option<f64> {
        self.pending
            .iter()
            .find(|task| task.id == id)
            .map(|task| task.remaining_s)
    }

    /// Count down every task by `dt` and hand back the ones that fell due,
    /// in scheduling order.
    pub fn advance(&mut self, dt: f64) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        self.pending.retain_mut(|task| {
            task.remaining_s -= dt;
            if task.remaining_s <= 0.0 {
                due.push(task.action);
                false
            } else {
                true
            }
        });
        due
    }
}

/// The process hosting the vignette
pub trait LifecycleHost {
    fn terminate_application(&mut self);
}
