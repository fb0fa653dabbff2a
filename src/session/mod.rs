//! Session recording: the results-service boundary.
//!
//! Calls are fire-and-forget from the controller's point of view. A
//! recorder that cannot deliver an entry logs the failure and carries on.

pub mod json_lines_recorder;
pub mod memory_recorder;

pub use json_lines_recorder::JsonLinesSessionRecorder;
pub use memory_recorder::MemorySessionRecorder;

use crate::run_registry::RunId;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

pub trait SessionRecorder {
    /// Open a run under an id issued by the run registry
    fn start_run(&mut self, run: RunId, user_id: u64, name: &str, description: &str, modality: &str);

    /// Log a timestamped event. `run` is `None` when no run was active.
    fn record_event(&mut self, run: Option<RunId>, title: &str, detail: &str, timestamp_s: i64);

    fn record_result(&mut self, run: RunId, label: &str, value: &str, unit: &str);

    /// Close a run with its duration in whole seconds
    fn finalize_run(&mut self, run: RunId, duration_s: i64);
}

/// One recorder call, in the shape it is stored or shipped
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEntry {
    RunStarted {
        run: RunId,
        user_id: u64,
        name: String,
        description: String,
        modality: String,
    },
    Event {
        run: Option<RunId>,
        title: String,
        detail: String,
        timestamp_s: i64,
    },
    Result {
        run: RunId,
        label: String,
        value: String,
        unit: String,
    },
    Finalized {
        run: RunId,
        duration_s: i64,
    },
}

impl SessionEntry {
    pub fn run(&self) -> Option<RunId> {
        match self {
            SessionEntry::RunStarted { run, .. }
            | SessionEntry::Result { run, .. }
            | SessionEntry::Finalized { run, .. } => Some(*run),
            SessionEntry::Event { run, .. } => *run,
        }
    }
}

/// Lets a caller keep a handle on a recorder it has given to a controller
impl<T: SessionRecorder> SessionRecorder for Rc<RefCell<T>> {
    fn start_run(&mut self, run: RunId, user_id: u64, name: &str, description: &str, modality: &str) {
        self.borrow_mut()
            .start_run(run, user_id, name, description, modality);
    }

    fn record_event(&mut self, run: Option<RunId>, title: &str, detail: &str, timestamp_s: i64) {
        self.borrow_mut().record_event(run, title, detail, timestamp_s);
    }

    fn record_result(&mut self, run: RunId, label: &str, value: &str, unit: &str) {
        self.borrow_mut().record_result(run, label, value, unit);
    }

    fn finalize_run(&mut self, run: RunId, duration_s: i64) {
        self.borrow_mut().finalize_run(run, duration_s);
    }
}
