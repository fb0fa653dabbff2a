use super::{SessionEntry, SessionRecorder};
use crate::run_registry::RunId;

/// Keeps every recorder call in order. Used by tests and headless runs.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionRecorder {
    entries: Vec<SessionEntry>,
}

impl MemorySessionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SessionEntry] {
        &self.entries
    }

    pub fn entries_for(&self, run: RunId) -> impl Iterator<Item = &SessionEntry> {
        self.entries.iter().filter(move |e| e.run() == Some(run))
    }

    /// Titles of all event entries, oldest first
    pub fn event_titles(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                SessionEntry::Event { title, .. } => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn finalized_runs(&self) -> Vec<(RunId, i64)> {
        self.entries
            .iter()
            .filter_map(|e| match e {
                SessionEntry::Finalized { run, duration_s } => Some((*run, *duration_s)),
                _ => None,
            })
            .collect()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl SessionRecorder for MemorySessionRecorder {
    fn start_run(&mut self, run: RunId, user_id: u64, name: &str, description: &str, modality: &str) {
        self.entries.push(SessionEntry::RunStarted {
            run,
            user_id,
            name: name.to_string(),
            description: description.to_string(),
            modality: modality.to_string(),
        });
    }

    fn record_event(&mut self, run: Option<RunId>, title: &str, detail: &str, timestamp_s: i64) {
        self.entries.push(SessionEntry::Event {
            run,
            title: title.to_string(),
            detail: detail.to_string(),
            timestamp_s,
        });
    }

    fn record_result(&mut self, run: RunId, label: &str, value: &str, unit: &str) {
        self.entries.push(SessionEntry::Result {
            run,
            label: label.to_string(),
            value: value.to_string(),
            unit: unit.to_string(),
        });
    }

    fn finalize_run(&mut self, run: RunId, duration_s: i64) {
        self.entries
            .push(SessionEntry::Finalized { run, duration_s });
    }
}
