use super::{SessionEntry, SessionRecorder};
use crate::run_registry::RunId;
use std::io::Write;
use tracing::warn;

/// Writes each recorder call as one JSON object per line.
///
/// Write failures are logged and counted, never returned: the results
/// service is best-effort and must not stall the frame loop.
pub struct JsonLinesSessionRecorder<W: Write> {
    writer: W,
    failed_writes: usize,
}

impl<W: Write> JsonLinesSessionRecorder<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed_writes: 0,
        }
    }

    pub fn failed_writes(&self) -> usize {
        self.failed_writes
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_entry(&mut self, entry: &SessionEntry) {
        let result = serde_json::to_writer(&mut self.writer, entry)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"))
            .and_then(|_| self.writer.flush());

        if let Err(e) = result {
            self.failed_writes += 1;
            warn!(error = %e, run = ?entry.run(), "session entry dropped");
        }
    }
}

impl<W: Write> SessionRecorder for JsonLinesSessionRecorder<W> {
    fn start_run(&mut self, run: RunId, user_id: u64, name: &str, description: &str, modality: &str) {
        self.write_entry(&SessionEntry::RunStarted {
            run,
            user_id,
            name: name.to_string(),
            description: description.to_string(),
            modality: modality.to_string(),
        });
    }

    fn record_event(&mut self, run: Option<RunId>, title: &str, detail: &str, timestamp_s: i64) {
        self.write_entry(&SessionEntry::Event {
            run,
            title: title.to_string(),
            detail: detail.to_string(),
            timestamp_s,
        });
    }

    fn record_result(&mut self, run: RunId, label: &str, value: &str, unit: &str) {
        self.write_entry(&SessionEntry::Result {
            run,
            label: label.to_string(),
            value: value.to_string(),
            unit: unit.to_string(),
        });
    }

    fn finalize_run(&mut self, run: RunId, duration_s: i64) {
        self.write_entry(&SessionEntry::Finalized { run, duration_s });
    }
}
