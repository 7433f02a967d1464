//! JSONL file writer for discussion transcripts.
//!
//! Each [`TranscriptEvent`] becomes one JSON line carrying `type`, `seq`
//! and `timestamp` next to the event payload.

use jury_application::{TranscriptEvent, TranscriptLogger};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex`. Every line is flushed as it is written.
pub struct JsonlTranscriptLogger {
    state: Mutex<WriterState>,
    path: PathBuf,
}

struct WriterState {
    writer: BufWriter<File>,
    seq: u64,
    failed: bool,
}

impl JsonlTranscriptLogger {
    /// Create (or truncate) the transcript file, creating parent directories.
    pub fn create(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;

        Ok(Self {
            state: Mutex::new(WriterState {
                writer: BufWriter::new(file),
                seq: 0,
                failed: false,
            }),
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: TranscriptEvent, seq: u64) -> Value {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = Map::new();
        record.insert("type".to_string(), Value::String(event.event_type.to_string()));
        record.insert("seq".to_string(), Value::from(seq));
        record.insert("timestamp".to_string(), Value::String(timestamp));
        match event.payload {
            Value::Object(payload) => record.extend(payload),
            Value::Null => {}
            other => {
                record.insert("data".to_string(), other);
            }
        }
        Value::Object(record)
    }
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, event: TranscriptEvent) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if state.failed {
            return;
        }

        let record = Self::record(event, state.seq);
        state.seq += 1;

        let result = write_line(&mut state.writer, &record);

        // Report once, then stay quiet for the rest of the run
        if let Err(e) = result {
            state.failed = true;
            warn!("Transcript writes to {} failed: {}", self.path.display(), e);
        }
    }
}

fn write_line(writer: &mut BufWriter<File>, record: &Value) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            let _ = state.writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_object_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("discussion.jsonl");
        let logger = JsonlTranscriptLogger::create(&path).unwrap();

        logger.log(TranscriptEvent::new(
            "message",
            json!({"index": 0, "role": "system", "author": null, "content": "case"}),
        ));
        logger.log(TranscriptEvent::new(
            "phase",
            json!({"phase": "in_round", "round": 1}),
        ));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "message");
        assert_eq!(lines[0]["seq"], 0);
        assert_eq!(lines[0]["content"], "case");
        assert!(lines[0]["timestamp"].as_str().unwrap().ends_with('Z'));
        assert_eq!(lines[1]["type"], "phase");
        assert_eq!(lines[1]["seq"], 1);
        assert_eq!(lines[1]["round"], 1);
    }

    #[test]
    fn test_non_object_payload_goes_under_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.jsonl");
        let logger = JsonlTranscriptLogger::create(&path).unwrap();

        logger.log(TranscriptEvent::new("note", json!("just a string")));
        logger.log(TranscriptEvent::new("empty", Value::Null));
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines[0]["data"], "just a string");
        assert!(lines[1].get("data").is_none());
    }

    #[test]
    fn test_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("2026").join("case.jsonl");
        let logger = JsonlTranscriptLogger::create(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_create_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        assert!(JsonlTranscriptLogger::create(blocker.join("t.jsonl")).is_err());
    }
}
