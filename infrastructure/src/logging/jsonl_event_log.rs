//! JSONL file writer for stream events.
//!
//! Each [`StreamEvent`] is serialized as a single JSON line (its own `type`
//! tag plus a `timestamp`) and appended to the file via a buffered writer.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tandem_application::EventSink;
use tandem_domain::StreamEvent;
use tracing::warn;

/// Event log that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every terminal
/// event and on `Drop`.
pub struct JsonlEventLog {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventLog {
    /// Open (or create) the log at `path` for appending.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &StreamEvent) -> Option<serde_json::Value> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        match serde_json::to_value(event).ok()? {
            serde_json::Value::Object(mut map) => {
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp),
                );
                Some(serde_json::Value::Object(map))
            }
            other => Some(serde_json::json!({
                "type": event.kind(),
                "timestamp": timestamp,
                "data": other,
            })),
        }
    }
}

impl EventSink for JsonlEventLog {
    fn emit(&self, event: &StreamEvent) {
        let Some(record) = Self::record(event) else {
            return;
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            if let Err(e) = writeln!(writer, "{}", line) {
                warn!("Could not write to event log {}: {}", self.path.display(), e);
                return;
            }
            if event.is_terminal() {
                let _ = writer.flush();
            }
        }
    }
}

impl Drop for JsonlEventLog {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tandem_domain::{Completion, Diff};

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_line_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.events.jsonl");
        let log = JsonlEventLog::open(&path).unwrap();

        log.emit(&StreamEvent::RoundStart {
            round: 1,
            provider_id: "p1".to_string(),
        });
        log.emit(&StreamEvent::RoundResult {
            round: 1,
            provider_id: "p1".to_string(),
            result: Completion::new("p1", "m", "hello", 12),
        });
        log.emit(&StreamEvent::Diff {
            round: 2,
            diff: Diff::between("a b", "a c"),
        });
        log.emit(&StreamEvent::Error {
            error: "boom".to_string(),
        });
        drop(log);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| l.get("timestamp").is_some()));
        assert_eq!(lines[0]["type"], "round_start");
        assert_eq!(lines[1]["result"]["text"], "hello");
        assert_eq!(lines[2]["type"], "diff");
        assert_eq!(lines[3]["error"], "boom");
    }

    #[test]
    fn test_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("events.jsonl");

        for _ in 0..2 {
            let log = JsonlEventLog::open(&path).unwrap();
            log.emit(&StreamEvent::Error {
                error: "x".to_string(),
            });
        }

        assert_eq!(read_lines(&path).len(), 2);
    }

    #[test]
    fn test_open_fails_on_directory_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlEventLog::open(dir.path()).is_none());
    }
}
