#![warn(missing_docs)]
//! Deterministic testing surfaces (scripted clocks + JSONL event capture).

mod timeline;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use timeline::{Timeline, TimelineEvent};

/// Primary event record captured by headless runs.
#[derive(Debug, Serialize)]
pub struct EventRecord<'a> {
    /// Simulation clock (ms) when the event occurred.
    pub time_ms: f64,
    /// Human-readable kind label ("spawn", "seek", ...).
    pub kind: &'a str,
    /// Free-form payload for smoke tests.
    pub payload: String,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append an event to the log.
    pub fn write(&mut self, event: &EventRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}

/// End-of-run counters persisted for CI artifacts.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    /// Name of the effect the counters describe.
    pub effect: String,
    /// Total particles spawned over the run.
    pub spawned: u64,
    /// Live particles in the final snapshot.
    pub live_at_end: usize,
}

/// Writes run summaries to JSON for CI artifacts.
pub struct SummarySink {
    file: File,
}

impl SummarySink {
    /// Create a sink pointed at the supplied path, creating parent dirs if
    /// needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the provided summaries as pretty JSON.
    pub fn write(&mut self, summaries: &[RunSummary]) -> Result<()> {
        let json = serde_json::to_string_pretty(summaries)?;
        self.file.write_all(json.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(prefix: &str, suffix: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!(
            "{prefix}-{}{suffix}",
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ))
    }

    #[test]
    fn jsonl_sink_writes_one_line_per_event() {
        let path = temp_path("spew-events", ".jsonl");
        let mut sink = JsonlSink::create(&path).expect("sink create");
        sink.write(&EventRecord {
            time_ms: 100.0,
            kind: "spawn",
            payload: "confetti".into(),
        })
        .expect("write succeeds");
        sink.write(&EventRecord {
            time_ms: 150.0,
            kind: "seek",
            payload: "to 50".into(),
        })
        .expect("write succeeds");

        let contents = fs::read_to_string(&path).expect("file readable");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("spawn"));
        assert!(lines[1].contains("seek"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn summary_sink_writes_file() {
        let path = temp_path("spew-summary", ".json");
        let summaries = vec![RunSummary {
            effect: "jet".into(),
            spawned: 42,
            live_at_end: 3,
        }];
        let mut sink = SummarySink::create(&path).expect("sink create");
        sink.write(&summaries).expect("write succeeds");
        let contents = fs::read_to_string(&path).expect("file readable");
        assert!(contents.contains("jet"));
        assert!(contents.contains("spawned"));
        let _ = fs::remove_file(&path);
    }
}
