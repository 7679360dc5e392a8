//! Append-only progress event log.
//!
//! Every create/update/finish appends one event to a JSONL (JSON Lines)
//! file with file locking, giving a durable history of how each book's
//! projection moved over time.

use crate::{Book, Result};
use chrono::{DateTime, NaiveDate, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// A recorded progress event
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub id: Uuid,
    pub book_id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub page: i32,
    pub estimated_completion: NaiveDate,
}

impl ProgressEvent {
    /// Snapshot the book's current position and projection
    pub fn record(book: &Book, recorded_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            book_id: book.id,
            recorded_at,
            page: book.current_page,
            estimated_completion: book.estimated_completion,
        }
    }
}

/// Event sink trait for persisting progress events
pub trait EventSink {
    fn append(&mut self, event: &ProgressEvent) -> Result<()>;
}

/// JSONL-based event sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl EventSink for JsonlSink {
    fn append(&mut self, event: &ProgressEvent) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;

        file.unlock()?;

        tracing::debug!("Appended event {} to progress log", event.id);
        Ok(())
    }
}

/// Read all events from a progress log file
///
/// Unparseable lines are skipped with a warning so a single bad write
/// never hides the rest of the history.
pub fn read_events(path: &Path) -> Result<Vec<ProgressEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ProgressEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse event at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} events from progress log", events.len());
    Ok(events)
}
