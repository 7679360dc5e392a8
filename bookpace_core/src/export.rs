//! CSV archive of finished books.
//!
//! Rewrites the archive from the current shelf on each export, so the
//! command is idempotent. The file is written atomically (temp file,
//! fsync, rename) like the shelf itself.

use crate::{Book, Error, Result, Shelf};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    title: String,
    total_pages: i32,
    started: String,
    original_estimate: String,
    actual_completion: String,
    days_from_estimate: i64,
}

impl CsvRow {
    /// Build a row for a finished book; in-progress books have no row
    fn for_book(book: &Book) -> Option<Self> {
        let actual = book.actual_completion?;
        let variance = book.variance_days()?;
        Some(CsvRow {
            title: book.title.clone(),
            total_pages: book.total_pages,
            started: book.start_date.to_string(),
            original_estimate: book.original_estimated_completion.to_string(),
            actual_completion: actual.to_string(),
            days_from_estimate: variance,
        })
    }
}

/// Write all finished books to the CSV archive
///
/// Returns the number of rows written. The previous archive contents are
/// replaced, not appended to, so repeated exports never duplicate rows.
pub fn export_finished(shelf: &Shelf, csv_path: &Path) -> Result<usize> {
    let rows: Vec<CsvRow> = shelf
        .finished()
        .into_iter()
        .filter_map(CsvRow::for_book)
        .collect();

    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp = NamedTempFile::new_in(csv_path.parent().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::Other, "archive path missing parent")
    })?)?;

    let mut writer = csv::Writer::from_writer(temp.as_file());
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    drop(writer);

    // Sync before the rename so a crash cannot leave a torn archive
    temp.as_file().sync_all()?;
    temp.persist(csv_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Wrote {} finished books to {:?}", rows.len(), csv_path);
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cadence;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_export_only_finished_books() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("completed.csv");

        let mut shelf = Shelf::default();
        shelf.add(Book::new("Reading", 300, 10, Cadence::Standard, date(2024, 1, 1)));

        let mut done = Book::new("Done", 100, 10, Cadence::Standard, date(2024, 1, 1));
        done.finish(date(2024, 1, 8)).unwrap();
        shelf.add(done);

        let count = export_finished(&shelf, &csv_path).unwrap();
        assert_eq!(count, 1);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.contains("Done"));
        assert!(!contents.contains("Reading"));
        // Estimate was 2024-01-11; finished the 8th, 3 days early
        assert!(contents.contains("-3"));
    }

    #[test]
    fn test_export_is_idempotent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("completed.csv");

        let mut shelf = Shelf::default();
        let mut done = Book::new("Done", 100, 10, Cadence::Standard, date(2024, 1, 1));
        done.finish(date(2024, 1, 11)).unwrap();
        shelf.add(done);

        export_finished(&shelf, &csv_path).unwrap();
        export_finished(&shelf, &csv_path).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let data_lines = contents.lines().filter(|l| l.contains("Done")).count();
        assert_eq!(data_lines, 1);
    }

    #[test]
    fn test_export_empty_shelf_creates_empty_archive() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("completed.csv");

        let count = export_finished(&Shelf::default(), &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(contents.trim().is_empty());
    }
}
