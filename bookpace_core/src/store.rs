//! Shelf persistence with file locking.
//!
//! The shelf is the record store for book records. It is saved as a single
//! JSON file with advisory locking so concurrent invocations cannot tear
//! each other's writes.

use crate::{Book, Error, Result};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

/// All tracked books
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Shelf {
    pub books: Vec<Book>,
}

impl Shelf {
    /// Load the shelf from a file with shared locking
    ///
    /// Returns an empty shelf if the file doesn't exist.
    /// If the file is corrupted, logs a warning and returns an empty shelf.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No shelf file found, starting empty");
            return Ok(Self::default());
        }

        let file = match File::open(path) {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(
                    "Unable to open shelf file {:?}: {}. Starting empty.",
                    path,
                    e
                );
                return Ok(Self::default());
            }
        };

        // Acquire shared lock for reading
        if let Err(e) = file.lock_shared() {
            tracing::warn!(
                "Unable to lock shelf file {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(Self::default());
        }

        let mut contents = String::new();
        let mut reader = std::io::BufReader::new(&file);
        if let Err(e) = reader.read_to_string(&mut contents) {
            let _ = file.unlock();
            tracing::warn!(
                "Failed to read shelf file {:?}: {}. Starting empty.",
                path,
                e
            );
            return Ok(Self::default());
        }

        file.unlock()?;

        match serde_json::from_str::<Shelf>(&contents) {
            Ok(shelf) => {
                tracing::debug!("Loaded {} books from {:?}", shelf.books.len(), path);
                Ok(shelf)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to parse shelf file {:?}: {}. Starting empty.",
                    path,
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save the shelf to a file with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file in the same directory
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Temp file must be in the same directory for the rename to be atomic
        let temp = NamedTempFile::new_in(path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "shelf path missing parent")
        })?)?;

        // Exclusive lock serializes concurrent writers
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        // Atomically replace the old shelf file
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} books to {:?}", self.books.len(), path);
        Ok(())
    }

    /// Load the shelf, modify it, and save it back atomically
    pub fn update<F>(path: &Path, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Shelf) -> Result<()>,
    {
        let mut shelf = Self::load(path)?;
        f(&mut shelf)?;
        shelf.save(path)?;
        Ok(shelf)
    }

    pub fn add(&mut self, book: Book) {
        self.books.push(book);
    }

    pub fn get(&self, id: Uuid) -> Option<&Book> {
        self.books.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut Book> {
        self.books.iter_mut().find(|b| b.id == id)
    }

    /// Remove a book by id, returning it if present
    pub fn remove(&mut self, id: Uuid) -> Option<Book> {
        let idx = self.books.iter().position(|b| b.id == id)?;
        Some(self.books.remove(idx))
    }

    /// Find a single book by case-insensitive title match
    ///
    /// Exact matches win; otherwise a unique title prefix is accepted.
    /// No match or an ambiguous prefix is a [`Error::Store`].
    pub fn find_by_title(&self, query: &str) -> Result<&Book> {
        let id = self.resolve_title(query)?;
        self.get(id)
            .ok_or_else(|| Error::Store(format!("no book matching '{}'", query)))
    }

    /// Mutable variant of [`Shelf::find_by_title`]
    pub fn find_by_title_mut(&mut self, query: &str) -> Result<&mut Book> {
        let id = self.resolve_title(query)?;
        self.get_mut(id)
            .ok_or_else(|| Error::Store(format!("no book matching '{}'", query)))
    }

    fn resolve_title(&self, query: &str) -> Result<Uuid> {
        let needle = query.to_lowercase();

        if let Some(book) = self
            .books
            .iter()
            .find(|b| b.title.to_lowercase() == needle)
        {
            return Ok(book.id);
        }

        let matches: Vec<&Book> = self
            .books
            .iter()
            .filter(|b| b.title.to_lowercase().starts_with(&needle))
            .collect();

        match matches.as_slice() {
            [single] => Ok(single.id),
            [] => Err(Error::Store(format!("no book matching '{}'", query))),
            many => Err(Error::Store(format!(
                "'{}' is ambiguous: matches {}",
                query,
                many.iter()
                    .map(|b| b.title.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    /// Books still in progress, oldest start date first
    pub fn reading(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.iter().filter(|b| !b.finished).collect();
        books.sort_by_key(|b| b.start_date);
        books
    }

    /// Finished books, most recently completed first
    pub fn finished(&self) -> Vec<&Book> {
        let mut books: Vec<&Book> = self.books.iter().filter(|b| b.finished).collect();
        books.sort_by(|a, b| b.actual_completion.cmp(&a.actual_completion));
        books
    }
}
