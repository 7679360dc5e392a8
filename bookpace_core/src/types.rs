//! Domain types for the bookpace reading tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Reading cadence (which days count toward the reading rate)
//! - The book record and its lifecycle operations
//!
//! The estimator stays pure; all record mutation happens here, on the
//! caller's owned `Book`.

use crate::estimator;
use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Cadence
// ============================================================================

/// Reading cadence: which calendar days count toward the pages-per-day rate.
///
/// Persisted as a stable numeric code (0 = standard, 1 = work) so stored
/// shelves stay decodable across versions. The code is part of the
/// persisted-state contract.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Cadence {
    /// Every calendar day counts.
    #[default]
    Standard,
    /// Monday through Thursday only.
    Work,
}

impl Cadence {
    /// Stable persistence code for this cadence
    pub fn code(self) -> u8 {
        match self {
            Cadence::Standard => 0,
            Cadence::Work => 1,
        }
    }

    /// Decode a persistence code; unknown codes return `None`
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Cadence::Standard),
            1 => Some(Cadence::Work),
            _ => None,
        }
    }

    /// Display label shown in book lists
    pub fn label(self) -> &'static str {
        match self {
            Cadence::Standard => "Daily",
            Cadence::Work => "Work (Mon-Thu)",
        }
    }
}

impl From<Cadence> for u8 {
    fn from(cadence: Cadence) -> u8 {
        cadence.code()
    }
}

impl TryFrom<u8> for Cadence {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, String> {
        Cadence::from_code(code).ok_or_else(|| format!("unknown cadence code: {}", code))
    }
}

impl FromStr for Cadence {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "daily" | "standard" => Ok(Cadence::Standard),
            "work" | "mon-thu" => Ok(Cadence::Work),
            other => Err(Error::Book(format!("unknown cadence: {}", other))),
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Book record
// ============================================================================

/// Outcome of a progress update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgressOutcome {
    /// Pages recorded, book still in progress
    Updated,
    /// The new page is the last page; the caller decides whether to finish
    ReachedEnd,
}

/// A tracked book.
///
/// `original_estimated_completion` is the baseline: computed once at
/// creation and never touched again, so variance reporting has a fixed
/// reference. `estimated_completion` is the live projection and moves with
/// every progress or rate change. `actual_completion` is stamped exactly
/// once, when the book is finished.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub total_pages: i32,
    pub current_page: i32,
    pub pages_per_day: i32,
    pub cadence: Cadence,
    pub start_date: NaiveDate,
    pub original_estimated_completion: NaiveDate,
    pub estimated_completion: NaiveDate,
    pub actual_completion: Option<NaiveDate>,
    pub finished: bool,
}

impl Book {
    /// Create a book starting today, with both estimates projected from
    /// the full page count.
    pub fn new(
        title: impl Into<String>,
        total_pages: i32,
        pages_per_day: i32,
        cadence: Cadence,
        today: NaiveDate,
    ) -> Self {
        let estimate =
            estimator::estimated_completion_date(total_pages, pages_per_day, cadence, today);
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            total_pages,
            current_page: 0,
            pages_per_day,
            cadence,
            start_date: today,
            original_estimated_completion: estimate,
            estimated_completion: estimate,
            actual_completion: None,
            finished: false,
        }
    }

    /// Pages left to read, floored at zero
    pub fn remaining_pages(&self) -> i32 {
        (self.total_pages - self.current_page).max(0)
    }

    /// Record that the reader is now on `new_page` and refresh the live
    /// estimate from `today`.
    ///
    /// Returns [`ProgressOutcome::ReachedEnd`] when the new page is the
    /// last page; the caller chooses whether to finish the book.
    pub fn set_progress(&mut self, new_page: i32, today: NaiveDate) -> Result<ProgressOutcome> {
        if self.finished {
            return Err(Error::Book(format!("'{}' is already finished", self.title)));
        }
        if new_page < 0 || new_page > self.total_pages {
            return Err(Error::Book(format!(
                "page {} is out of range (book has {} pages)",
                new_page, self.total_pages
            )));
        }

        self.current_page = new_page;
        self.reproject(today);

        if new_page >= self.total_pages {
            Ok(ProgressOutcome::ReachedEnd)
        } else {
            Ok(ProgressOutcome::Updated)
        }
    }

    /// Change the reading rate and refresh the live estimate.
    ///
    /// The baseline estimate is left untouched.
    pub fn set_pages_per_day(&mut self, pages_per_day: i32, today: NaiveDate) -> Result<()> {
        if self.finished {
            return Err(Error::Book(format!("'{}' is already finished", self.title)));
        }
        if pages_per_day <= 0 {
            return Err(Error::Book(format!(
                "pages per day must be positive, got {}",
                pages_per_day
            )));
        }
        self.pages_per_day = pages_per_day;
        self.reproject(today);
        Ok(())
    }

    /// One-way transition to finished.
    ///
    /// Stamps the actual completion date exactly once; finishing an
    /// already-finished book is an error (reopening is unsupported).
    pub fn finish(&mut self, today: NaiveDate) -> Result<()> {
        if self.finished {
            return Err(Error::Book(format!("'{}' is already finished", self.title)));
        }
        self.current_page = self.total_pages;
        self.finished = true;
        self.actual_completion = Some(today);
        Ok(())
    }

    /// Signed days between the baseline estimate and the actual finish.
    ///
    /// `None` until the book is finished. Negative means early.
    pub fn variance_days(&self) -> Option<i64> {
        let actual = self.actual_completion?;
        Some(estimator::days_between(
            self.original_estimated_completion,
            actual,
        ))
    }

    fn reproject(&mut self, today: NaiveDate) {
        self.estimated_completion = estimator::estimated_completion_date(
            self.remaining_pages(),
            self.pages_per_day,
            self.cadence,
            today,
        );
    }
}
