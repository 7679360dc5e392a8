//! Completion-date estimation and variance math.
//!
//! This is the calculation heart of bookpace: given the pages left in a
//! book and a reading cadence, project the calendar date the book will be
//! finished, and report how far an actual finish landed from an estimate.
//!
//! Both functions are pure and total. Degenerate inputs (nothing left to
//! read, or a non-positive rate) fall back to the start date rather than
//! erroring. The functions never read the system clock; callers resolve
//! "today" in their own timezone and pass it in, so results are
//! reproducible.

use crate::types::Cadence;
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Weekday};

/// Number of reading days needed to get through the remaining pages.
///
/// Integer ceiling division: a partial day's worth of reading still
/// consumes a full day. Returns 0 for non-positive pages or rate.
pub fn reading_days_needed(remaining_pages: i32, pages_per_day: i32) -> i64 {
    if remaining_pages <= 0 || pages_per_day <= 0 {
        return 0;
    }
    let pages = remaining_pages as i64;
    let rate = pages_per_day as i64;
    (pages + rate - 1) / rate
}

/// Project the date the remaining pages will be finished.
///
/// Returns `start` unchanged when there is nothing left to read or the
/// rate is non-positive. Projections past the end of chrono's supported
/// calendar clamp to [`NaiveDate::MAX`] instead of panicking, keeping the
/// function total over the whole integer input range.
///
/// For [`Cadence::Work`] only Monday through Thursday count as reading
/// days. Full weeks are added as whole calendar weeks (every 7-day span
/// holds exactly 4 qualifying days, so the shortcut is exact), then the
/// remainder is walked one day at a time until enough Mon-Thu days have
/// been counted. With a non-zero remainder the result always lands on a
/// Mon-Thu day.
pub fn estimated_completion_date(
    remaining_pages: i32,
    pages_per_day: i32,
    cadence: Cadence,
    start: NaiveDate,
) -> NaiveDate {
    let needed = reading_days_needed(remaining_pages, pages_per_day);
    if needed == 0 {
        return start;
    }

    match cadence {
        Cadence::Standard => add_days_saturating(start, needed),

        Cadence::Work => {
            let full_weeks = needed / 4;
            let remainder = needed % 4;

            let mut date = add_days_saturating(start, full_weeks * 7);

            // At most 3 iterations of qualifying days remain; the range
            // check keeps the walk finite once the calendar is exhausted
            let mut counted = 0;
            while counted < remainder && date < NaiveDate::MAX {
                date = add_days_saturating(date, 1);
                if is_reading_weekday(date) {
                    counted += 1;
                }
            }

            date
        }
    }
}

fn add_days_saturating(date: NaiveDate, days: i64) -> NaiveDate {
    date.checked_add_signed(Duration::days(days))
        .unwrap_or(NaiveDate::MAX)
}

fn is_reading_weekday(date: NaiveDate) -> bool {
    matches!(
        date.weekday(),
        Weekday::Mon | Weekday::Tue | Weekday::Wed | Weekday::Thu
    )
}

/// Signed whole-day difference between an estimate and the actual finish.
///
/// Both instants are truncated to their calendar day in `Tz` before
/// differencing, so time-of-day never affects the result. Negative means
/// finished early, positive means late, zero means on time.
pub fn days_from_estimate<Tz: TimeZone>(estimated: &DateTime<Tz>, actual: &DateTime<Tz>) -> i64 {
    days_between(estimated.date_naive(), actual.date_naive())
}

/// Day-granularity variance between two calendar dates
/// (`actual - estimated`, in whole days).
pub fn days_between(estimated: NaiveDate, actual: NaiveDate) -> i64 {
    actual.signed_duration_since(estimated).num_days()
}
