//! Completed-book statistics.
//!
//! Aggregates finished books into the history summary: how many books are
//! done, and how far actual finishes land from the baseline estimates on
//! average. Also provides the early/late display texts.

use crate::Book;

/// Summary over all finished books
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletedSummary {
    pub count: usize,
    /// Mean of signed day variances; negative means early on average
    pub average_days_from_estimate: f64,
}

/// Summarize the finished books in a collection
///
/// Returns `None` when nothing has been finished yet. Variance is always
/// measured against the baseline estimate frozen at creation, never the
/// live projection.
pub fn summarize(books: &[Book]) -> Option<CompletedSummary> {
    let finished: Vec<&Book> = books.iter().filter(|b| b.finished).collect();
    if finished.is_empty() {
        return None;
    }

    let total: i64 = finished.iter().filter_map(|b| b.variance_days()).sum();
    Some(CompletedSummary {
        count: finished.len(),
        average_days_from_estimate: total as f64 / finished.len() as f64,
    })
}

/// Human text for a single book's variance
pub fn variance_text(days: i64) -> String {
    if days < 0 {
        let early = -days;
        format!("{} day{} early", early, if early == 1 { "" } else { "s" })
    } else if days > 0 {
        format!("{} day{} late", days, if days == 1 { "" } else { "s" })
    } else {
        "On time".to_string()
    }
}

/// Human text for the average variance, one decimal place
///
/// Averages within ±0.05 days round to "On time".
pub fn average_text(avg: f64) -> String {
    let formatted = format!("{:.1}", avg.abs());
    if avg < -0.05 {
        format!("{}d early", formatted)
    } else if avg > 0.05 {
        format!("{}d late", formatted)
    } else {
        "On time".to_string()
    }
}
