//! Summary statistics over a birthday book.

use crate::book::Book;
use chrono::NaiveDate;

/// Default look-ahead for "upcoming" birthdays, in days.
pub const UPCOMING_WINDOW_DAYS: i64 = 30;

/// An entry whose birthday falls within the upcoming window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upcoming {
    pub name: String,
    pub days: i64,
}

/// Aggregate view of a non-empty book.
#[derive(Debug, Clone, PartialEq)]
pub struct BookStats {
    pub total: usize,
    pub average_age: f64,
    /// Upcoming birthdays in listing order
    pub upcoming: Vec<Upcoming>,
}

impl BookStats {
    /// Compute statistics as of `today`. `None` for an empty book.
    pub fn compute(book: &Book, today: NaiveDate, window_days: i64) -> Option<Self> {
        if book.is_empty() {
            return None;
        }

        let total = book.len();
        let age_sum: i64 = book.records().map(|r| i64::from(r.age_on(today))).sum();

        let upcoming = book
            .records()
            .filter_map(|r| {
                let days = r.days_until_next_birthday_on(today);
                (days <= window_days).then(|| Upcoming {
                    name: r.full_name(),
                    days,
                })
            })
            .collect();

        Some(Self {
            total,
            average_age: age_sum as f64 / total as f64,
            upcoming,
        })
    }
}
