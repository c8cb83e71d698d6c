//! A single person's birthday.
//!
//! Records are validated on construction and never mutated afterwards. The
//! `Display` form is also the persisted row format, and `FromStr` reads it
//! back.

use crate::error::{BookError, ParseRecordError};
use chrono::{Datelike, Local, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Today's date in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// One person's name and validated birth date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    first_name: String,
    last_name: String,
    month: u32,
    day: u32,
    year: i32,
}

impl Record {
    /// Create a record, failing when the names are unusable or
    /// (year, month, day) is not a real calendar date.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        month: i64,
        day: i64,
        year: i64,
    ) -> Result<Self, BookError> {
        let first_name = validate_name(first_name.into())?;
        let last_name = validate_name(last_name.into())?;

        let invalid = || BookError::InvalidDate { month, day, year };
        let m = u32::try_from(month).map_err(|_| invalid())?;
        let d = u32::try_from(day).map_err(|_| invalid())?;
        let y = i32::try_from(year).map_err(|_| invalid())?;
        NaiveDate::from_ymd_opt(y, m, d).ok_or_else(invalid)?;

        Ok(Self {
            first_name,
            last_name,
            month: m,
            day: d,
            year: y,
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Sort key for the collection: (month, day).
    pub fn calendar_key(&self) -> (u32, u32) {
        (self.month, self.day)
    }

    /// Whole years elapsed between the birth date and `today`.
    ///
    /// Negative for birth dates in the future.
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let mut age = today.year() - self.year;
        if (today.month(), today.day()) < self.calendar_key() {
            age -= 1;
        }
        age
    }

    /// Days from `today` to the next occurrence of the birthday; 0 when
    /// `today` is the birthday.
    ///
    /// A Feb 29 birthday is observed on Mar 1 in non-leap years, so on that
    /// Mar 1 the result is 0 even though (month, day) does not match. That is
    /// the only case where 0 is returned on a different calendar day. In leap
    /// years Mar 1 is the day after the birthday and yields 365.
    pub fn days_until_next_birthday_on(&self, today: NaiveDate) -> i64 {
        let this_year = self.occurrence_in(today.year());
        let next = if this_year < today {
            self.occurrence_in(today.year() + 1)
        } else {
            this_year
        };
        (next - today).num_days()
    }

    /// Age as of the local system date.
    pub fn age(&self) -> i32 {
        self.age_on(today())
    }

    /// Days until the next birthday as of the local system date.
    pub fn days_until_next_birthday(&self) -> i64 {
        self.days_until_next_birthday_on(today())
    }

    fn occurrence_in(&self, year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .or_else(|| NaiveDate::from_ymd_opt(year, 3, 1))
            .unwrap_or(NaiveDate::MAX)
    }
}

/// Names are single tokens; a comma would break the row format.
fn validate_name(name: String) -> Result<String, BookError> {
    if name.is_empty() || name.contains(char::is_whitespace) || name.contains(',') {
        return Err(BookError::InvalidName(name));
    }
    Ok(name)
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {}/{}/{}",
            self.first_name, self.last_name, self.month, self.day, self.year
        )
    }
}

impl FromStr for Record {
    type Err = ParseRecordError;

    fn from_str(row: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = row.split(", ").collect();
        let [name, date] = parts[..] else {
            return Err(ParseRecordError::Separator(parts.len()));
        };

        let names: Vec<&str> = name.split_whitespace().collect();
        let [first, last] = names[..] else {
            return Err(ParseRecordError::NameTokens(names.len()));
        };

        let fields: Vec<&str> = date.split('/').collect();
        let [month, day, year] = fields[..] else {
            return Err(ParseRecordError::DateFields(fields.len()));
        };

        let month = parse_int(month)?;
        let day = parse_int(day)?;
        let year = parse_int(year)?;

        Ok(Record::new(first, last, month, day, year)?)
    }
}

fn parse_int(field: &str) -> Result<i64, ParseRecordError> {
    field
        .trim()
        .parse()
        .map_err(|_| ParseRecordError::NotAnInteger(field.to_string()))
}
