//! Error types for birthday book operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while manipulating or persisting a birthday book.
#[derive(Debug, Error)]
pub enum BookError {
    /// (year, month, day) is not a real calendar date
    #[error("Invalid date: {month}/{day}/{year}")]
    InvalidDate { month: i64, day: i64, year: i64 },

    /// First or last name is empty
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// A numeric argument did not parse as an integer
    #[error("{field} must be an integer, got '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    /// Wrong number of arguments for a command
    #[error("{command} command requires {expected}")]
    ArgumentCount {
        command: &'static str,
        expected: &'static str,
    },

    /// Position is not an integer or lies outside the current listing
    #[error("Invalid entry number: {0}")]
    InvalidIndex(String),

    /// A pending change targets an entry that no longer exists
    #[error("Entry no longer exists in the birthday book")]
    EntryGone,

    /// Load target does not exist
    #[error("File '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    /// First line of a birthday file is not the expected header
    #[error("Invalid file format: {0}")]
    InvalidFormat(String),

    /// Read or write failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for birthday book operations.
pub type Result<T> = std::result::Result<T, BookError>;

/// Why a persisted row could not be turned into a record.
#[derive(Debug, Error)]
pub enum ParseRecordError {
    /// Row is not exactly `name, date`
    #[error("expected 'First Last, M/D/Y', found {0} comma-separated parts")]
    Separator(usize),

    /// Name part is not exactly two whitespace-separated tokens
    #[error("expected first and last name, found {0} name tokens")]
    NameTokens(usize),

    /// Date part is not exactly three `/`-separated fields
    #[error("expected month/day/year, found {0} date fields")]
    DateFields(usize),

    /// A date field is not an integer
    #[error("'{0}' is not an integer")]
    NotAnInteger(String),

    /// Fields parsed but do not form a valid record
    #[error(transparent)]
    Invalid(#[from] BookError),
}
