//! Birthday Book Core
//!
//! Validated birthday records, the sorted collection that holds them, the
//! plain-text file format, summary statistics and configuration.

pub mod book;
mod config;
mod error;
pub mod record;
pub mod stats;
pub mod storage;

pub use book::{Book, EntryId, PendingChange};
pub use config::{default_config_dir, BookConfig};
pub use error::{BookError, ParseRecordError, Result};
pub use record::Record;
pub use stats::{BookStats, Upcoming, UPCOMING_WINDOW_DAYS};
pub use storage::{LineWarning, LoadReport, HEADER};
