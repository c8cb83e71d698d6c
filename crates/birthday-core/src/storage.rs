//! Plain-text persistence for birthday books.
//!
//! ```text
//! List of Birthdays!
//! First Last, M/D/Y
//! ```
//!
//! Loading is partial-failure: a malformed row is reported as a
//! [`LineWarning`] and skipped, it never aborts the load.

use crate::error::{BookError, Result};
use crate::record::Record;
use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Required first line of every birthday file.
pub const HEADER: &str = "List of Birthdays!";

/// A row that was skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineWarning {
    /// 1-based line number within the file
    pub line_number: usize,
    /// The row as it appeared, trimmed
    pub line: String,
    /// Why it could not be parsed
    pub reason: String,
}

impl fmt::Display for LineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {} ({})", self.line_number, self.line, self.reason)
    }
}

/// Outcome of reading a birthday file.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Records parsed, in file order
    pub records: Vec<Record>,
    /// Rows that were skipped
    pub warnings: Vec<LineWarning>,
}

/// Write the header and one rendered row per record.
pub fn write_records<'a, W: Write>(
    mut out: W,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<()> {
    writeln!(out, "{}", HEADER)?;
    for record in records {
        writeln!(out, "{}", record)?;
    }
    out.flush()?;
    Ok(())
}

/// Read a birthday file from any buffered reader.
///
/// Lines are read as bytes, so a row that is not UTF-8 becomes a warning
/// like any other malformed row.
pub fn read_records<R: BufRead>(input: R) -> Result<LoadReport> {
    let mut lines = input.split(b'\n');

    let header = lines.next().transpose()?.unwrap_or_default();
    let header = String::from_utf8_lossy(&header);
    let header = header.trim_end_matches('\r');
    if header != HEADER {
        return Err(BookError::InvalidFormat(format!(
            "expected header '{}', found '{}'",
            HEADER, header
        )));
    }

    let mut report = LoadReport::default();
    for (index, raw) in lines.enumerate() {
        let raw = raw?;
        let line_number = index + 2;

        let parsed = match std::str::from_utf8(&raw) {
            Ok(line) => {
                let row = line.trim();
                if row.is_empty() {
                    continue;
                }
                row.parse::<Record>()
                    .map_err(|e| (row.to_string(), e.to_string()))
            }
            Err(_) => Err((
                String::from_utf8_lossy(&raw).trim().to_string(),
                "not valid UTF-8".to_string(),
            )),
        };

        match parsed {
            Ok(record) => report.records.push(record),
            Err((line, reason)) => {
                let warning = LineWarning {
                    line_number,
                    line,
                    reason,
                };
                debug!(%warning, "Skipping invalid row");
                report.warnings.push(warning);
            }
        }
    }

    Ok(report)
}

/// Save records to `path`, replacing any existing file.
///
/// Rows go to a temp file beside the real target which is then renamed over
/// it. A symlinked `path` is followed, so the link survives and the file it
/// points at is updated, keeping its permissions. When no temp file can be
/// created next to the target, the target is truncated and written directly.
pub fn save<'a>(path: &Path, records: impl IntoIterator<Item = &'a Record>) -> Result<()> {
    let target = if path.exists() {
        fs::canonicalize(path)?
    } else {
        path.to_path_buf()
    };
    let existing = fs::metadata(&target).ok().map(|m| m.permissions());

    let file_name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = target.with_file_name(format!(".{}.tmp", file_name));

    let temp = match File::create(&temp_path) {
        Ok(file) => file,
        Err(e) => {
            debug!(path = ?temp_path, "Cannot create temp file, writing in place: {}", e);
            write_records(BufWriter::new(File::create(&target)?), records)?;
            info!(path = ?target, "Saved birthday book");
            return Ok(());
        }
    };

    let written = write_records(BufWriter::new(temp), records).and_then(|()| {
        if let Some(permissions) = existing {
            fs::set_permissions(&temp_path, permissions)?;
        }
        fs::rename(&temp_path, &target)?;
        Ok(())
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }

    info!(path = ?target, "Saved birthday book");
    Ok(())
}

/// Load records from `path`.
pub fn load(path: &Path) -> Result<LoadReport> {
    if !path.exists() {
        return Err(BookError::FileNotFound(path.to_path_buf()));
    }

    let file = File::open(path)?;
    let report = read_records(BufReader::new(file))?;

    debug!(
        path = ?path,
        loaded = report.records.len(),
        skipped = report.warnings.len(),
        "Loaded birthday file"
    );

    Ok(report)
}
