//! The in-memory collection of birthday records.
//!
//! Entries are kept sorted by (month, day) after every insert and are
//! addressed externally by their 1-based position in the current listing.
//! Positions shift whenever the book is re-sorted or an earlier entry is
//! removed, so each entry also carries a stable [`EntryId`]. Destructive
//! changes are two-phase: a [`PendingChange`] is proposed against a position
//! and later committed against the entry's id.

use crate::error::{BookError, Result};
use crate::record::Record;
use tracing::debug;

/// Stable identifier of an entry, never reused within a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(u64);

#[derive(Debug, Clone)]
struct Entry {
    id: EntryId,
    record: Record,
}

/// A change awaiting confirmation.
#[derive(Debug, Clone)]
pub enum PendingChange {
    /// Remove the entry
    Removal { id: EntryId, record: Record },
    /// Replace the entry's record without re-sorting
    Replacement {
        id: EntryId,
        old: Record,
        new: Record,
    },
}

impl PendingChange {
    /// Id of the entry the change applies to.
    pub fn id(&self) -> EntryId {
        match self {
            PendingChange::Removal { id, .. } | PendingChange::Replacement { id, .. } => *id,
        }
    }

    /// The record as it stands in the book before the change.
    pub fn current(&self) -> &Record {
        match self {
            PendingChange::Removal { record, .. } => record,
            PendingChange::Replacement { old, .. } => old,
        }
    }
}

/// Ordered collection of birthday records.
#[derive(Debug, Default)]
pub struct Book {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Book {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in listing order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.entries.iter().map(|e| &e.record)
    }

    /// Records paired with their 1-based positions.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Record)> {
        self.records().enumerate().map(|(i, r)| (i + 1, r))
    }

    /// Record at a 1-based position.
    pub fn get(&self, position: usize) -> Option<&Record> {
        position
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| &e.record)
    }

    /// Append a record and re-sort.
    pub fn insert(&mut self, record: Record) -> EntryId {
        let id = self.push(record);
        self.sort();
        id
    }

    /// Append several records, then re-sort once.
    pub fn extend(&mut self, records: impl IntoIterator<Item = Record>) -> usize {
        let before = self.entries.len();
        for record in records {
            self.push(record);
        }
        self.sort();
        self.entries.len() - before
    }

    /// Turn a user-supplied position token into a 1-based position.
    pub fn resolve(&self, token: &str) -> Result<usize> {
        let position: usize = token
            .trim()
            .parse()
            .map_err(|_| BookError::InvalidIndex(token.to_string()))?;
        if position == 0 || position > self.entries.len() {
            return Err(BookError::InvalidIndex(token.to_string()));
        }
        Ok(position)
    }

    /// Case-insensitive substring match on first or last name.
    pub fn search(&self, term: &str) -> Vec<(usize, &Record)> {
        let needle = term.to_lowercase();
        self.numbered()
            .filter(|(_, r)| {
                r.first_name().to_lowercase().contains(&needle)
                    || r.last_name().to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Propose removing the entry at `position`.
    pub fn propose_removal(&self, position: usize) -> Result<PendingChange> {
        let entry = self.entry_at(position)?;
        Ok(PendingChange::Removal {
            id: entry.id,
            record: entry.record.clone(),
        })
    }

    /// Propose replacing the entry at `position` with `record`.
    pub fn propose_replacement(&self, position: usize, record: Record) -> Result<PendingChange> {
        let entry = self.entry_at(position)?;
        Ok(PendingChange::Replacement {
            id: entry.id,
            old: entry.record.clone(),
            new: record,
        })
    }

    /// Apply a confirmed change. Returns the 1-based position the entry
    /// occupied when the change was applied.
    pub fn commit(&mut self, change: PendingChange) -> Result<usize> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == change.id())
            .ok_or(BookError::EntryGone)?;

        match change {
            PendingChange::Removal { .. } => {
                let removed = self.entries.remove(index);
                debug!(id = ?removed.id, record = %removed.record, "Entry removed");
            }
            PendingChange::Replacement { new, .. } => {
                debug!(id = ?self.entries[index].id, record = %new, "Entry replaced");
                self.entries[index].record = new;
            }
        }

        Ok(index + 1)
    }

    fn entry_at(&self, position: usize) -> Result<&Entry> {
        position
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .ok_or_else(|| BookError::InvalidIndex(position.to_string()))
    }

    fn push(&mut self, record: Record) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, record });
        id
    }

    fn sort(&mut self) {
        // stable: ties keep insertion-relative order
        self.entries.sort_by_key(|e| e.record.calendar_key());
    }
}
