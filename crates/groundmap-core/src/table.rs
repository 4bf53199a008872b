//! The grounding table: raw text → curated identifier bundle.
//!
//! Resource format (tab-separated, no header):
//!
//! ```text
//! raw_text  namespace1  id1  namespace2  id2
//! ROS       UP          P00533
//! ```
//!
//! A (namespace, id) pair is dropped when either side is empty or `None`.
//! Rows left with only the raw text are not stored. A row with the wrong
//! number of columns (a blank line has zero) fails the whole load.

use crate::bundle::{is_absent_field, IdentifierBundle, TEXT};
use crate::error::{GroundingError, Result};
use crate::tsv::read_rows;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Columns per table row: the raw text plus two (namespace, id) pairs.
pub const TABLE_COLUMNS: usize = 5;

/// Read-only after construction; share it by reference.
#[derive(Debug, Clone, Default)]
pub struct GroundingTable {
    entries: HashMap<String, IdentifierBundle>,
}

impl GroundingTable {
    /// Build from in-memory rows. Line numbers in errors are 1-based row indices.
    pub fn build<I, R, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for (ix, row) in rows.into_iter().enumerate() {
            let fields: Vec<&str> = row.as_ref().iter().map(|field| field.as_ref()).collect();
            table.insert_row(&fields, "<rows>", ix as u64 + 1)?;
        }
        tracing::debug!(entries = table.len(), "built grounding table");
        Ok(table)
    }

    /// Load a tab-separated table file.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| GroundingError::io(path, e))?;
        Self::from_reader(file, &path.display().to_string())
    }

    /// Parse a tab-separated table from any reader; `origin` labels errors.
    pub fn from_reader<R: Read>(reader: R, origin: &str) -> Result<Self> {
        let mut table = Self::default();
        read_rows(reader, origin, TABLE_COLUMNS, |fields, line| {
            table.insert_row(fields, origin, line)
        })?;
        tracing::debug!(origin, entries = table.len(), "loaded grounding table");
        Ok(table)
    }

    fn insert_row(&mut self, fields: &[&str], origin: &str, line: u64) -> Result<()> {
        if fields.len() != TABLE_COLUMNS {
            return Err(GroundingError::MalformedRow {
                origin: origin.to_string(),
                line,
                expected: TABLE_COLUMNS,
                found: fields.len(),
            });
        }

        let key = fields[0];
        let mut pairs = vec![(TEXT, key)];
        for pair in fields[1..].chunks(2) {
            let (db, db_id) = (pair[0], pair[1]);
            if is_absent_field(db) || is_absent_field(db_id) {
                continue;
            }
            pairs.push((db, db_id));
        }
        let db_refs: IdentifierBundle = pairs.into_iter().collect();

        if db_refs.len() > 1 {
            // Duplicate keys (e.g. "ROS", "ER") are ambiguous; the later row wins.
            if let Some(previous) = self.entries.insert(key.to_string(), db_refs) {
                tracing::warn!(
                    origin,
                    line,
                    key,
                    replaced = %previous,
                    "duplicate grounding table key; keeping the later row"
                );
            }
        }
        Ok(())
    }

    pub fn lookup(&self, raw_text: &str) -> Option<&IdentifierBundle> {
        self.entries.get(raw_text)
    }

    pub fn contains(&self, raw_text: &str) -> bool {
        self.entries.contains_key(raw_text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
