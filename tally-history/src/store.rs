//! History store
//!
//! The in-memory sequence is the source of truth for a session. The CSV
//! file is only touched by explicit `save`, `load` and `delete` calls.

use crate::HistoryError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tally_core::{Calculation, Number, Operation};
use tracing::{debug, error, info, warn};

/// Column layout of the backing file
pub const HEADER: [&str; 4] = ["a", "b", "operation", "result"];

/// One serialized calculation. Two rows are duplicates iff all four fields match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
struct HistoryRow {
    a: String,
    b: String,
    operation: String,
    result: String,
}

impl HistoryRow {
    fn from_calculation(calc: &Calculation) -> Result<Self, HistoryError> {
        let result = calc.perform().map_err(|source| HistoryError::Unperformable {
            record: calc.to_string(),
            source,
        })?;
        Ok(Self {
            a: calc.a().to_string(),
            b: calc.b().to_string(),
            operation: calc.operation().name().to_string(),
            result: result.to_string(),
        })
    }

    /// Canonical spelling of a row read from disk, so `2.50` matches `2.5`.
    /// Fields that do not parse are kept as written.
    fn normalized(self) -> Self {
        let canonical = |text: String| Number::from_str(&text).map(|n| n.to_string()).unwrap_or(text);
        Self {
            a: canonical(self.a),
            b: canonical(self.b),
            operation: self.operation
                .parse::<Operation>()
                .map(|op| op.name().to_string())
                .unwrap_or(self.operation),
            result: canonical(self.result),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// History was explicitly cleared; the file was left untouched
    Skipped,
    Written { rows: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed,
    NotFound,
}

/// Ordered, append-only calculation history with CSV persistence
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    records: Vec<Calculation>,
    cleared: bool,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            records: Vec::new(),
            cleared: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when `clear()` ran and nothing was added since
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }

    pub fn add(&mut self, record: Calculation) {
        debug!(record = %record, "history append");
        self.records.push(record);
        self.cleared = false;
    }

    pub fn get_all(&self) -> &[Calculation] {
        &self.records
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.cleared = true;
        info!("Cleared the current instance history");
    }

    pub fn latest(&self) -> Option<&Calculation> {
        self.records.last()
    }

    pub fn find_by_operation(&self, name: &str) -> Vec<&Calculation> {
        let wanted = name.trim();
        self.records
            .iter()
            .filter(|calc| calc.operation().name().eq_ignore_ascii_case(wanted))
            .collect()
    }

    /// Merge the in-memory history into the backing file.
    ///
    /// Existing rows keep their order, new rows follow, exact duplicates are
    /// dropped keeping the first occurrence.
    pub fn save(&self) -> Result<SaveOutcome, HistoryError> {
        if self.cleared {
            info!(path = %self.path.display(), "History was cleared, skipping save");
            return Ok(SaveOutcome::Skipped);
        }

        let mut rows = self.existing_rows();
        for calc in &self.records {
            rows.push(HistoryRow::from_calculation(calc)?);
        }

        let mut seen = HashSet::with_capacity(rows.len());
        rows.retain(|row| seen.insert(row.clone()));

        self.write_rows(&rows)?;
        info!(path = %self.path.display(), rows = rows.len(), "Saved current instance history to CSV file");
        Ok(SaveOutcome::Written { rows: rows.len() })
    }

    /// Replace the in-memory history with the file contents.
    ///
    /// A missing or empty file yields an empty history. Rows naming an
    /// unknown operation, or that cannot be performed, are skipped. Any other
    /// failure resets history to empty and is returned for reporting.
    pub fn load(&mut self) -> Result<usize, HistoryError> {
        if !self.has_content() {
            self.records.clear();
            info!(path = %self.path.display(), "No existing history to load from CSV file");
            return Ok(0);
        }

        match self.read_records() {
            Ok(records) => {
                self.records = records;
                info!(path = %self.path.display(), records = self.records.len(), "Loaded history from CSV file");
                Ok(self.records.len())
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to load history");
                self.records.clear();
                Err(e)
            }
        }
    }

    /// Remove the backing file and clear in-memory history.
    ///
    /// A missing file is reported as `NotFound`; memory is cleared either way.
    /// On any other I/O failure the in-memory history is left as is.
    pub fn delete(&mut self) -> Result<DeleteOutcome, HistoryError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!(path = %self.path.display(), "Deleted history CSV file");
                self.clear();
                Ok(DeleteOutcome::Removed)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %self.path.display(), "No history file found to delete");
                self.clear();
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Failed to delete history");
                Err(HistoryError::io(&self.path, e))
            }
        }
    }

    // ========== File helpers ==========

    fn has_content(&self) -> bool {
        fs::metadata(&self.path).map(|m| m.len() > 0).unwrap_or(false)
    }

    /// Rows already on disk. Missing, empty or unreadable files count as absent.
    fn existing_rows(&self) -> Vec<HistoryRow> {
        if !self.has_content() {
            return Vec::new();
        }
        match self.read_rows() {
            Ok(rows) => rows.into_iter().map(HistoryRow::normalized).collect(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring unreadable history file");
                Vec::new()
            }
        }
    }

    fn read_rows(&self) -> Result<Vec<HistoryRow>, HistoryError> {
        let file = File::open(&self.path).map_err(|e| HistoryError::io(&self.path, e))?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let headers = reader.headers()?;
        if headers.iter().ne(HEADER.iter().copied()) {
            return Err(HistoryError::Row {
                line: 1,
                reason: format!("expected header {}, found {}", HEADER.join(","), headers.iter().collect::<Vec<_>>().join(",")),
            });
        }

        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    fn read_records(&self) -> Result<Vec<Calculation>, HistoryError> {
        let rows = self.read_rows()?;
        let mut records = Vec::with_capacity(rows.len());

        for (idx, row) in rows.into_iter().enumerate() {
            // +2: one for the header, one for 1-based numbering
            let line = idx + 2;
            let a = parse_operand(&row.a, line)?;
            let b = parse_operand(&row.b, line)?;

            let operation: Operation = match row.operation.parse() {
                Ok(op) => op,
                Err(e) => {
                    warn!(line, error = %e, "Skipping history row");
                    continue;
                }
            };

            let calc = Calculation::new(a, b, operation);
            if let Err(e) = calc.perform() {
                warn!(line, error = %e, "Skipping history row");
                continue;
            }
            records.push(calc);
        }

        Ok(records)
    }

    fn write_rows(&self, rows: &[HistoryRow]) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| HistoryError::io(parent, e))?;
        }

        let file = File::create(&self.path).map_err(|e| HistoryError::io(&self.path, e))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        writer.write_record(HEADER)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush().map_err(|e| HistoryError::io(&self.path, e))?;
        Ok(())
    }
}

fn parse_operand(text: &str, line: usize) -> Result<Number, HistoryError> {
    Number::from_str(text).map_err(|e| HistoryError::Row { line, reason: e.to_string() })
}
