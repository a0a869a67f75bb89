//! Language directory built from the languages table.

use crate::error::{Result, WalsError};
use crate::table::Table;
use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

const COLUMNS: &[&str] = &[
    "ID",
    "Name",
    "ISO639P3code",
    "Macroarea",
    "Family",
    "Subfamily",
    "Genus",
];

/// Descriptive metadata for one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageRecord {
    /// Internal WALS row ID (e.g. `eng`, `grk`).
    pub id: String,
    pub name: String,
    /// ISO 639-3 code, the directory key.
    pub iso_code: String,
    pub macroarea: String,
    pub family: String,
    pub subfamily: String,
    pub genus: String,
}

/// Result of a directory lookup.
///
/// `matches` counts every record the query matched; only name lookups can
/// produce more than one, in which case `record` is the first in file order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LanguageMatch<'a> {
    pub record: &'a LanguageRecord,
    pub matches: usize,
}

impl LanguageMatch<'_> {
    pub fn is_ambiguous(&self) -> bool {
        self.matches > 1
    }
}

/// All languages keyed by ISO 639-3 code. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct LanguageDirectory {
    /// Records in file order. A row reusing an ISO code replaces the earlier
    /// record and takes the later row's position.
    records: Vec<LanguageRecord>,
    by_iso: HashMap<String, usize>,
}

impl LanguageDirectory {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_table(Table::open(path, COLUMNS)?, path)
    }

    pub fn from_reader<R: io::Read>(reader: R, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let table = Table::from_reader(reader, source.clone(), COLUMNS)?;
        Self::from_table(table, &source)
    }

    fn from_table<R: io::Read>(table: Table<R>, source: &Path) -> Result<Self> {
        let mut directory = Self::default();

        table.for_each_row(|row| {
            let record = LanguageRecord {
                id: row.get(0).trim().to_string(),
                name: row.get(1).to_string(),
                iso_code: row.get(2).trim().to_string(),
                macroarea: row.get(3).to_string(),
                family: row.get(4).to_string(),
                subfamily: row.get(5).to_string(),
                genus: row.get(6).to_string(),
            };
            // Languages without an ISO code stay reachable by name and WALS ID.
            if record.iso_code.is_empty() {
                directory.records.push(record);
                return Ok(());
            }
            match directory.by_iso.get(&record.iso_code) {
                Some(&idx) => {
                    tracing::debug!(
                        iso = %record.iso_code,
                        line = row.line(),
                        "duplicate ISO code, later row wins"
                    );
                    directory.records.remove(idx);
                    for pos in directory.by_iso.values_mut() {
                        if *pos > idx {
                            *pos -= 1;
                        }
                    }
                    directory
                        .by_iso
                        .insert(record.iso_code.clone(), directory.records.len());
                    directory.records.push(record);
                }
                None => {
                    directory
                        .by_iso
                        .insert(record.iso_code.clone(), directory.records.len());
                    directory.records.push(record);
                }
            }
            Ok(())
        })?;

        tracing::debug!(
            path = %source.display(),
            languages = directory.records.len(),
            "loaded language directory"
        );
        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in file order.
    pub fn iter(&self) -> impl Iterator<Item = &LanguageRecord> {
        self.records.iter()
    }

    /// Exact lookup by ISO 639-3 code.
    pub fn by_iso(&self, iso_code: &str) -> Option<&LanguageRecord> {
        self.by_iso.get(iso_code).map(|&idx| &self.records[idx])
    }

    /// Exact lookup by internal WALS ID.
    pub fn by_wals_id(&self, id: &str) -> Option<&LanguageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Case-insensitive, whitespace-trimmed lookup by display name.
    pub fn by_name(&self, name: &str) -> Option<LanguageMatch<'_>> {
        let wanted = name.trim().to_lowercase();
        let mut hits = self
            .records
            .iter()
            .filter(|r| r.name.trim().to_lowercase() == wanted);
        let record = hits.next()?;
        Some(LanguageMatch {
            record,
            matches: 1 + hits.count(),
        })
    }

    /// Look up a language by exactly one of ISO code or display name.
    ///
    /// An absent language is `Ok(None)`.
    pub fn find(&self, id: Option<&str>, name: Option<&str>) -> Result<Option<LanguageMatch<'_>>> {
        match (id, name) {
            (Some(id), None) => Ok(self
                .by_iso(id)
                .map(|record| LanguageMatch { record, matches: 1 })),
            (None, Some(name)) => Ok(self.by_name(name)),
            (Some(_), Some(_)) => Err(WalsError::InvalidArgument(
                "pass either a language identifier or a name, not both".to_string(),
            )),
            (None, None) => Err(WalsError::InvalidArgument(
                "a language identifier or a name is required".to_string(),
            )),
        }
    }
}
