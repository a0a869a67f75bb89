//! Feature catalog built from the codes table.
//!
//! Every row of `codes.csv` names one categorical value ("code") of a
//! parameter. Code IDs have the form `<parameter>-<n>` with `n >= 1`; the
//! largest `n` seen for a parameter is its value cardinality, which drives
//! one-hot expansion.

use crate::error::Result;
use crate::table::Table;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::io;
use std::path::{Path, PathBuf};

/// Separator between a parameter ID and a value index in a code ID.
pub const CODE_SEPARATOR: char = '-';

const COLUMNS: &[&str] = &["Parameter_ID", "ID", "Description"];

/// Build the code ID for value `value` of `parameter` (e.g. `81A-3`).
pub fn code_id(parameter: &str, value: impl std::fmt::Display) -> String {
    format!("{parameter}{CODE_SEPARATOR}{value}")
}

/// Split a code ID into its parameter ID and numeric suffix.
///
/// Returns `None` if there is no separator or the suffix is not a positive
/// integer.
pub fn split_code_id(code: &str) -> Option<(&str, u32)> {
    let (parameter, suffix) = code.rsplit_once(CODE_SEPARATOR)?;
    if parameter.is_empty() {
        return None;
    }
    match suffix.parse::<u32>() {
        Ok(n) if n > 0 => Some((parameter, n)),
        _ => None,
    }
}

/// One categorical value of a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Code {
    pub id: String,
    pub description: String,
}

/// A parameter (feature group) and its known codes.
#[derive(Debug, Clone, Serialize)]
pub struct Parameter {
    id: String,
    codes: BTreeMap<u32, Code>,
    max_value: u32,
}

impl Parameter {
    fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            codes: BTreeMap::new(),
            max_value: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Highest value index observed among this parameter's codes.
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    /// Codes in ascending value order.
    pub fn codes(&self) -> impl Iterator<Item = &Code> {
        self.codes.values()
    }

    pub fn code(&self, value: u32) -> Option<&Code> {
        self.codes.get(&value)
    }

    /// Code IDs `p-1 ..= p-max_value`, including indices with no catalog row.
    pub fn one_hot_ids(&self) -> impl Iterator<Item = String> + '_ {
        (1..=self.max_value).map(|n| code_id(&self.id, n))
    }
}

/// All parameters of the database, in the order they first appear in the
/// codes table. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct FeatureCatalog {
    parameters: Vec<Parameter>,
    index: HashMap<String, usize>,
}

impl FeatureCatalog {
    /// Load the catalog from a codes CSV file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_table(Table::open(path, COLUMNS)?, path)
    }

    /// Load the catalog from any reader yielding codes CSV.
    pub fn from_reader<R: io::Read>(reader: R, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let table = Table::from_reader(reader, source.clone(), COLUMNS)?;
        Self::from_table(table, &source)
    }

    fn from_table<R: io::Read>(table: Table<R>, source: &Path) -> Result<Self> {
        let mut catalog = Self::default();
        let mut rows = 0usize;

        table.for_each_row(|row| {
            let parameter_id = row.get(0).trim();
            let code = row.get(1).trim();
            let description = row.get(2);

            let (prefix, value) = split_code_id(code).ok_or_else(|| {
                row.malformed(format!(
                    "code ID {code:?} is not of the form <parameter>{CODE_SEPARATOR}<positive integer>"
                ))
            })?;
            if prefix != parameter_id {
                return Err(row.malformed(format!(
                    "code ID {code:?} does not belong to parameter {parameter_id:?}"
                )));
            }

            let parameter = catalog.entry(parameter_id);
            parameter.codes.insert(
                value,
                Code {
                    id: code.to_string(),
                    description: description.to_string(),
                },
            );
            parameter.max_value = parameter.max_value.max(value);
            rows += 1;
            Ok(())
        })?;

        tracing::debug!(
            path = %source.display(),
            parameters = catalog.parameters.len(),
            codes = rows,
            "loaded feature catalog"
        );
        Ok(catalog)
    }

    fn entry(&mut self, id: &str) -> &mut Parameter {
        let idx = match self.index.get(id) {
            Some(&idx) => idx,
            None => {
                self.parameters.push(Parameter::new(id));
                self.index.insert(id.to_string(), self.parameters.len() - 1);
                self.parameters.len() - 1
            }
        };
        &mut self.parameters[idx]
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    /// Parameter IDs in catalog order.
    pub fn parameter_ids(&self) -> impl Iterator<Item = &str> {
        self.parameters.iter().map(|p| p.id.as_str())
    }

    pub fn get(&self, parameter: &str) -> Option<&Parameter> {
        self.index.get(parameter).map(|&idx| &self.parameters[idx])
    }

    pub fn contains(&self, parameter: &str) -> bool {
        self.index.contains_key(parameter)
    }

    pub fn max_value(&self, parameter: &str) -> Option<u32> {
        self.get(parameter).map(Parameter::max_value)
    }

    /// Description of a code, e.g. `description("81A-2")`.
    pub fn description(&self, code: &str) -> Option<&str> {
        let (parameter, value) = split_code_id(code)?;
        self.get(parameter)?
            .code(value)
            .map(|c| c.description.as_str())
    }
}
