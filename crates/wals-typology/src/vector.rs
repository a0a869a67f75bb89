//! Language vectors: feature positions and the values that fill them.
//!
//! Two [`ValueSource`] implementations produce identical vectors:
//! [`ScanningValues`] rereads the values table on every call, while
//! [`IndexedValues`] reads it once and groups observations by language.

use crate::catalog::code_id;
use crate::error::{Result, WalsError};
use crate::feature_sets::{Encoding, FeatureSet};
use crate::table::Table;
use std::collections::HashMap;
use std::io;
use std::ops::Index;
use std::path::{Path, PathBuf};

const COLUMNS: &[&str] = &["Language_ID", "Parameter_ID", "Value"];

/// Bijection between feature identifiers and vector positions `0..n`.
///
/// If an identifier occurs more than once, [`position`](Self::position)
/// returns its last occurrence; the earlier slots stay zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePositionMap {
    idx2feature: Vec<String>,
    feature2idx: HashMap<String, usize>,
}

impl FeaturePositionMap {
    pub fn new(features: &FeatureSet) -> Self {
        let idx2feature = features.as_slice().to_vec();
        let feature2idx = idx2feature
            .iter()
            .enumerate()
            .map(|(idx, f)| (f.clone(), idx))
            .collect();
        Self {
            idx2feature,
            feature2idx,
        }
    }

    /// Number of slots in vectors built from this map.
    pub fn len(&self) -> usize {
        self.idx2feature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.idx2feature.is_empty()
    }

    pub fn position(&self, feature: &str) -> Option<usize> {
        self.feature2idx.get(feature).copied()
    }

    pub fn feature(&self, position: usize) -> Option<&str> {
        self.idx2feature.get(position).map(String::as_str)
    }

    /// Feature identifiers in position order.
    pub fn features(&self) -> &[String] {
        &self.idx2feature
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.idx2feature
            .iter()
            .enumerate()
            .map(|(idx, f)| (idx, f.as_str()))
    }
}

impl From<FeatureSet> for FeaturePositionMap {
    fn from(features: FeatureSet) -> Self {
        Self::new(&features)
    }
}

/// Numeric encoding of one language, one slot per map position.
///
/// A zero slot means either "no observation" or, in categorical mode, an
/// observed value of 0; the two are not distinguished.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageVector(Vec<i64>);

impl LanguageVector {
    pub fn zeros(len: usize) -> Self {
        LanguageVector(vec![0; len])
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<i64> {
        self.0.get(position).copied()
    }

    /// Value of the slot for `feature`, if the map has one.
    pub fn value_of(&self, map: &FeaturePositionMap, feature: &str) -> Option<i64> {
        map.position(feature).and_then(|idx| self.get(idx))
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<i64> {
        self.0
    }
}

impl Index<usize> for LanguageVector {
    type Output = i64;

    fn index(&self, position: usize) -> &i64 {
        &self.0[position]
    }
}

/// Anything that can produce language vectors from recorded observations.
pub trait ValueSource {
    fn language_vector(
        &self,
        language_id: &str,
        map: &FeaturePositionMap,
        encoding: Encoding,
    ) -> Result<LanguageVector>;
}

/// Accumulates observations for one language into a vector.
struct VectorBuilder<'a> {
    map: &'a FeaturePositionMap,
    encoding: Encoding,
    vector: LanguageVector,
}

impl<'a> VectorBuilder<'a> {
    fn new(map: &'a FeaturePositionMap, encoding: Encoding) -> Self {
        Self {
            map,
            encoding,
            vector: LanguageVector::zeros(map.len()),
        }
    }

    /// Apply one observation. `Err(reason)` means the value did not parse.
    fn observe(&mut self, parameter: &str, value: &str) -> std::result::Result<(), String> {
        let value = value.trim();
        match self.encoding {
            Encoding::Categorical => {
                if let Some(idx) = self.map.position(parameter) {
                    self.vector.0[idx] = value.parse::<i64>().map_err(|_| {
                        format!("value {value:?} for parameter {parameter:?} is not an integer")
                    })?;
                }
            }
            Encoding::OneHot => {
                let code = code_id(parameter, value);
                match self.map.position(&code) {
                    Some(idx) => self.vector.0[idx] = 1,
                    None => tracing::trace!(code = %code, "no one-hot slot for observation"),
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> LanguageVector {
        self.vector
    }
}

fn scan<R: io::Read>(
    table: Table<R>,
    language_id: &str,
    map: &FeaturePositionMap,
    encoding: Encoding,
) -> Result<LanguageVector> {
    let mut builder = VectorBuilder::new(map, encoding);
    table.for_each_row(|row| {
        if row.get(0).trim() != language_id {
            return Ok(());
        }
        builder
            .observe(row.get(1).trim(), row.get(2))
            .map_err(|reason| row.malformed(reason))
    })?;
    Ok(builder.finish())
}

/// Build a vector for `language_id` with one linear scan of the values table.
pub fn build_language_vector(
    values: &Path,
    language_id: &str,
    map: &FeaturePositionMap,
    encoding: Encoding,
) -> Result<LanguageVector> {
    scan(Table::open(values, COLUMNS)?, language_id, map, encoding)
}

/// Like [`build_language_vector`], reading the values table from `reader`.
pub fn build_language_vector_from_reader<R: io::Read>(
    reader: R,
    source: impl Into<PathBuf>,
    language_id: &str,
    map: &FeaturePositionMap,
    encoding: Encoding,
) -> Result<LanguageVector> {
    scan(
        Table::from_reader(reader, source, COLUMNS)?,
        language_id,
        map,
        encoding,
    )
}

/// Rereads the values file on every call. Holds no file handle between calls.
#[derive(Debug, Clone)]
pub struct ScanningValues {
    path: PathBuf,
}

impl ScanningValues {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ValueSource for ScanningValues {
    fn language_vector(
        &self,
        language_id: &str,
        map: &FeaturePositionMap,
        encoding: Encoding,
    ) -> Result<LanguageVector> {
        build_language_vector(&self.path, language_id, map, encoding)
    }
}

#[derive(Debug, Clone)]
struct Observation {
    parameter: String,
    value: String,
    line: u64,
}

/// Values table grouped by language, for many vector builds.
#[derive(Debug, Clone, Default)]
pub struct IndexedValues {
    source: PathBuf,
    by_language: HashMap<String, Vec<Observation>>,
}

impl IndexedValues {
    pub fn load(path: &Path) -> Result<Self> {
        Self::from_table(Table::open(path, COLUMNS)?, path)
    }

    pub fn from_reader<R: io::Read>(reader: R, source: impl Into<PathBuf>) -> Result<Self> {
        let source = source.into();
        let table = Table::from_reader(reader, source.clone(), COLUMNS)?;
        Self::from_table(table, &source)
    }

    fn from_table<R: io::Read>(table: Table<R>, source: &Path) -> Result<Self> {
        let mut by_language: HashMap<String, Vec<Observation>> = HashMap::new();
        let mut rows = 0usize;
        table.for_each_row(|row| {
            by_language
                .entry(row.get(0).trim().to_string())
                .or_default()
                .push(Observation {
                    parameter: row.get(1).trim().to_string(),
                    value: row.get(2).to_string(),
                    line: row.line(),
                });
            rows += 1;
            Ok(())
        })?;

        tracing::debug!(
            path = %source.display(),
            languages = by_language.len(),
            observations = rows,
            "indexed values table"
        );
        Ok(Self {
            source: source.to_path_buf(),
            by_language,
        })
    }

    /// Language IDs with at least one observation, in no particular order.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.by_language.keys().map(String::as_str)
    }

    /// Number of recorded observations for `language_id`.
    pub fn observation_count(&self, language_id: &str) -> usize {
        self.by_language.get(language_id).map_or(0, Vec::len)
    }
}

impl ValueSource for IndexedValues {
    fn language_vector(
        &self,
        language_id: &str,
        map: &FeaturePositionMap,
        encoding: Encoding,
    ) -> Result<LanguageVector> {
        let mut builder = VectorBuilder::new(map, encoding);
        for obs in self.by_language.get(language_id).into_iter().flatten() {
            builder
                .observe(&obs.parameter, &obs.value)
                .map_err(|reason| WalsError::MalformedInput {
                    path: self.source.clone(),
                    line: obs.line,
                    reason,
                })?;
        }
        Ok(builder.finish())
    }
}
