//! Read access to WALS-style typology data.
//!
//! Three CSV tables back everything here: `codes.csv` (the feature catalog),
//! `languages.csv` (language metadata) and `values.csv` (observations). The
//! catalog and the language directory are loaded once by [`Wals::open`];
//! feature layouts and language vectors are computed per query.
//!
//! ```no_run
//! use wals_typology::{Encoding, Wals};
//!
//! # fn main() -> wals_typology::Result<()> {
//! let wals = Wals::open("cldf-datasets-wals/cldf")?;
//!
//! let english = wals.language_info(Some("eng"), None)?.expect("English is in WALS");
//! println!("{} ({})", english.record.name, english.record.family);
//!
//! let layout = wals.feature_vector(Some("syntactic"), None, Encoding::OneHot)?;
//! let vector = wals.language_vector("eng", Some(&layout), Encoding::OneHot)?;
//! assert_eq!(vector.len(), layout.len());
//! # Ok(())
//! # }
//! ```
//!
//! Language vectors come from a [`ValueSource`]. [`Wals`] rescans the values
//! table on each call; for many languages, build an [`IndexedValues`] once with
//! [`Wals::indexed`] and pass it to [`Wals::language_vector_from`].

pub mod catalog;
pub mod config;
mod error;
pub mod feature_sets;
pub mod languages;
mod table;
pub mod vector;

pub use catalog::{Code, FeatureCatalog, Parameter};
pub use config::WalsConfig;
pub use error::{Result, WalsError};
pub use feature_sets::{Encoding, FeatureSet, FeatureSetKind};
pub use languages::{LanguageDirectory, LanguageMatch, LanguageRecord};
pub use vector::{
    FeaturePositionMap, IndexedValues, LanguageVector, ScanningValues, ValueSource,
};

use std::path::{Path, PathBuf};

/// A loaded WALS database: feature catalog, language directory and the
/// location of the values table. Immutable once opened.
#[derive(Debug, Clone)]
pub struct Wals {
    catalog: FeatureCatalog,
    languages: LanguageDirectory,
    values: ScanningValues,
}

impl Wals {
    /// Open the tables in `data_dir` using default file names.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::from_config(&WalsConfig::with_data_dir(data_dir))
    }

    /// Open the tables named by the global and `<root>/.wals` config files.
    pub fn discover(root: &Path) -> Result<Self> {
        Self::from_config(&WalsConfig::load(root))
    }

    pub fn from_config(config: &WalsConfig) -> Result<Self> {
        let paths = config.paths();
        let catalog = FeatureCatalog::load(&paths.codes)?;
        let languages = LanguageDirectory::load(&paths.languages)?;
        if !paths.values.is_file() {
            return Err(WalsError::MissingFile {
                path: paths.values,
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        tracing::info!(
            dir = %config.data.dir.display(),
            parameters = catalog.len(),
            languages = languages.len(),
            "opened WALS database"
        );
        Ok(Self::new(catalog, languages, ScanningValues::new(paths.values)))
    }

    pub fn new(
        catalog: FeatureCatalog,
        languages: LanguageDirectory,
        values: ScanningValues,
    ) -> Self {
        Self {
            catalog,
            languages,
            values,
        }
    }

    /// The feature catalog: parameters, their codes and descriptions.
    pub fn feature_description(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn languages(&self) -> &LanguageDirectory {
        &self.languages
    }

    /// Look up a language by exactly one of ISO 639-3 code or name.
    pub fn language_info(
        &self,
        id: Option<&str>,
        name: Option<&str>,
    ) -> Result<Option<LanguageMatch<'_>>> {
        self.languages.find(id, name)
    }

    /// Parameter IDs of a named feature set (`syntactic`, `morphological`).
    pub fn predefined_feature_set(&self, kind: &str) -> Result<Vec<String>> {
        feature_sets::predefined(kind)
    }

    pub fn feature_set(
        &self,
        kind: Option<&str>,
        explicit: Option<&[String]>,
        encoding: Encoding,
    ) -> Result<FeatureSet> {
        feature_sets::resolve(&self.catalog, kind, explicit, encoding)
    }

    /// Vector layout for a named set, an explicit list, or all features.
    pub fn feature_vector(
        &self,
        kind: Option<&str>,
        explicit: Option<&[String]>,
        encoding: Encoding,
    ) -> Result<FeaturePositionMap> {
        self.feature_set(kind, explicit, encoding)
            .map(FeaturePositionMap::from)
    }

    /// Vector for `language_id`, an ISO 639-3 code or a WALS ID.
    ///
    /// An ISO code known to the directory is translated to that language's
    /// WALS ID before the values table is read; anything else is matched
    /// against the values table as written. Without a layout, every catalog
    /// parameter is used.
    pub fn language_vector(
        &self,
        language_id: &str,
        map: Option<&FeaturePositionMap>,
        encoding: Encoding,
    ) -> Result<LanguageVector> {
        self.language_vector_from(&self.values, language_id, map, encoding)
    }

    /// Vector for a record returned by [`Wals::language_info`].
    pub fn language_vector_for(
        &self,
        record: &LanguageRecord,
        map: Option<&FeaturePositionMap>,
        encoding: Encoding,
    ) -> Result<LanguageVector> {
        self.vector_from_values(&self.values, &record.id, map, encoding)
    }

    /// Like [`Wals::language_vector`], reading observations from `source`.
    pub fn language_vector_from<S: ValueSource + ?Sized>(
        &self,
        source: &S,
        language_id: &str,
        map: Option<&FeaturePositionMap>,
        encoding: Encoding,
    ) -> Result<LanguageVector> {
        self.vector_from_values(source, self.values_id(language_id), map, encoding)
    }

    /// Values-table key for `language_id`. ISO codes win over WALS IDs.
    fn values_id<'a>(&'a self, language_id: &'a str) -> &'a str {
        self.languages
            .by_iso(language_id)
            .map_or(language_id, |record| record.id.as_str())
    }

    fn vector_from_values<S: ValueSource + ?Sized>(
        &self,
        source: &S,
        wals_id: &str,
        map: Option<&FeaturePositionMap>,
        encoding: Encoding,
    ) -> Result<LanguageVector> {
        match map {
            Some(map) => source.language_vector(wals_id, map, encoding),
            None => {
                let map = self.feature_vector(None, None, encoding)?;
                source.language_vector(wals_id, &map, encoding)
            }
        }
    }

    /// Read the values table once, grouped by language.
    pub fn indexed(&self) -> Result<IndexedValues> {
        IndexedValues::load(self.values.path())
    }
}
