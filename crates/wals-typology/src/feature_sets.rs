//! Feature set resolution: which features a vector contains, and in what order.

use crate::catalog::FeatureCatalog;
use crate::error::{Result, WalsError};
use std::str::FromStr;

/// How parameter values are laid out in a language vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// One slot per parameter holding the observed value index.
    #[default]
    Categorical,
    /// One slot per code holding 1 if the language has that value.
    OneHot,
}

/// WALS word order (81A-97A, 143A-144A), simple clauses (98A-121A) and
/// complex sentences (122A-128A).
const SYNTACTIC: &[&str] = &[
    "81A", "81B", "82A", "83A", "84A", "85A", "86A", "87A", "88A", "89A", "90A", "90B", "90C",
    "90D", "90E", "90F", "90G", "91A", "92A", "93A", "94A", "95A", "96A", "97A", "98A", "99A",
    "100A", "101A", "102A", "103A", "104A", "105A", "106A", "107A", "108A", "108B", "109A",
    "109B", "110A", "111A", "112A", "113A", "114A", "115A", "116A", "117A", "118A", "119A",
    "120A", "121A", "122A", "123A", "124A", "125A", "126A", "127A", "128A", "143A", "143B",
    "143C", "143D", "143E", "143F", "143G", "144A",
];

/// WALS morphology (20A-29A), nominal categories (30A-57A) and verbal
/// categories (65A-80A).
const MORPHOLOGICAL: &[&str] = &[
    "20A", "21A", "21B", "22A", "23A", "24A", "25A", "25B", "26A", "27A", "28A", "29A", "30A",
    "31A", "32A", "33A", "34A", "35A", "36A", "37A", "38A", "39A", "39B", "40A", "41A", "42A",
    "43A", "44A", "45A", "46A", "47A", "48A", "49A", "50A", "51A", "52A", "53A", "54A", "55A",
    "56A", "57A", "65A", "66A", "67A", "68A", "69A", "70A", "71A", "72A", "73A", "74A", "75A",
    "76A", "77A", "78A", "79A", "79B", "80A",
];

/// A named, hard-coded feature set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureSetKind {
    Syntactic,
    Morphological,
    Phonological,
}

impl FeatureSetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureSetKind::Syntactic => "syntactic",
            FeatureSetKind::Morphological => "morphological",
            FeatureSetKind::Phonological => "phonological",
        }
    }

    /// Parameter IDs of this set in their fixed order.
    pub fn parameters(&self) -> Result<&'static [&'static str]> {
        match self {
            FeatureSetKind::Syntactic => Ok(SYNTACTIC),
            FeatureSetKind::Morphological => Ok(MORPHOLOGICAL),
            FeatureSetKind::Phonological => {
                Err(WalsError::NotImplemented(self.as_str().to_string()))
            }
        }
    }
}

impl FromStr for FeatureSetKind {
    type Err = WalsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "syntactic" => Ok(FeatureSetKind::Syntactic),
            "morphological" => Ok(FeatureSetKind::Morphological),
            "phonological" => Ok(FeatureSetKind::Phonological),
            other => Err(WalsError::UnsupportedFeatureSet(other.to_string())),
        }
    }
}

/// Parameter IDs of a named feature set.
pub fn predefined(name: &str) -> Result<Vec<String>> {
    let kind: FeatureSetKind = name.parse()?;
    Ok(kind.parameters()?.iter().map(|s| s.to_string()).collect())
}

/// Ordered feature identifiers: parameter IDs, or code IDs once one-hot
/// expanded. Duplicates are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeatureSet(Vec<String>);

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }

    /// Replace every parameter ID with `p-1 ..= p-max_value(p)`.
    pub fn one_hot(&self, catalog: &FeatureCatalog) -> Result<FeatureSet> {
        let mut expanded = Vec::new();
        for id in &self.0 {
            let parameter = catalog
                .get(id)
                .ok_or_else(|| WalsError::UnknownFeature(id.clone()))?;
            expanded.extend(parameter.one_hot_ids());
        }
        Ok(FeatureSet(expanded))
    }
}

impl From<Vec<String>> for FeatureSet {
    fn from(features: Vec<String>) -> Self {
        FeatureSet(features)
    }
}

impl<S: Into<String>> FromIterator<S> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        FeatureSet(iter.into_iter().map(Into::into).collect())
    }
}

/// Resolve the features of a vector.
///
/// A named set takes precedence over an explicit list; with neither (or an
/// empty list) every catalog parameter is used in catalog order.
pub fn resolve(
    catalog: &FeatureCatalog,
    set_name: Option<&str>,
    explicit: Option<&[String]>,
    encoding: Encoding,
) -> Result<FeatureSet> {
    let parameters = match (set_name, explicit) {
        (Some(name), _) => FeatureSet(predefined(name)?),
        (None, Some(list)) if !list.is_empty() => FeatureSet(list.to_vec()),
        _ => catalog.parameter_ids().collect(),
    };

    match encoding {
        Encoding::Categorical => Ok(parameters),
        Encoding::OneHot => parameters.one_hot(catalog),
    }
}
