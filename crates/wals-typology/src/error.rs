//! Error taxonomy for loading and querying WALS tables.

use std::path::PathBuf;

/// Error that can occur while loading tables or answering queries.
///
/// A language that is simply absent is not an error: lookups return `None`.
#[derive(Debug, thiserror::Error)]
pub enum WalsError {
    #[error("cannot read {}: {source}", path.display())]
    MissingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{} has no column named {column:?}", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("{}:{line}: {reason}", path.display())]
    MalformedInput {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("unsupported feature set: {0}")]
    UnsupportedFeatureSet(String),

    #[error("feature set not implemented yet: {0}")]
    NotImplemented(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown feature: {0}")]
    UnknownFeature(String),
}

pub type Result<T> = std::result::Result<T, WalsError>;
