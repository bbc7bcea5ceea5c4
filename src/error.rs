//! Error types for loading element data sets and configuration.
//!
//! Evaluation itself never fails; everything here is raised at load time.

use std::path::PathBuf;

use thiserror::Error;

/// Precondition violations when constructing [`crate::OrbitalElements`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ElementsError {
    #[error("semi-major axis must be positive and finite, got {0}")]
    SemiMajorAxis(f64),

    #[error("eccentricity must lie in [0, 1) for a bound orbit, got {0}")]
    Eccentricity(f64),

    #[error("{field} must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },
}

/// A data set failed to load. No partial data escapes when this is returned.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected {expected} columns for {kind} but found {found}")]
    ColumnCount {
        kind: &'static str,
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}: column `{column}` is not a number: {value:?}")]
    InvalidNumber {
        line: u64,
        column: &'static str,
        value: String,
    },

    #[error("line {line}: {source}")]
    InvalidElements {
        line: u64,
        #[source]
        source: ElementsError,
    },
}

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}
