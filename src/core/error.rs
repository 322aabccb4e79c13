//! Error types for FastGenome2Vec
//!
//! Defines all error types used throughout the library. All fatal
//! conditions identify the offending file and row; per-row "no match"
//! conditions are not errors and never appear here.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for FastGenome2Vec operations
#[derive(Debug, Error)]
pub enum Genome2VecError {
    /// Input does not meet the column-count contract
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Malformed interval or field content
    #[error("Data error: {0}")]
    Data(#[from] DataError),

    /// A required annotation resource could not be loaded
    #[error("Reference error: {0}")]
    Reference(#[from] ReferenceError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Violated internal invariant (join results out of step with queries,
    /// thread pool construction failure)
    #[error("Internal consistency error: {0}")]
    Internal(String),
}

/// Query or reference input does not meet the column-count contract
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Query file has fewer than the required 7 columns
    #[error(
        "query file {path} must have at least 7 columns \
         (chrom, start, end, name, score, strand, value_1..), found {found}"
    )]
    QueryColumns { path: PathBuf, found: usize },

    /// Query rows disagree on column count
    #[error("{path}:{line}: expected {expected} columns as in the first record, found {found}")]
    RaggedQueryRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// Query file has no records at all
    #[error("query file {path} contains no records")]
    EmptyQuery { path: PathBuf },

    /// Annotation row has the wrong number of payload columns
    #[error(
        "{name} reference {path}:{line}: expected {expected} annotation \
         columns after chrom/start/end, found {found}"
    )]
    ReferenceColumns {
        name: &'static str,
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },
}

/// Malformed interval content, fatal at load time
#[derive(Debug, Error)]
pub enum DataError {
    /// Interval with start > end
    #[error("{file}:{line}: invalid interval {chrom}:{start}-{end} (start > end)")]
    CoordinateOrder {
        file: PathBuf,
        line: usize,
        chrom: String,
        start: u64,
        end: u64,
    },

    /// Interval with start > end, detected at index build (no file context)
    #[error("invalid interval {chrom}:{start}-{end} (start > end)")]
    UnorderedInterval { chrom: String, start: u64, end: u64 },

    /// Non-numeric coordinate column
    #[error("{file}:{line}: failed to parse {column} '{value}' as a coordinate")]
    ParseCoordinate {
        file: PathBuf,
        line: usize,
        column: &'static str,
        value: String,
    },

    /// Strand column outside {+, -, .}
    #[error("{file}:{line}: invalid strand '{value}' (expected +, - or .)")]
    InvalidStrand {
        file: PathBuf,
        line: usize,
        value: String,
    },

    /// Row with fewer than the 3 coordinate columns
    #[error("{file}:{line}: expected at least 3 fields (chrom, start, end)")]
    TooFewFields { file: PathBuf, line: usize },

    /// Non-UTF-8 field content
    #[error("{file}:{line}: non-UTF-8 field content")]
    InvalidUtf8 { file: PathBuf, line: usize },
}

/// A required annotation resource could not be loaded at all
#[derive(Debug, Error)]
pub enum ReferenceError {
    /// Annotation file missing from the annotation directory
    #[error("{name} reference not found: {path}")]
    NotFound { name: &'static str, path: PathBuf },

    /// Annotation file exists but could not be read
    #[error("failed to read {name} reference {path}: {source}")]
    Unreadable {
        name: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for FastGenome2Vec operations
pub type Result<T> = std::result::Result<T, Genome2VecError>;

/// Result type alias for data validation
pub type DataResult<T> = std::result::Result<T, DataError>;
