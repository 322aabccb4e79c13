//! FastGenome2Vec - High-performance nearest-feature genomic annotation
//!
//! A Rust reimplementation of the genome2vec annotation pipeline: each query
//! interval is joined against seven annotation collections (gene embeddings,
//! chromatin states, Hi-C-derived scalars) by closest feature, and the
//! results land in one wide feature table with one row per query interval.
//!
//! # Features
//!
//! - O(log n) closest-interval queries over per-chromosome sorted indexes
//! - Deterministic first-occurrence tie-breaking, matching `closest -t first`
//! - Parallel row processing with rayon
//! - Transparent gzip/bzip2 input support
//!
//! # Output format
//!
//! One tab-separated header line followed by one row per query row, in
//! query order. A source with no feature on a query's chromosome leaves
//! its columns empty for that row. Annotation values are passed through as
//! input text; the derived `TSS` column is an integer and `dist_TSS` is
//! printed with one decimal place (query midpoints are whole or half
//! bases, so one decimal is exact).
//!
//! # Example
//!
//! ```ignore
//! use fast_genome2vec::formats::{annotate_file, load_bundle};
//!
//! // Load the seven annotation sets once
//! let bundle = load_bundle("./anno_data")?;
//!
//! // Annotate a query BED file
//! let stats = annotate_file("peaks.bed", "peaks_genome2vec.bed", &bundle, 4)?;
//! eprintln!("{} rows annotated", stats.rows);
//! ```

pub mod core;
pub mod formats;

// Re-export commonly used types
pub use core::{
    closest_all, gap_distance, AnnotationBundle, AnnotationSet, ClosestFinder, ClosestHit,
    ClosestIndex, DataError, Genome2VecError, GenomicInterval, JoinTable, LinearScan,
    ReferenceError, Result, SchemaError, Strand,
};
pub use formats::{bed, output, schema};
