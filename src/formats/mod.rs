//! File-format adapters and output schema stitching
//!
//! BED parsing and annotation loading, the per-source output schema, and
//! the final table assembly.

pub mod bed;
pub mod output;
pub mod schema;

pub use bed::{load_annotation_set, load_bundle, parse_interval, read_annotation, read_query, QueryTable};
pub use output::{annotate_file, default_output_path, write_table, AnnotateStats};
pub use schema::{output_header, query_columns, AnnotationSource};
