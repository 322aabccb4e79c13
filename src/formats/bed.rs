//! BED table parsing for query and annotation inputs
//!
//! Rows are split on tabs with memchr and validated at load time: coordinate
//! columns must parse, `start <= end`, strand columns must be one of +, -,
//! or '.', and every row must carry the column count its schema demands.
//! Payload columns are stored verbatim so numeric annotation values survive
//! the round trip untouched.

use crate::core::io::SmartReader;
use crate::core::{
    valid_strand_symbol, AnnotationBundle, AnnotationSet, DataError, DataResult, Genome2VecError,
    GenomicInterval, ReferenceError, Result, SchemaError,
};
use crate::formats::schema::{AnnotationSource, QUERY_FIXED_COLUMNS, QUERY_MIN_COLUMNS};
use memchr::memchr;
use std::io::BufRead;
use std::path::{Path, PathBuf};

/// A validated query table: records in input order plus the number of
/// trailing value columns shared by every row.
#[derive(Debug)]
pub struct QueryTable {
    pub records: Vec<GenomicInterval>,
    pub value_columns: usize,
}

/// Find (start, end) byte offsets of every tab-separated field
fn field_bounds(line: &[u8]) -> Vec<(usize, usize)> {
    let mut bounds = Vec::with_capacity(8);
    let mut start = 0;
    let mut pos = 0;

    while pos < line.len() {
        if let Some(tab) = memchr(b'\t', &line[pos..]) {
            let end = pos + tab;
            bounds.push((start, end));
            start = end + 1;
            pos = start;
        } else {
            bounds.push((start, line.len()));
            return bounds;
        }
    }
    // line ends on a tab: trailing empty field
    bounds.push((start, line.len()));
    bounds
}

fn field_str<'a>(
    line: &'a [u8],
    bounds: (usize, usize),
    file: &Path,
    lineno: usize,
) -> DataResult<&'a str> {
    std::str::from_utf8(&line[bounds.0..bounds.1]).map_err(|_| DataError::InvalidUtf8 {
        file: file.to_path_buf(),
        line: lineno,
    })
}

fn parse_coord(value: &str, column: &'static str, file: &Path, lineno: usize) -> DataResult<u64> {
    value.parse().map_err(|_| DataError::ParseCoordinate {
        file: file.to_path_buf(),
        line: lineno,
        column,
        value: value.to_string(),
    })
}

/// Parse one BED row into a `GenomicInterval`
///
/// Requires at least chrom/start/end; everything after `end` becomes the
/// payload, verbatim.
pub fn parse_interval(line: &[u8], file: &Path, lineno: usize) -> DataResult<GenomicInterval> {
    let bounds = field_bounds(line);
    if bounds.len() < 3 {
        return Err(DataError::TooFewFields {
            file: file.to_path_buf(),
            line: lineno,
        });
    }

    let chrom = field_str(line, bounds[0], file, lineno)?;
    let start = parse_coord(field_str(line, bounds[1], file, lineno)?, "start", file, lineno)?;
    let end = parse_coord(field_str(line, bounds[2], file, lineno)?, "end", file, lineno)?;

    if start > end {
        return Err(DataError::CoordinateOrder {
            file: file.to_path_buf(),
            line: lineno,
            chrom: chrom.to_string(),
            start,
            end,
        });
    }

    let mut fields = Vec::with_capacity(bounds.len() - 3);
    for &b in &bounds[3..] {
        fields.push(field_str(line, b, file, lineno)?.to_string());
    }

    Ok(GenomicInterval::new(chrom, start, end, fields))
}

/// True for lines carried over from browsers/track tools rather than records
fn is_skippable(line: &[u8]) -> bool {
    line.is_empty()
        || line.starts_with(b"#")
        || line.starts_with(b"track")
        || line.starts_with(b"browser")
}

/// Iterate data lines of a table, applying `handle` to each with its
/// 1-based line number.
fn for_each_data_line<F>(path: &Path, mut handle: F) -> Result<()>
where
    F: FnMut(&[u8], usize) -> Result<()>,
{
    let mut reader = SmartReader::open(path)?;
    let mut buf: Vec<u8> = Vec::with_capacity(4096);
    let mut lineno = 0;

    loop {
        buf.clear();
        let bytes_read = reader.read_until(b'\n', &mut buf)?;
        if bytes_read == 0 {
            break;
        }
        lineno += 1;

        let mut line: &[u8] = &buf;
        while let Some(&last) = line.last() {
            if last == b'\n' || last == b'\r' {
                line = &line[..line.len() - 1];
            } else {
                break;
            }
        }

        if is_skippable(line) {
            continue;
        }
        handle(line, lineno)?;
    }

    Ok(())
}

/// Read and validate the query table.
///
/// The first record fixes the column count; it must be at least 7
/// (chrom, start, end, name, score, strand, value_1..) and every later
/// record must match it. The strand column must be +, - or '.'.
pub fn read_query<P: AsRef<Path>>(path: P) -> Result<QueryTable> {
    let path = path.as_ref();
    let mut records: Vec<GenomicInterval> = Vec::new();
    let mut expected_columns: Option<usize> = None;

    for_each_data_line(path, |line, lineno| {
        let record = parse_interval(line, path, lineno)?;
        let columns = 3 + record.fields.len();

        match expected_columns {
            None => {
                if columns < QUERY_MIN_COLUMNS {
                    return Err(SchemaError::QueryColumns {
                        path: path.to_path_buf(),
                        found: columns,
                    }
                    .into());
                }
                expected_columns = Some(columns);
            }
            Some(expected) => {
                if columns != expected {
                    return Err(SchemaError::RaggedQueryRow {
                        path: path.to_path_buf(),
                        line: lineno,
                        expected,
                        found: columns,
                    }
                    .into());
                }
            }
        }

        // strand is the sixth column, payload index 2
        let strand = record.field(2).unwrap_or("");
        if !valid_strand_symbol(strand) {
            return Err(DataError::InvalidStrand {
                file: path.to_path_buf(),
                line: lineno,
                value: strand.to_string(),
            }
            .into());
        }

        records.push(record);
        Ok(())
    })?;

    let expected = match expected_columns {
        Some(columns) => columns,
        None => {
            return Err(SchemaError::EmptyQuery {
                path: path.to_path_buf(),
            }
            .into())
        }
    };

    Ok(QueryTable {
        records,
        value_columns: expected - QUERY_FIXED_COLUMNS,
    })
}

/// Read one annotation table, enforcing the source's payload width.
pub fn read_annotation(path: &Path, source: AnnotationSource) -> Result<Vec<GenomicInterval>> {
    let expected = source.payload_width();
    let mut records: Vec<GenomicInterval> = Vec::new();

    for_each_data_line(path, |line, lineno| {
        let record = parse_interval(line, path, lineno)?;

        if record.fields.len() != expected {
            return Err(SchemaError::ReferenceColumns {
                name: source.label(),
                path: path.to_path_buf(),
                line: lineno,
                expected,
                found: record.fields.len(),
            }
            .into());
        }

        if source == AnnotationSource::GeneEmbedding {
            // gene strand feeds the TSS derivation later
            let strand = record.field(1).unwrap_or("");
            if !valid_strand_symbol(strand) {
                return Err(DataError::InvalidStrand {
                    file: path.to_path_buf(),
                    line: lineno,
                    value: strand.to_string(),
                }
                .into());
            }
        }

        records.push(record);
        Ok(())
    })?;

    Ok(records)
}

/// Resolve one annotation source inside the annotation directory
pub fn annotation_path(dir: &Path, source: AnnotationSource) -> PathBuf {
    dir.join(source.file_name())
}

/// Load and index one annotation set; a missing or unreadable file is a
/// fatal `ReferenceError`.
pub fn load_annotation_set(dir: &Path, source: AnnotationSource) -> Result<AnnotationSet> {
    let path = annotation_path(dir, source);
    if !path.exists() {
        return Err(ReferenceError::NotFound {
            name: source.label(),
            path,
        }
        .into());
    }

    let records = read_annotation(&path, source).map_err(|e| match e {
        Genome2VecError::Io(source_err) => Genome2VecError::Reference(ReferenceError::Unreadable {
            name: source.label(),
            path: path.clone(),
            source: source_err,
        }),
        other => other,
    })?;

    let set = AnnotationSet::build(source.label(), records)?;
    log::info!(
        "{}: {} intervals on {} chromosomes",
        source.label(),
        set.index().total_intervals(),
        set.index().chromosome_count()
    );
    Ok(set)
}

/// Load all seven annotation sets from `dir`, in canonical order.
///
/// Fails fast on the first missing or malformed set: the output schema
/// requires every block, so there is no degraded mode.
pub fn load_bundle<P: AsRef<Path>>(dir: P) -> Result<AnnotationBundle> {
    let dir = dir.as_ref();
    let mut sets = Vec::with_capacity(AnnotationSource::ALL.len());
    for source in AnnotationSource::ALL {
        sets.push(load_annotation_set(dir, source)?);
    }
    Ok(AnnotationBundle::new(sets))
}
