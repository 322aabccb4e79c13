//! Output table assembly
//!
//! Stitches the query columns, the gene block with its TSS-derived fields,
//! and the remaining six annotation blocks into one tab-separated row per
//! query interval, in a fixed canonical column order. A source with no
//! match on a query's chromosome contributes empty fields for its block
//! only; the row itself is always emitted.

use crate::core::{closest_all, AnnotationBundle, Genome2VecError, GenomicInterval, JoinTable, Result};
use crate::formats::bed::read_query;
use crate::formats::schema::{dist_tss, output_header, tss, AnnotationSource};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Per-run annotation statistics
#[derive(Debug, Default, Clone)]
pub struct AnnotateStats {
    /// Number of query rows (equals the number of output rows)
    pub rows: usize,
    /// Matched row count per source, aligned with `AnnotationSource::ALL`
    pub matched: Vec<usize>,
}

fn push_field(row: &mut String, value: &str) {
    if !row.is_empty() {
        row.push('\t');
    }
    row.push_str(value);
}

fn push_empty(row: &mut String, count: usize) {
    for _ in 0..count {
        push_field(row, "");
    }
}

/// Format one output row in canonical column order
fn format_row(
    query: &GenomicInterval,
    bundle: &AnnotationBundle,
    joins: &JoinTable,
    row: usize,
    stats: &mut AnnotateStats,
) -> String {
    let mut out = String::with_capacity(4096);

    push_field(&mut out, &query.chrom);
    push_field(&mut out, &query.start.to_string());
    push_field(&mut out, &query.end.to_string());
    for field in &query.fields {
        push_field(&mut out, field);
    }

    for (s, source) in AnnotationSource::ALL.iter().enumerate() {
        match joins[s][row] {
            Some(hit) => {
                stats.matched[s] += 1;
                let matched = bundle.get(s).record(hit.record);
                if *source == AnnotationSource::GeneEmbedding {
                    push_field(&mut out, &matched.chrom);
                    push_field(&mut out, &matched.start.to_string());
                    push_field(&mut out, &matched.end.to_string());
                    for field in &matched.fields {
                        push_field(&mut out, field);
                    }
                    let site = tss(matched);
                    push_field(&mut out, &site.to_string());
                    // one decimal is exact: midpoints are whole or half bases
                    push_field(&mut out, &format!("{:.1}", dist_tss(query, site)));
                } else {
                    for field in &matched.fields {
                        push_field(&mut out, field);
                    }
                }
            }
            None => push_empty(&mut out, source.output_width()),
        }
    }

    out
}

/// Assemble and write the output table.
///
/// Every per-source result vector must be exactly as long as `queries`;
/// the joins are 1:1 by construction, so a mismatch is an internal fault,
/// not an input error.
pub fn write_table<W: Write>(
    out: &mut W,
    queries: &[GenomicInterval],
    value_columns: usize,
    bundle: &AnnotationBundle,
    joins: &JoinTable,
) -> Result<AnnotateStats> {
    if joins.len() != AnnotationSource::ALL.len() || bundle.len() != AnnotationSource::ALL.len() {
        return Err(Genome2VecError::Internal(format!(
            "expected {} join result sets, found {} (bundle has {})",
            AnnotationSource::ALL.len(),
            joins.len(),
            bundle.len()
        )));
    }
    for (s, matches) in joins.iter().enumerate() {
        if matches.len() != queries.len() {
            return Err(Genome2VecError::Internal(format!(
                "{} join produced {} results for {} queries",
                AnnotationSource::ALL[s].label(),
                matches.len(),
                queries.len()
            )));
        }
    }

    let mut stats = AnnotateStats {
        rows: queries.len(),
        matched: vec![0; AnnotationSource::ALL.len()],
    };

    writeln!(out, "{}", output_header(value_columns).join("\t"))?;
    for (row, query) in queries.iter().enumerate() {
        writeln!(out, "{}", format_row(query, bundle, joins, row, &mut stats))?;
    }

    Ok(stats)
}

/// Default output path: `<input stem>_genome2vec.bed` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{}_genome2vec.bed", stem))
}

/// Run the whole annotation pipeline for one query file.
///
/// Reads and validates the query, joins it against every set in `bundle`,
/// and writes the output table. The output file is only created once the
/// query has parsed cleanly, so fatal errors leave no partial output.
pub fn annotate_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    bundle: &AnnotationBundle,
    threads: usize,
) -> Result<AnnotateStats> {
    let query = read_query(input)?;
    log::info!(
        "query: {} rows, {} value columns",
        query.records.len(),
        query.value_columns
    );

    let joins = closest_all(&query.records, bundle, threads)?;

    let file = File::create(output.as_ref())?;
    let mut writer = BufWriter::with_capacity(128 * 1024, file);
    let stats = write_table(
        &mut writer,
        &query.records,
        query.value_columns,
        bundle,
        &joins,
    )?;
    writer.flush()?;

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::AnnotationSet;
    use crate::formats::schema::GENE_EMBEDDING_DIM;

    fn gene_fields(name: &str, strand: &str) -> Vec<String> {
        let mut fields = vec![name.to_string(), strand.to_string()];
        for i in 0..GENE_EMBEDDING_DIM {
            fields.push(format!("0.{}", i % 10));
        }
        fields
    }

    fn scalar_set(name: &'static str, value: &str) -> AnnotationSet {
        AnnotationSet::build(
            name,
            vec![GenomicInterval::new("chr1", 0, 1000, vec![value.to_string()])],
        )
        .unwrap()
    }

    fn test_bundle() -> AnnotationBundle {
        let gene = AnnotationSet::build(
            "gene_embedding",
            vec![GenomicInterval::new("chr1", 150, 160, gene_fields("geneA", "+"))],
        )
        .unwrap();
        let chromatin = AnnotationSet::build(
            "chromatin_state",
            vec![GenomicInterval::new(
                "chr1",
                0,
                200,
                vec!["Enh".into(), "1.0".into(), "2.0".into(), "3.0".into(), "4.0".into()],
            )],
        )
        .unwrap();
        let hic = AnnotationSet::build(
            "hic",
            vec![GenomicInterval::new(
                "chr1",
                0,
                20000,
                vec!["1".into(), "2".into(), "3".into(), "4".into(), "5".into(), "6".into()],
            )],
        )
        .unwrap();
        AnnotationBundle::new(vec![
            gene,
            chromatin,
            scalar_set("insulation", "0.5"),
            scalar_set("directionality", "-0.25"),
            scalar_set("fire", "0.9"),
            scalar_set("compartment", "1.5"),
            hic,
        ])
    }

    fn query() -> Vec<GenomicInterval> {
        vec![
            GenomicInterval::new(
                "chr1",
                100,
                200,
                vec!["q1".into(), "0".into(), "+".into(), "5".into()],
            ),
            // no annotation set covers chr9
            GenomicInterval::new(
                "chr9",
                100,
                200,
                vec!["q2".into(), "0".into(), "-".into(), "7".into()],
            ),
        ]
    }

    #[test]
    fn test_write_table_layout() {
        let bundle = test_bundle();
        let queries = query();
        let joins = closest_all(&queries, &bundle, 1).unwrap();

        let mut buf = Vec::new();
        let stats = write_table(&mut buf, &queries, 1, &bundle, &joins).unwrap();
        assert_eq!(stats.rows, 2);
        assert_eq!(stats.matched, vec![1, 1, 1, 1, 1, 1, 1]);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);

        let header: Vec<&str> = lines[0].split('\t').collect();
        let row1: Vec<&str> = lines[1].split('\t').collect();
        let row2: Vec<&str> = lines[2].split('\t').collect();
        assert_eq!(header.len(), row1.len());
        assert_eq!(header.len(), row2.len());

        // matched row: gene block populated, TSS = 150 on the plus strand,
        // query midpoint 150 gives dist_TSS 0.0
        assert_eq!(row1[0], "chr1");
        assert_eq!(row1[7], "chr1"); // near_gene_chr
        assert_eq!(row1[8], "150");
        assert_eq!(row1[10], "geneA");
        let tss_col = header.iter().position(|c| *c == "TSS").unwrap();
        assert_eq!(row1[tss_col], "150");
        assert_eq!(row1[tss_col + 1], "0.0");
        assert_eq!(*row1.last().unwrap(), "6");

        // unmatched row: every annotation column empty, query columns intact
        assert_eq!(row2[0], "chr9");
        assert_eq!(row2[6], "7");
        assert!(row2[7..].iter().all(|f| f.is_empty()));
    }

    #[test]
    fn test_write_table_length_mismatch() {
        let bundle = test_bundle();
        let queries = query();
        let mut joins = closest_all(&queries, &bundle, 1).unwrap();
        joins[3].pop();

        let mut buf = Vec::new();
        let err = write_table(&mut buf, &queries, 1, &bundle, &joins).unwrap_err();
        assert!(matches!(err, Genome2VecError::Internal(_)));
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/data/peaks.bed")),
            PathBuf::from("/data/peaks_genome2vec.bed")
        );
        assert_eq!(
            default_output_path(Path::new("peaks.bed")),
            PathBuf::from("peaks_genome2vec.bed")
        );
    }
}
