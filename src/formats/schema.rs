//! Output schema for the seven annotation sources
//!
//! Each source contributes a fixed-width block of named columns to every
//! output row; this module owns those widths and names, the query column
//! names, and the TSS-derived fields computed after the gene join.

use crate::core::{GenomicInterval, Strand};

/// Width of the gene embedding vector
pub const GENE_EMBEDDING_DIM: usize = 512;

/// Width of the chromatin-state UMAP embedding
pub const CHROMATIN_EMBEDDING_DIM: usize = 4;

/// Number of Hi-C contact scalars
pub const HIC_SCALARS: usize = 6;

/// Fixed leading query columns: chrom, start, end, name, score, strand
pub const QUERY_FIXED_COLUMNS: usize = 6;

/// Minimum query columns: the fixed six plus at least one value column
pub const QUERY_MIN_COLUMNS: usize = QUERY_FIXED_COLUMNS + 1;

/// The seven annotation sources, in canonical output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationSource {
    /// Gene intervals with name, strand and a 512-dim embedding
    GeneEmbedding,
    /// Chromatin-state intervals with a state label and 4-dim embedding
    ChromatinState,
    /// Insulation score per window
    Insulation,
    /// Directionality index per window
    Directionality,
    /// FIRE score per window
    Fire,
    /// A/B compartment eigenvalue per window
    Compartment,
    /// Six Hi-C contact scalars per window
    HiC,
}

impl AnnotationSource {
    /// Canonical ordering of all sources; join results and output blocks
    /// are aligned with this array.
    pub const ALL: [AnnotationSource; 7] = [
        AnnotationSource::GeneEmbedding,
        AnnotationSource::ChromatinState,
        AnnotationSource::Insulation,
        AnnotationSource::Directionality,
        AnnotationSource::Fire,
        AnnotationSource::Compartment,
        AnnotationSource::HiC,
    ];

    /// Stable label used in diagnostics and statistics
    pub fn label(self) -> &'static str {
        match self {
            AnnotationSource::GeneEmbedding => "gene_embedding",
            AnnotationSource::ChromatinState => "chromatin_state",
            AnnotationSource::Insulation => "insulation",
            AnnotationSource::Directionality => "directionality",
            AnnotationSource::Fire => "fire",
            AnnotationSource::Compartment => "compartment",
            AnnotationSource::HiC => "hic",
        }
    }

    /// Fixed file name inside the annotation directory
    pub fn file_name(self) -> &'static str {
        match self {
            AnnotationSource::GeneEmbedding => "gene_embed.bed",
            AnnotationSource::ChromatinState => "chromHMM_200bp_UMAPembed.bed",
            AnnotationSource::Insulation => "40k_is.sort.bed",
            AnnotationSource::Directionality => "40k_di.sort.bed",
            AnnotationSource::Fire => "40k_fire.sort.bed",
            AnnotationSource::Compartment => "250k_hesc_ab.sort.bed",
            AnnotationSource::HiC => "20k_hic.sort.bed",
        }
    }

    /// Expected number of payload columns after chrom/start/end
    pub fn payload_width(self) -> usize {
        match self {
            // name, strand, embedding
            AnnotationSource::GeneEmbedding => 2 + GENE_EMBEDDING_DIM,
            // state label, embedding
            AnnotationSource::ChromatinState => 1 + CHROMATIN_EMBEDDING_DIM,
            AnnotationSource::Insulation
            | AnnotationSource::Directionality
            | AnnotationSource::Fire
            | AnnotationSource::Compartment => 1,
            AnnotationSource::HiC => HIC_SCALARS,
        }
    }

    /// Number of columns this source contributes to each output row
    pub fn output_width(self) -> usize {
        match self {
            // matched coordinates + payload + TSS + dist_TSS
            AnnotationSource::GeneEmbedding => 3 + self.payload_width() + 2,
            _ => self.payload_width(),
        }
    }

    /// Append this source's output column names
    pub fn append_columns(self, columns: &mut Vec<String>) {
        match self {
            AnnotationSource::GeneEmbedding => {
                for name in [
                    "near_gene_chr",
                    "near_gene_start",
                    "near_gene_end",
                    "near_gene_name",
                    "near_gene_strand",
                ] {
                    columns.push(name.to_string());
                }
                for i in 1..=GENE_EMBEDDING_DIM {
                    columns.push(format!("scGPT_emb_{}", i));
                }
                columns.push("TSS".to_string());
                columns.push("dist_TSS".to_string());
            }
            AnnotationSource::ChromatinState => {
                columns.push("chromHMM_name".to_string());
                for i in 1..=CHROMATIN_EMBEDDING_DIM {
                    columns.push(format!("chromHMM_UMAPemb_{}", i));
                }
            }
            AnnotationSource::Insulation => columns.push("is_value".to_string()),
            AnnotationSource::Directionality => columns.push("di_value".to_string()),
            AnnotationSource::Fire => columns.push("fi_value".to_string()),
            AnnotationSource::Compartment => columns.push("ab_value".to_string()),
            AnnotationSource::HiC => {
                for name in ["hic_matx", "hic_maty", "hic_matz", "hic_fatx", "hic_faty", "hic_fatz"]
                {
                    columns.push(name.to_string());
                }
            }
        }
    }
}

/// Query column names for a query with `value_columns` trailing values
pub fn query_columns(value_columns: usize) -> Vec<String> {
    let mut columns: Vec<String> = [
        "query_chr",
        "query_start",
        "query_end",
        "query_name",
        "query_score",
        "query_strand",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for i in 1..=value_columns {
        columns.push(format!("query_value_{}", i));
    }
    columns
}

/// Full output header in canonical column order
pub fn output_header(value_columns: usize) -> Vec<String> {
    let mut columns = query_columns(value_columns);
    for source in AnnotationSource::ALL {
        source.append_columns(&mut columns);
    }
    columns
}

/// Transcription start site of a matched gene record.
///
/// The strand sits in the second payload column; a '+' strand anchors the
/// TSS at the interval start, anything else at the end.
pub fn tss(gene: &GenomicInterval) -> u64 {
    match gene.field(1).and_then(Strand::from_symbol) {
        Some(Strand::Plus) => gene.start,
        _ => gene.end,
    }
}

/// Signed distance from the query midpoint to the TSS
pub fn dist_tss(query: &GenomicInterval, tss: u64) -> f64 {
    (query.start + query.end) as f64 / 2.0 - tss as f64
}
