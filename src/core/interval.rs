//! Genomic interval representation
//!
//! Intervals use 0-based, half-open coordinates (BED convention). Columns
//! after `end` are carried verbatim as opaque payload fields; the schema
//! layer assigns meaning to them per input source.

/// A genomic interval plus its trailing payload columns.
///
/// For query records the payload starts with `name`, `score`, `strand`;
/// for annotation records its layout is fixed per annotation source.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenomicInterval {
    /// Chromosome name
    pub chrom: String,
    /// Start position (0-based, inclusive)
    pub start: u64,
    /// End position (exclusive)
    pub end: u64,
    /// Columns after `end`, verbatim
    pub fields: Vec<String>,
}

impl GenomicInterval {
    pub fn new(chrom: impl Into<String>, start: u64, end: u64, fields: Vec<String>) -> Self {
        Self {
            chrom: chrom.into(),
            start,
            end,
            fields,
        }
    }

    /// Payload field by index (0 = first column after `end`)
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(|s| s.as_str())
    }

    /// Interval length in bases
    pub fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// True for zero-length intervals (insertion points)
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Gap distance to another range on the same chromosome
    pub fn distance_to(&self, start: u64, end: u64) -> u64 {
        gap_distance(self.start, self.end, start, end)
    }
}

/// Distance between two ranges: 0 if they overlap or touch, otherwise the
/// gap between the nearer endpoints.
pub fn gap_distance(a_start: u64, a_end: u64, b_start: u64, b_end: u64) -> u64 {
    if b_start >= a_end {
        b_start - a_end
    } else if a_start >= b_end {
        a_start - b_end
    } else {
        0
    }
}

/// Strand direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strand {
    #[default]
    Plus,
    Minus,
}

impl Strand {
    /// Parse strand from char ('.' maps to None)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Strand::Plus),
            '-' => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Parse a strand column ("+", "-", ".")
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Strand::Plus),
            "-" => Some(Strand::Minus),
            _ => None,
        }
    }

    /// Convert to char for output
    pub fn to_char(self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

/// True if `s` is an acceptable strand column value
pub fn valid_strand_symbol(s: &str) -> bool {
    matches!(s, "+" | "-" | ".")
}
