//! Multi-source closest-feature join engine
//!
//! An `AnnotationBundle` holds every annotation collection for a run, built
//! once and passed by reference; `closest_all` joins each query interval
//! against each collection independently, preserving query order in every
//! result vector. Rows are independent of each other, so the parallel path
//! fans out over query-row chunks with no shared mutable state.

use crate::core::error::{Genome2VecError, Result};
use crate::core::index::{ClosestHit, ClosestIndex};
use crate::core::interval::GenomicInterval;
use rayon::prelude::*;

/// Rows per parallel work unit
const CHUNK_SIZE: usize = 10_000;

/// One named, immutable annotation collection plus its closest-interval
/// index. Records keep their original input order; `ClosestHit.record`
/// indexes into them.
#[derive(Debug)]
pub struct AnnotationSet {
    name: &'static str,
    records: Vec<GenomicInterval>,
    index: ClosestIndex,
}

impl AnnotationSet {
    /// Index a collection of annotation records.
    pub fn build(name: &'static str, records: Vec<GenomicInterval>) -> Result<Self> {
        let index = ClosestIndex::build(&records)?;
        Ok(Self {
            name,
            records,
            index,
        })
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn records(&self) -> &[GenomicInterval] {
        &self.records
    }

    /// Record by original input index
    pub fn record(&self, index: usize) -> &GenomicInterval {
        &self.records[index]
    }

    pub fn index(&self) -> &ClosestIndex {
        &self.index
    }

    /// Closest record to one query interval
    pub fn closest(&self, query: &GenomicInterval) -> Option<ClosestHit> {
        self.index.nearest(&query.chrom, query.start, query.end)
    }
}

/// All annotation sets for a run, in canonical source order. Built once at
/// startup and never mutated afterwards.
#[derive(Debug)]
pub struct AnnotationBundle {
    sets: Vec<AnnotationSet>,
}

impl AnnotationBundle {
    pub fn new(sets: Vec<AnnotationSet>) -> Self {
        Self { sets }
    }

    pub fn sets(&self) -> &[AnnotationSet] {
        &self.sets
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: usize) -> &AnnotationSet {
        &self.sets[index]
    }
}

/// Join results: `table[set][row]` is the closest hit of `queries[row]`
/// within `bundle.sets()[set]`.
pub type JoinTable = Vec<Vec<Option<ClosestHit>>>;

/// Compute the closest match for every (query row, annotation set) pair.
///
/// Result vectors are index-aligned with `queries`; `threads <= 1` runs
/// sequentially, larger values fan out over row chunks on a dedicated rayon
/// pool. Both paths produce identical tables.
pub fn closest_all(
    queries: &[GenomicInterval],
    bundle: &AnnotationBundle,
    threads: usize,
) -> Result<JoinTable> {
    if threads > 1 {
        closest_all_parallel(queries, bundle, threads)
    } else {
        Ok(closest_all_sequential(queries, bundle))
    }
}

fn closest_all_sequential(queries: &[GenomicInterval], bundle: &AnnotationBundle) -> JoinTable {
    bundle
        .sets()
        .iter()
        .map(|set| queries.iter().map(|q| set.closest(q)).collect())
        .collect()
}

fn closest_all_parallel(
    queries: &[GenomicInterval],
    bundle: &AnnotationBundle,
    threads: usize,
) -> Result<JoinTable> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| Genome2VecError::Internal(format!("failed to create thread pool: {}", e)))?;

    let table = pool.install(|| {
        bundle
            .sets()
            .iter()
            .map(|set| {
                // chunk results come back indexed, so flattening them in
                // order reproduces the sequential row order exactly
                let chunks: Vec<Vec<Option<ClosestHit>>> = queries
                    .par_chunks(CHUNK_SIZE)
                    .map(|chunk| chunk.iter().map(|q| set.closest(q)).collect())
                    .collect();

                let mut rows = Vec::with_capacity(queries.len());
                for chunk in chunks {
                    rows.extend(chunk);
                }
                rows
            })
            .collect()
    });

    Ok(table)
}
