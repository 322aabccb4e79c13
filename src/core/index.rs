//! Interval index for efficient closest-feature queries
//!
//! Partitions one annotation collection by chromosome and keeps each
//! partition sorted by start so a nearest query is a binary search plus a
//! bounded scan of the surrounding entries. O(log n) per query after an
//! O(n log n) build.

use crate::core::error::DataError;
use crate::core::interval::{gap_distance, GenomicInterval};
use std::collections::HashMap;

/// The single closest annotation interval for one query range.
///
/// `record` is the index of the matched interval in the collection's
/// original input order; `distance` is 0 when the intervals overlap,
/// otherwise the gap between the nearer endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosestHit {
    pub record: usize,
    pub distance: u64,
}

/// One indexed interval. `record` is the position in the original input,
/// which doubles as the tie-break key.
#[derive(Debug, Clone, Copy)]
struct IndexEntry {
    start: u64,
    end: u64,
    record: usize,
}

/// Per-chromosome slice of the index.
///
/// `max_end` holds the running maximum of interval ends over `entries[..=i]`,
/// which bounds how far a leftward nearest scan must look: no entry at or
/// before `i` can come closer than `query.start - max_end[i]`.
#[derive(Debug, Default)]
struct ChromPartition {
    entries: Vec<IndexEntry>,
    max_end: Vec<u64>,
}

impl ChromPartition {
    fn finish(&mut self) {
        // Sort key includes the record index so equal starts keep input
        // order without relying on sort stability.
        self.entries.sort_by_key(|e| (e.start, e.record));
        let mut running = 0u64;
        self.max_end = self
            .entries
            .iter()
            .map(|e| {
                running = running.max(e.end);
                running
            })
            .collect();
    }
}

/// Closest-interval index over one annotation collection, organized by
/// chromosome.
#[derive(Debug, Default)]
pub struct ClosestIndex {
    partitions: HashMap<String, ChromPartition>,
    total: usize,
}

impl ClosestIndex {
    /// Build an index from annotation records in input order.
    ///
    /// Rejects intervals with `start > end` rather than dropping them.
    pub fn build(records: &[GenomicInterval]) -> Result<Self, DataError> {
        let mut partitions: HashMap<String, ChromPartition> = HashMap::new();

        for (record, iv) in records.iter().enumerate() {
            if iv.start > iv.end {
                return Err(DataError::UnorderedInterval {
                    chrom: iv.chrom.clone(),
                    start: iv.start,
                    end: iv.end,
                });
            }
            partitions
                .entry(iv.chrom.clone())
                .or_default()
                .entries
                .push(IndexEntry {
                    start: iv.start,
                    end: iv.end,
                    record,
                });
        }

        for partition in partitions.values_mut() {
            partition.finish();
        }

        Ok(Self {
            partitions,
            total: records.len(),
        })
    }

    /// Find the closest interval to `[start, end)` on `chrom`.
    ///
    /// Returns `None` when the chromosome has no intervals in this index.
    /// Among candidates at equal minimum distance the one appearing first in
    /// the original input wins, regardless of coordinate order.
    pub fn nearest(&self, chrom: &str, start: u64, end: u64) -> Option<ClosestHit> {
        let partition = self.partitions.get(chrom)?;
        let entries = &partition.entries;
        let insertion = entries.partition_point(|e| e.start < start);

        let mut best: Option<ClosestHit> = None;

        // Rightward: starts are non-decreasing, so once the start-side gap
        // exceeds the best distance nothing further can win or tie.
        for entry in &entries[insertion..] {
            let floor = entry.start.saturating_sub(end);
            if let Some(hit) = best {
                if floor > hit.distance {
                    break;
                }
            }
            consider(&mut best, entry, start, end);
        }

        // Leftward: an early entry can still reach the query through a long
        // interval, so the stop condition uses the prefix maximum of ends.
        for (i, entry) in entries[..insertion].iter().enumerate().rev() {
            let floor = start.saturating_sub(partition.max_end[i]);
            if let Some(hit) = best {
                if floor > hit.distance {
                    break;
                }
            }
            consider(&mut best, entry, start, end);
        }

        best
    }

    /// Check if a chromosome has any intervals in this index
    pub fn has_chrom(&self, chrom: &str) -> bool {
        self.partitions.contains_key(chrom)
    }

    /// All chromosome names present in the index
    pub fn chromosomes(&self) -> impl Iterator<Item = &str> {
        self.partitions.keys().map(|s| s.as_str())
    }

    /// Number of chromosomes with at least one interval
    pub fn chromosome_count(&self) -> usize {
        self.partitions.len()
    }

    /// Number of intervals on one chromosome
    pub fn interval_count(&self, chrom: &str) -> usize {
        self.partitions.get(chrom).map(|p| p.entries.len()).unwrap_or(0)
    }

    /// Total number of indexed intervals
    pub fn total_intervals(&self) -> usize {
        self.total
    }
}

/// Fold one candidate into the running best. Strictly smaller distance wins;
/// at equal distance the smaller original record index wins.
fn consider(best: &mut Option<ClosestHit>, entry: &IndexEntry, start: u64, end: u64) {
    let distance = gap_distance(start, end, entry.start, entry.end);
    let replace = match best {
        None => true,
        Some(hit) => {
            distance < hit.distance || (distance == hit.distance && entry.record < hit.record)
        }
    };
    if replace {
        *best = Some(ClosestHit {
            record: entry.record,
            distance,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(chrom: &str, start: u64, end: u64) -> GenomicInterval {
        GenomicInterval::new(chrom, start, end, vec![])
    }

    fn build(records: &[GenomicInterval]) -> ClosestIndex {
        ClosestIndex::build(records).unwrap()
    }

    #[test]
    fn test_build_counts() {
        let index = build(&[iv("chr1", 100, 200), iv("chr1", 300, 400), iv("chr2", 50, 60)]);
        assert_eq!(index.total_intervals(), 3);
        assert_eq!(index.chromosome_count(), 2);
        assert_eq!(index.interval_count("chr1"), 2);
        assert_eq!(index.interval_count("chr3"), 0);
        assert!(index.has_chrom("chr2"));
        assert!(!index.has_chrom("chr3"));
    }

    #[test]
    fn test_build_rejects_unordered() {
        let result = ClosestIndex::build(&[iv("chr1", 200, 100)]);
        assert!(matches!(result, Err(DataError::UnorderedInterval { .. })));
    }

    #[test]
    fn test_nearest_overlap_is_zero() {
        let index = build(&[iv("chr1", 150, 160)]);
        let hit = index.nearest("chr1", 100, 200).unwrap();
        assert_eq!(hit.record, 0);
        assert_eq!(hit.distance, 0);
    }

    #[test]
    fn test_nearest_gap() {
        let index = build(&[iv("chr1", 100, 200), iv("chr1", 500, 600)]);
        // closer to the left interval
        let hit = index.nearest("chr1", 250, 260).unwrap();
        assert_eq!(hit.record, 0);
        assert_eq!(hit.distance, 50);
        // closer to the right interval
        let hit = index.nearest("chr1", 460, 470).unwrap();
        assert_eq!(hit.record, 1);
        assert_eq!(hit.distance, 30);
    }

    #[test]
    fn test_nearest_missing_chrom() {
        let index = build(&[iv("chr1", 100, 200)]);
        assert!(index.nearest("chr2", 100, 200).is_none());
    }

    #[test]
    fn test_tie_break_prefers_input_order() {
        // both at distance 20; record 0 sits to the right, record 1 to the
        // left with the smaller start
        let index = build(&[iv("chr1", 130, 140), iv("chr1", 70, 80)]);
        let hit = index.nearest("chr1", 100, 110).unwrap();
        assert_eq!(hit.record, 0);
        assert_eq!(hit.distance, 20);

        // swapping the input order flips the winner
        let index = build(&[iv("chr1", 70, 80), iv("chr1", 130, 140)]);
        let hit = index.nearest("chr1", 100, 110).unwrap();
        assert_eq!(hit.record, 0);
    }

    #[test]
    fn test_long_interval_found_through_prefix_max() {
        // record 0 spans the whole region; records with larger starts sit
        // between it and the query in start order
        let index = build(&[
            iv("chr1", 0, 10_000),
            iv("chr1", 2_000, 2_010),
            iv("chr1", 4_000, 4_010),
        ]);
        let hit = index.nearest("chr1", 9_500, 9_600).unwrap();
        assert_eq!(hit.record, 0);
        assert_eq!(hit.distance, 0);
    }

    #[test]
    fn test_touching_interval_is_distance_zero() {
        let index = build(&[iv("chr1", 200, 300)]);
        let hit = index.nearest("chr1", 100, 200).unwrap();
        assert_eq!(hit.distance, 0);
    }

    #[test]
    fn test_equal_starts_keep_input_order() {
        let index = build(&[iv("chr1", 100, 110), iv("chr1", 100, 110)]);
        let hit = index.nearest("chr1", 100, 105).unwrap();
        assert_eq!(hit.record, 0);
    }
}
