//! Occupancy statistics for a lookup table.

use serde::{Deserialize, Serialize};

/// Aggregate bucket occupancy across all partitions of a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableStats {
    /// Number of partitions.
    pub partitions: usize,
    /// Populated buckets summed over partitions. Empty buckets are dropped on
    /// erase, so every counted bucket has at least one member.
    pub buckets: usize,
    /// Bucket memberships summed over partitions; always
    /// `table.len() * partitions`.
    pub vectors: usize,
}

impl TableStats {
    /// Average number of ids per populated bucket.
    pub fn mean_bucket_size(&self) -> f64 {
        if self.buckets == 0 {
            0.0
        } else {
            self.vectors as f64 / self.buckets as f64
        }
    }

    /// Fold one partition's bucket sizes into the totals.
    pub(super) fn record_partition<I: IntoIterator<Item = usize>>(&mut self, bucket_sizes: I) {
        self.partitions += 1;
        for size in bucket_sizes {
            self.buckets += 1;
            self.vectors += size;
        }
    }
}
