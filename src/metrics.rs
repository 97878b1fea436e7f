//! Observability for store operations
//!
//! Counters are cumulative for the lifetime of a [`crate::KeyValueStore`];
//! usage is a point-in-time snapshot for quota monitoring.

use serde::{Deserialize, Serialize};

/// Cumulative operation counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreMetrics {
    /// Successful `set` calls
    pub writes: u64,

    /// `set` calls that returned false (serialization or medium rejection)
    pub rejected_writes: u64,

    /// `get` calls that returned a value
    pub hits: u64,

    /// `get` calls on absent keys
    pub misses: u64,

    /// `get` calls that found text they could not decode
    pub corrupt_reads: u64,

    /// `remove` calls that deleted an entry
    pub removals: u64,

    /// `clear` and `clear_prefix` calls
    pub clears: u64,
}

impl StoreMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Total `get` calls
    pub fn reads(&self) -> u64 {
        self.hits + self.misses + self.corrupt_reads
    }

    /// Fraction of reads that returned a value (0.0 with no reads)
    pub fn hit_ratio(&self) -> f64 {
        match self.reads() {
            0 => 0.0,
            reads => self.hits as f64 / reads as f64,
        }
    }
}

/// Storage usage snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Number of stored entries
    pub entries: usize,

    /// Approximate bytes in use (UTF-8 key + serialized value)
    pub bytes: usize,

    /// Medium quota, if one is configured
    pub quota: Option<usize>,
}

impl StorageUsage {
    /// Used fraction of the quota
    pub fn utilization(&self) -> Option<f64> {
        match self.quota {
            Some(0) => Some(1.0),
            Some(quota) => Some(self.bytes as f64 / quota as f64),
            None => None,
        }
    }

    /// Bytes left before the quota rejects writes
    pub fn remaining(&self) -> Option<usize> {
        self.quota.map(|quota| quota.saturating_sub(self.bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = StoreMetrics::new();
        assert_eq!(metrics.writes, 0);
        assert_eq!(metrics.reads(), 0);
        assert_eq!(metrics.hit_ratio(), 0.0);
    }

    #[test]
    fn test_hit_ratio() {
        let metrics = StoreMetrics {
            hits: 3,
            misses: 1,
            ..StoreMetrics::new()
        };
        assert!((metrics.hit_ratio() - 0.75).abs() < 0.001);
    }

    #[test]
    fn test_corrupt_reads_count_as_reads() {
        let metrics = StoreMetrics {
            hits: 1,
            corrupt_reads: 1,
            ..StoreMetrics::new()
        };
        assert_eq!(metrics.reads(), 2);
        assert!((metrics.hit_ratio() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_usage_without_quota() {
        let usage = StorageUsage {
            entries: 2,
            bytes: 100,
            quota: None,
        };
        assert_eq!(usage.utilization(), None);
        assert_eq!(usage.remaining(), None);
    }

    #[test]
    fn test_usage_with_quota() {
        let usage = StorageUsage {
            entries: 1,
            bytes: 250,
            quota: Some(1000),
        };
        assert!((usage.utilization().unwrap() - 0.25).abs() < 0.001);
        assert_eq!(usage.remaining(), Some(750));
    }
}
