//! Configuration for partition set resolution.

use serde::{Deserialize, Serialize};

/// How a [`PartitionSet`](super::PartitionSet) finds the shard for a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// Scan shards in start order
    Linear,
    /// Binary search over sorted start boundaries
    #[default]
    Binary,
}

/// Configuration for partition sets.
///
/// Controls how strictly a set of range shards is validated when it is built
/// and how rows are looked up afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResolverConfig {
    /// Lookup strategy used by `PartitionSet::resolve`
    pub search: SearchStrategy,

    /// Whether the shards must cover every possible row
    ///
    /// With this set, a set with a bounded first start, a bounded last end
    /// or a gap between neighbours is rejected at construction. Without it
    /// such sets are accepted and rows falling in the holes fail to resolve.
    pub require_exhaustive: bool,
}

impl ResolverConfig {
    /// Creates a resolver configuration.
    ///
    /// # Arguments
    /// * `search` - Lookup strategy used by partition sets
    /// * `require_exhaustive` - Whether sets must cover every row
    pub fn new(search: SearchStrategy, require_exhaustive: bool) -> Self {
        Self {
            search,
            require_exhaustive,
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            search: SearchStrategy::Binary,
            require_exhaustive: true,
        }
    }
}
