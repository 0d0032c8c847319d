//! Row-to-shard resolution.
//!
//! [`resolve`] scans an ordered candidate list and returns the first shard
//! whose range contains the row. [`PartitionSet`] does the same for range
//! shards that were validated and sorted once up front, which allows a
//! binary search.

pub mod config;
pub mod set;

use crate::row::InputRow;
use crate::spec::ShardLookup;
use crate::Result;
use thiserror::Error;

pub use config::{ResolverConfig, SearchStrategy};
pub use set::{PartitionSet, PartitionSetError};

/// Errors specific to resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No candidate shard's range contains the row
    #[error("row[{row}] doesn't fit in any shard[{}]", .candidates.join(", "))]
    NoMatchingPartition {
        row: String,
        candidates: Vec<String>,
    },
}

impl ResolveError {
    pub(crate) fn no_match<'a, S, I>(row: &dyn InputRow, candidates: I) -> Self
    where
        S: ShardLookup + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        ResolveError::NoMatchingPartition {
            row: format!("{:?}", row),
            candidates: candidates.into_iter().map(ToString::to_string).collect(),
        }
    }
}

/// Returns the first candidate that contains `row`.
///
/// Candidates of one time chunk are expected to tile the row domain, so at
/// most one can match and the scan order only affects latency. A row that
/// matches nothing is reported with every candidate for diagnosis.
///
/// # Arguments
/// * `candidates` - Shards of one time chunk, scanned in order
/// * `row` - Row to place
///
/// # Returns
/// The matching shard, or `NoMatchingPartition` naming every candidate
pub fn resolve<'a, S: ShardLookup>(candidates: &'a [S], row: &dyn InputRow) -> Result<&'a S> {
    for spec in candidates {
        if spec.is_in_chunk(row)? {
            tracing::trace!(shard = %spec, "resolved row");
            return Ok(spec);
        }
    }

    tracing::warn!(
        row = ?row,
        candidates = candidates.len(),
        "row doesn't fit in any shard"
    );
    Err(ResolveError::no_match(row, candidates).into())
}
