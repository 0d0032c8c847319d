//! Validated, sorted range shards of one time chunk.
//!
//! A [`PartitionSet`] is built once from the chunk's range shards and then
//! only read. Construction enforces what the linear resolver has to trust:
//! every shard uses the same dimension list and no two ranges overlap.
//! Optionally it also rejects sets that leave part of the row domain
//! uncovered.

use crate::range::{project_row, DimensionList};
use crate::resolve::{resolve, ResolveError, ResolverConfig, SearchStrategy};
use crate::row::InputRow;
use crate::spec::RangeShardSpec;
use crate::Result;
use std::cmp::Ordering;
use thiserror::Error;

/// Errors specific to partition set construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionSetError {
    /// A shard uses a different dimension list than the first one
    #[error("shard {shard} has dimensions {actual}, expected {expected}")]
    DimensionMismatch {
        shard: String,
        expected: String,
        actual: String,
    },

    /// Two shards share part of their range
    #[error("shards overlap: {left} and {right}")]
    Overlap { left: String, right: String },

    /// Rows between two neighbouring shards have no shard
    #[error("gap between shards: {left} and {right}")]
    Gap { left: String, right: String },

    /// Rows below the first start have no shard
    #[error("first shard has a bounded start: {0}")]
    OpenStart(String),

    /// Rows at or above the last end have no shard
    #[error("last shard has a bounded end: {0}")]
    OpenEnd(String),

    /// An exhaustive set needs at least one shard
    #[error("partition set is empty")]
    Empty,
}

/// Range shards of one time chunk, sorted by start.
#[derive(Debug, Clone)]
pub struct PartitionSet<S> {
    shards: Vec<S>,
    dimensions: Option<DimensionList>,
    search: SearchStrategy,
}

impl<S: RangeShardSpec> PartitionSet<S> {
    /// Validates and sorts `shards`.
    ///
    /// Shards are ordered by start, unbounded first, then by end, unbounded
    /// last.
    ///
    /// # Arguments
    /// * `shards` - Range shards of one time chunk, in any order
    /// * `config` - Search strategy and whether gaps are rejected
    ///
    /// # Returns
    /// The sorted set, or the first validation failure found
    pub fn new(
        mut shards: Vec<S>,
        config: &ResolverConfig,
    ) -> std::result::Result<Self, PartitionSetError> {
        let dimensions = shards.first().map(|s| s.range().dimensions().clone());

        if let Some(expected) = &dimensions {
            for shard in &shards {
                let actual = shard.range().dimensions();
                if actual != expected {
                    return Err(PartitionSetError::DimensionMismatch {
                        shard: shard.to_string(),
                        expected: expected.to_string(),
                        actual: actual.to_string(),
                    });
                }
            }
        }

        shards.sort_by(|a, b| {
            let (a, b) = (a.range(), b.range());
            a.start()
                .cmp_as_start(b.start())
                .then_with(|| a.end().cmp_as_end(b.end()))
        });

        for pair in shards.windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            match left.range().end().cmp_end_to_start(right.range().start()) {
                Ordering::Greater => {
                    return Err(PartitionSetError::Overlap {
                        left: left.to_string(),
                        right: right.to_string(),
                    });
                }
                Ordering::Less if config.require_exhaustive => {
                    return Err(PartitionSetError::Gap {
                        left: left.to_string(),
                        right: right.to_string(),
                    });
                }
                _ => {}
            }
        }

        if config.require_exhaustive {
            let (first, last) = match (shards.first(), shards.last()) {
                (Some(first), Some(last)) => (first, last),
                _ => return Err(PartitionSetError::Empty),
            };
            if first.range().start().is_bounded() {
                return Err(PartitionSetError::OpenStart(first.to_string()));
            }
            if last.range().end().is_bounded() {
                return Err(PartitionSetError::OpenEnd(last.to_string()));
            }
        }

        tracing::debug!(
            shards = shards.len(),
            dimensions = dimensions.as_ref().map_or(0, |d| d.len()),
            search = ?config.search,
            exhaustive = config.require_exhaustive,
            "built partition set"
        );

        Ok(Self {
            shards,
            dimensions,
            search: config.search,
        })
    }

    /// Returns the shard whose range contains `row`.
    pub fn resolve(&self, row: &dyn InputRow) -> Result<&S> {
        match self.search {
            SearchStrategy::Linear => resolve(&self.shards, row),
            SearchStrategy::Binary => self.binary_search(row),
        }
    }

    fn binary_search(&self, row: &dyn InputRow) -> Result<&S> {
        let dimensions = match &self.dimensions {
            Some(dimensions) => dimensions,
            None => return Err(self.no_match(row)),
        };
        let tuple = project_row(dimensions, row);

        // Shards are sorted by start, so the only candidate is the last one
        // starting at or below the row.
        let idx = self.shards.partition_point(|shard| {
            shard
                .range()
                .start()
                .as_tuple()
                .map_or(true, |start| start <= &tuple)
        });

        if let Some(shard) = idx.checked_sub(1).map(|i| &self.shards[i]) {
            if shard.range().contains_tuple(&tuple)? {
                tracing::trace!(shard = %shard, "resolved row");
                return Ok(shard);
            }
        }
        Err(self.no_match(row))
    }

    fn no_match(&self, row: &dyn InputRow) -> crate::Error {
        tracing::warn!(
            row = ?row,
            candidates = self.shards.len(),
            "row doesn't fit in any shard"
        );
        ResolveError::no_match(row, &self.shards).into()
    }
}

impl<S> PartitionSet<S> {
    /// Shards in start order.
    pub fn shards(&self) -> &[S] {
        &self.shards
    }

    /// Shared dimension list, `None` for an empty set.
    pub fn dimensions(&self) -> Option<&DimensionList> {
        self.dimensions.as_ref()
    }

    pub fn len(&self) -> usize {
        self.shards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shards.is_empty()
    }

    pub fn into_shards(self) -> Vec<S> {
        self.shards
    }
}
