//! Range shard specs: bucket, building and final forms.
//!
//! A [`RangeBucket`] comes out of range-partition planning without a
//! partition number. Once the catalog assigns one it converts into a
//! [`BuildingRangeShard`], and once every partition of the time chunk is
//! known it converts into a [`RangeShard`] carrying the core partition count.

use crate::range::{Bound, DimensionList, DimensionRange, RangeError};
use crate::row::InputRow;
use crate::spec::{RangeShardSpec, ShardLookup};
use crate::tuple::TupleError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Range partition identity before a partition number is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeBucketDef", into = "RangeBucketDef")]
pub struct RangeBucket {
    bucket_id: u32,
    range: DimensionRange,
}

impl RangeBucket {
    /// Creates a bucket, rejecting boundaries whose arity differs from the
    /// number of dimensions.
    ///
    /// # Arguments
    /// * `bucket_id` - Bucket identity assigned by partition planning
    /// * `dimensions` - Partition dimensions, shared with derived shards
    /// * `start` - Inclusive lower bound, unbounded for no constraint
    /// * `end` - Exclusive upper bound, unbounded for no constraint
    ///
    /// # Returns
    /// The bucket, or `InvalidBoundary` naming the offending side
    pub fn new(
        bucket_id: u32,
        dimensions: DimensionList,
        start: impl Into<Bound>,
        end: impl Into<Bound>,
    ) -> Result<Self, RangeError> {
        let range = DimensionRange::new(dimensions, start.into(), end.into())?;
        Ok(Self::from_range(bucket_id, range))
    }

    pub fn from_range(bucket_id: u32, range: DimensionRange) -> Self {
        Self { bucket_id, range }
    }

    pub fn bucket_id(&self) -> u32 {
        self.bucket_id
    }

    pub fn dimensions(&self) -> &DimensionList {
        self.range.dimensions()
    }

    pub fn start(&self) -> &Bound {
        self.range.start()
    }

    pub fn end(&self) -> &Bound {
        self.range.end()
    }

    /// Assigns a partition number.
    ///
    /// The result shares this bucket's dimension list and boundaries.
    /// Calling it again with the same number yields an equal shard.
    pub fn convert(&self, partition_id: u32) -> BuildingRangeShard {
        BuildingRangeShard {
            bucket_id: self.bucket_id,
            range: self.range.clone(),
            partition_id,
        }
    }
}

/// Range partition with an assigned partition number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BuildingRangeShardDef", into = "BuildingRangeShardDef")]
pub struct BuildingRangeShard {
    bucket_id: u32,
    range: DimensionRange,
    partition_id: u32,
}

impl BuildingRangeShard {
    pub fn new(
        bucket_id: u32,
        dimensions: DimensionList,
        start: impl Into<Bound>,
        end: impl Into<Bound>,
        partition_id: u32,
    ) -> Result<Self, RangeError> {
        Ok(RangeBucket::new(bucket_id, dimensions, start, end)?.convert(partition_id))
    }

    pub fn bucket_id(&self) -> u32 {
        self.bucket_id
    }

    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    pub fn dimensions(&self) -> &DimensionList {
        self.range.dimensions()
    }

    pub fn start(&self) -> &Bound {
        self.range.start()
    }

    pub fn end(&self) -> &Bound {
        self.range.end()
    }

    /// Finalizes the shard once the chunk's core partition count is known.
    pub fn convert(&self, num_core_partitions: u32) -> RangeShard {
        RangeShard {
            range: self.range.clone(),
            partition_id: self.partition_id,
            num_core_partitions,
        }
    }
}

/// Published range partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RangeShardDef", into = "RangeShardDef")]
pub struct RangeShard {
    range: DimensionRange,
    partition_id: u32,
    num_core_partitions: u32,
}

impl RangeShard {
    pub fn new(
        dimensions: DimensionList,
        start: impl Into<Bound>,
        end: impl Into<Bound>,
        partition_id: u32,
        num_core_partitions: u32,
    ) -> Result<Self, RangeError> {
        Ok(Self {
            range: DimensionRange::new(dimensions, start.into(), end.into())?,
            partition_id,
            num_core_partitions,
        })
    }

    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    pub fn num_core_partitions(&self) -> u32 {
        self.num_core_partitions
    }

    pub fn dimensions(&self) -> &DimensionList {
        self.range.dimensions()
    }

    pub fn start(&self) -> &Bound {
        self.range.start()
    }

    pub fn end(&self) -> &Bound {
        self.range.end()
    }
}

macro_rules! impl_range_lookup {
    ($($ty:ty),*) => {$(
        impl RangeShardSpec for $ty {
            fn range(&self) -> &DimensionRange {
                &self.range
            }
        }

        impl ShardLookup for $ty {
            fn is_in_chunk(&self, row: &dyn InputRow) -> Result<bool, TupleError> {
                self.range.contains(row)
            }
        }
    )*};
}

impl_range_lookup!(RangeBucket, BuildingRangeShard, RangeShard);

impl fmt::Display for RangeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RangeBucket{{bucketId={}, {}}}", self.bucket_id, self.range)
    }
}

impl fmt::Display for BuildingRangeShard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuildingRangeShard{{bucketId={}, partitionId={}, {}}}",
            self.bucket_id, self.partition_id, self.range
        )
    }
}

impl fmt::Display for RangeShard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RangeShard{{partitionId={}, numCorePartitions={}, {}}}",
            self.partition_id, self.num_core_partitions, self.range
        )
    }
}

// Wire forms. Deserialization goes through the validating constructors.

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeBucketDef {
    bucket_id: u32,
    dimensions: DimensionList,
    #[serde(default)]
    start: Bound,
    #[serde(default)]
    end: Bound,
}

impl TryFrom<RangeBucketDef> for RangeBucket {
    type Error = RangeError;

    fn try_from(def: RangeBucketDef) -> Result<Self, Self::Error> {
        RangeBucket::new(def.bucket_id, def.dimensions, def.start, def.end)
    }
}

impl From<RangeBucket> for RangeBucketDef {
    fn from(bucket: RangeBucket) -> Self {
        let RangeBucket { bucket_id, range } = bucket;
        Self {
            bucket_id,
            dimensions: range.dimensions().clone(),
            start: range.start().clone(),
            end: range.end().clone(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildingRangeShardDef {
    bucket_id: u32,
    dimensions: DimensionList,
    #[serde(default)]
    start: Bound,
    #[serde(default)]
    end: Bound,
    partition_id: u32,
}

impl TryFrom<BuildingRangeShardDef> for BuildingRangeShard {
    type Error = RangeError;

    fn try_from(def: BuildingRangeShardDef) -> Result<Self, Self::Error> {
        BuildingRangeShard::new(
            def.bucket_id,
            def.dimensions,
            def.start,
            def.end,
            def.partition_id,
        )
    }
}

impl From<BuildingRangeShard> for BuildingRangeShardDef {
    fn from(shard: BuildingRangeShard) -> Self {
        Self {
            bucket_id: shard.bucket_id,
            dimensions: shard.range.dimensions().clone(),
            start: shard.range.start().clone(),
            end: shard.range.end().clone(),
            partition_id: shard.partition_id,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RangeShardDef {
    dimensions: DimensionList,
    #[serde(default)]
    start: Bound,
    #[serde(default)]
    end: Bound,
    #[serde(alias = "partitionNum")]
    partition_id: u32,
    num_core_partitions: u32,
}

impl TryFrom<RangeShardDef> for RangeShard {
    type Error = RangeError;

    fn try_from(def: RangeShardDef) -> Result<Self, Self::Error> {
        RangeShard::new(
            def.dimensions,
            def.start,
            def.end,
            def.partition_id,
            def.num_core_partitions,
        )
    }
}

impl From<RangeShard> for RangeShardDef {
    fn from(shard: RangeShard) -> Self {
        Self {
            dimensions: shard.range.dimensions().clone(),
            start: shard.range.start().clone(),
            end: shard.range.end().clone(),
            partition_id: shard.partition_id,
            num_core_partitions: shard.num_core_partitions,
        }
    }
}
