//! Shard spec families.
//!
//! A shard spec goes through three forms over its lifetime:
//!
//! - [`BucketShardSpec`]: produced by partition planning, no partition number yet
//! - [`BuildingShardSpec`]: a partition number has been assigned
//! - [`ShardSpec`]: the time chunk's core partition count is known
//!
//! Each form is a closed enum over the range and hash families. All of them
//! answer [`ShardLookup::is_in_chunk`], which is what resolution runs on.

pub mod hash;
pub mod range;

use crate::range::DimensionRange;
use crate::row::InputRow;
use crate::tuple::TupleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use hash::{select_bucket, BuildingHashShard, HashBucket, HashShard};
pub use range::{BuildingRangeShard, RangeBucket, RangeShard};

/// Errors specific to shard spec construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    /// Hash partitioning needs at least one bucket
    #[error("invalid bucket count {0}: must be greater than 0")]
    InvalidBucketCount(u32),

    /// Bucket id falls outside the bucket count
    #[error("bucket id {bucket_id} out of range for {num_buckets} buckets")]
    BucketOutOfRange { bucket_id: u32, num_buckets: u32 },

    /// Hash partitioning needs at least one dimension
    #[error("hash partitioning requires at least one partition dimension")]
    EmptyPartitionDimensions,
}

/// Membership test shared by every shard spec form.
pub trait ShardLookup: fmt::Display {
    /// Whether `row` belongs to this shard.
    ///
    /// Fails only on an internal arity mismatch, which indicates a broken
    /// row projection rather than bad data.
    fn is_in_chunk(&self, row: &dyn InputRow) -> Result<bool, TupleError>;
}

/// Shard specs that own a dimension range.
pub trait RangeShardSpec: ShardLookup {
    fn range(&self) -> &DimensionRange;
}

/// Shard identity before a partition number is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BucketShardSpec {
    #[serde(rename = "bucket_range")]
    Range(RangeBucket),
    #[serde(rename = "bucket_hash")]
    Hash(HashBucket),
}

impl BucketShardSpec {
    pub fn bucket_id(&self) -> u32 {
        match self {
            BucketShardSpec::Range(spec) => spec.bucket_id(),
            BucketShardSpec::Hash(spec) => spec.bucket_id(),
        }
    }

    /// Assigns a partition number, keeping every other field.
    pub fn convert(&self, partition_id: u32) -> BuildingShardSpec {
        match self {
            BucketShardSpec::Range(spec) => BuildingShardSpec::Range(spec.convert(partition_id)),
            BucketShardSpec::Hash(spec) => BuildingShardSpec::Hash(spec.convert(partition_id)),
        }
    }
}

/// Shard with an assigned partition number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BuildingShardSpec {
    #[serde(rename = "building_range")]
    Range(BuildingRangeShard),
    #[serde(rename = "building_hashed")]
    Hash(BuildingHashShard),
}

impl BuildingShardSpec {
    pub fn bucket_id(&self) -> u32 {
        match self {
            BuildingShardSpec::Range(spec) => spec.bucket_id(),
            BuildingShardSpec::Hash(spec) => spec.bucket_id(),
        }
    }

    pub fn partition_id(&self) -> u32 {
        match self {
            BuildingShardSpec::Range(spec) => spec.partition_id(),
            BuildingShardSpec::Hash(spec) => spec.partition_id(),
        }
    }

    /// Attaches the core partition count of the time chunk.
    pub fn convert(&self, num_core_partitions: u32) -> ShardSpec {
        match self {
            BuildingShardSpec::Range(spec) => ShardSpec::Range(spec.convert(num_core_partitions)),
            BuildingShardSpec::Hash(spec) => ShardSpec::Hash(spec.convert(num_core_partitions)),
        }
    }
}

/// Published shard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShardSpec {
    #[serde(rename = "range")]
    Range(RangeShard),
    #[serde(rename = "hashed")]
    Hash(HashShard),
}

impl ShardSpec {
    pub fn partition_id(&self) -> u32 {
        match self {
            ShardSpec::Range(spec) => spec.partition_id(),
            ShardSpec::Hash(spec) => spec.partition_id(),
        }
    }

    pub fn num_core_partitions(&self) -> u32 {
        match self {
            ShardSpec::Range(spec) => spec.num_core_partitions(),
            ShardSpec::Hash(spec) => spec.num_core_partitions(),
        }
    }
}

macro_rules! impl_enum_lookup {
    ($($ty:ident),*) => {$(
        impl ShardLookup for $ty {
            fn is_in_chunk(&self, row: &dyn InputRow) -> Result<bool, TupleError> {
                match self {
                    $ty::Range(spec) => spec.is_in_chunk(row),
                    $ty::Hash(spec) => spec.is_in_chunk(row),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $ty::Range(spec) => write!(f, "{}", spec),
                    $ty::Hash(spec) => write!(f, "{}", spec),
                }
            }
        }
    )*};
}

impl_enum_lookup!(BucketShardSpec, BuildingShardSpec, ShardSpec);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::DimensionList;
    use crate::row::MapInputRow;
    use crate::tuple::StringTuple;

    fn range_bucket() -> BucketShardSpec {
        BucketShardSpec::Range(
            RangeBucket::new(
                1,
                DimensionList::new(["country", "city"]),
                StringTuple::of(["US", "Boston"]),
                crate::range::Bound::Unbounded,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_lifecycle() {
        let bucket = range_bucket();
        let building = bucket.convert(3);
        assert_eq!(building.bucket_id(), 1);
        assert_eq!(building.partition_id(), 3);
        assert!(matches!(building, BuildingShardSpec::Range(_)));

        let published = building.convert(4);
        assert_eq!(published.partition_id(), 3);
        assert_eq!(published.num_core_partitions(), 4);
    }

    #[test]
    fn test_convert_is_idempotent() {
        let bucket = range_bucket();
        assert_eq!(bucket.convert(2), bucket.convert(2));

        let hash = BucketShardSpec::Hash(HashBucket::new(0, 2, DimensionList::new(["a"])).unwrap());
        assert_eq!(hash.convert(2), hash.convert(2));
    }

    #[test]
    fn test_lookup_dispatch() {
        let row = MapInputRow::from_pairs([("country", "US"), ("city", "Zurich")]);
        assert!(range_bucket().is_in_chunk(&row).unwrap());
        assert!(range_bucket().convert(0).is_in_chunk(&row).unwrap());
        assert!(range_bucket().convert(0).convert(1).is_in_chunk(&row).unwrap());
    }
}
