//! Hash shard specs: bucket, building and final forms.
//!
//! Rows are routed by hashing their partition-dimension values into one of
//! `num_buckets` buckets with xxh3, so placement is stable across runs.

use crate::range::DimensionList;
use crate::row::InputRow;
use crate::spec::{ShardLookup, SpecError};
use crate::tuple::TupleError;
use serde::{Deserialize, Serialize};
use std::fmt;
use xxhash_rust::xxh3::xxh3_64;

/// Selects the bucket for a row.
///
/// Each partition dimension contributes its flattened value, encoded as
/// `[present][len][bytes]` so that null, empty and adjacent values cannot
/// collide.
///
/// # Arguments
/// * `partition_dimensions` - Dimensions whose values are hashed, in order
/// * `num_buckets` - Number of buckets (must be > 0)
/// * `row` - Row to place
///
/// # Returns
/// Bucket index in range [0, num_buckets)
pub fn select_bucket(
    partition_dimensions: &[String],
    num_buckets: u32,
    row: &dyn InputRow,
) -> Result<u32, SpecError> {
    if num_buckets == 0 {
        return Err(SpecError::InvalidBucketCount(num_buckets));
    }
    Ok(hash_to_bucket(partition_dimensions, num_buckets, row))
}

fn hash_to_bucket(partition_dimensions: &[String], num_buckets: u32, row: &dyn InputRow) -> u32 {
    let mut buf = Vec::new();
    for dimension in partition_dimensions {
        match row.dimension_value(dimension) {
            Some(value) => {
                buf.push(1u8);
                buf.extend_from_slice(&(value.len() as u32).to_be_bytes());
                buf.extend_from_slice(value.as_bytes());
            }
            None => buf.push(0u8),
        }
    }

    (xxh3_64(&buf) % num_buckets as u64) as u32
}

fn validate(
    bucket_id: u32,
    num_buckets: u32,
    partition_dimensions: &DimensionList,
) -> Result<(), SpecError> {
    if num_buckets == 0 {
        return Err(SpecError::InvalidBucketCount(num_buckets));
    }
    if bucket_id >= num_buckets {
        return Err(SpecError::BucketOutOfRange {
            bucket_id,
            num_buckets,
        });
    }
    if partition_dimensions.is_empty() {
        return Err(SpecError::EmptyPartitionDimensions);
    }
    Ok(())
}

/// Hash partition identity before a partition number is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "HashBucketDef")]
pub struct HashBucket {
    bucket_id: u32,
    num_buckets: u32,
    partition_dimensions: DimensionList,
}

impl HashBucket {
    pub fn new(
        bucket_id: u32,
        num_buckets: u32,
        partition_dimensions: DimensionList,
    ) -> Result<Self, SpecError> {
        validate(bucket_id, num_buckets, &partition_dimensions)?;
        Ok(Self {
            bucket_id,
            num_buckets,
            partition_dimensions,
        })
    }

    pub fn bucket_id(&self) -> u32 {
        self.bucket_id
    }

    pub fn num_buckets(&self) -> u32 {
        self.num_buckets
    }

    pub fn partition_dimensions(&self) -> &DimensionList {
        &self.partition_dimensions
    }

    /// Assigns a partition number.
    pub fn convert(&self, partition_id: u32) -> BuildingHashShard {
        BuildingHashShard {
            bucket: self.clone(),
            partition_id,
        }
    }
}

/// Hash partition with an assigned partition number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingHashShard {
    #[serde(flatten)]
    bucket: HashBucket,
    partition_id: u32,
}

impl BuildingHashShard {
    pub fn new(
        bucket_id: u32,
        num_buckets: u32,
        partition_dimensions: DimensionList,
        partition_id: u32,
    ) -> Result<Self, SpecError> {
        Ok(HashBucket::new(bucket_id, num_buckets, partition_dimensions)?.convert(partition_id))
    }

    pub fn bucket_id(&self) -> u32 {
        self.bucket.bucket_id
    }

    pub fn num_buckets(&self) -> u32 {
        self.bucket.num_buckets
    }

    pub fn partition_dimensions(&self) -> &DimensionList {
        &self.bucket.partition_dimensions
    }

    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    /// Finalizes the shard once the chunk's core partition count is known.
    pub fn convert(&self, num_core_partitions: u32) -> HashShard {
        HashShard {
            bucket: self.bucket.clone(),
            partition_id: self.partition_id,
            num_core_partitions,
        }
    }
}

/// Published hash partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HashShard {
    #[serde(flatten)]
    bucket: HashBucket,
    partition_id: u32,
    num_core_partitions: u32,
}

impl HashShard {
    pub fn new(
        bucket_id: u32,
        num_buckets: u32,
        partition_dimensions: DimensionList,
        partition_id: u32,
        num_core_partitions: u32,
    ) -> Result<Self, SpecError> {
        Ok(
            BuildingHashShard::new(bucket_id, num_buckets, partition_dimensions, partition_id)?
                .convert(num_core_partitions),
        )
    }

    pub fn bucket_id(&self) -> u32 {
        self.bucket.bucket_id
    }

    pub fn num_buckets(&self) -> u32 {
        self.bucket.num_buckets
    }

    pub fn partition_dimensions(&self) -> &DimensionList {
        &self.bucket.partition_dimensions
    }

    pub fn partition_id(&self) -> u32 {
        self.partition_id
    }

    pub fn num_core_partitions(&self) -> u32 {
        self.num_core_partitions
    }
}

impl ShardLookup for HashBucket {
    fn is_in_chunk(&self, row: &dyn InputRow) -> Result<bool, TupleError> {
        // num_buckets is non-zero after construction
        let bucket = hash_to_bucket(&self.partition_dimensions, self.num_buckets, row);
        Ok(bucket == self.bucket_id)
    }
}

impl ShardLookup for BuildingHashShard {
    fn is_in_chunk(&self, row: &dyn InputRow) -> Result<bool, TupleError> {
        self.bucket.is_in_chunk(row)
    }
}

impl ShardLookup for HashShard {
    fn is_in_chunk(&self, row: &dyn InputRow) -> Result<bool, TupleError> {
        self.bucket.is_in_chunk(row)
    }
}

impl fmt::Display for HashBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HashBucket{{bucketId={}, numBuckets={}, partitionDimensions={}}}",
            self.bucket_id, self.num_buckets, self.partition_dimensions
        )
    }
}

impl fmt::Display for BuildingHashShard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BuildingHashShard{{bucketId={}, numBuckets={}, partitionDimensions={}, partitionId={}}}",
            self.bucket.bucket_id,
            self.bucket.num_buckets,
            self.bucket.partition_dimensions,
            self.partition_id
        )
    }
}

impl fmt::Display for HashShard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "HashShard{{bucketId={}, numBuckets={}, partitionDimensions={}, partitionId={}, numCorePartitions={}}}",
            self.bucket.bucket_id,
            self.bucket.num_buckets,
            self.bucket.partition_dimensions,
            self.partition_id,
            self.num_core_partitions
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HashBucketDef {
    bucket_id: u32,
    num_buckets: u32,
    partition_dimensions: DimensionList,
}

impl TryFrom<HashBucketDef> for HashBucket {
    type Error = SpecError;

    fn try_from(def: HashBucketDef) -> Result<Self, Self::Error> {
        HashBucket::new(def.bucket_id, def.num_buckets, def.partition_dimensions)
    }
}
