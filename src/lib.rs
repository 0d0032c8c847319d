//! Shard specs and row-to-shard resolution for partitioned, time-chunked data.
//!
//! Rows are routed to shards by projecting them onto an ordered dimension
//! list and comparing the resulting [`StringTuple`] against each shard's
//! `[start, end)` boundaries, or by hashing the projected values.

pub mod error;
pub mod range;
pub mod resolve;
pub mod row;
pub mod spec;
pub mod tuple;

// Re-export common types for convenience
pub use error::{Error, Result};
pub use range::{Bound, DimensionList, DimensionRange};
pub use resolve::{resolve, PartitionSet, ResolverConfig, SearchStrategy};
pub use row::{InputRow, MapInputRow};
pub use spec::{BucketShardSpec, BuildingShardSpec, ShardLookup, ShardSpec};
pub use tuple::StringTuple;
