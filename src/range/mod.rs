//! Multi-dimensional range boundaries.
//!
//! A [`DimensionRange`] pairs an ordered dimension list with optional start
//! and end tuples and owns the half-open `[start, end)` membership test.
//! Arity is validated once here so comparisons never see mismatched tuples
//! coming from a boundary.

pub mod bound;
pub mod comparator;

use crate::tuple::{StringTuple, TupleError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;
use thiserror::Error;

pub use bound::Bound;
pub use comparator::{is_in_chunk, project_row};

use crate::row::InputRow;

/// Errors specific to range construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    /// Start or end tuple does not have one value per dimension
    #[error(
        "{side} tuple must either be null or of the same size as the number of partition \
         dimensions: expected {expected}, got {actual}"
    )]
    InvalidBoundary {
        side: BoundSide,
        expected: usize,
        actual: usize,
    },

    /// Range partitioning needs at least one dimension
    #[error("range partitioning requires at least one dimension")]
    EmptyDimensions,
}

/// Which end of a range a boundary sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Start,
    End,
}

impl fmt::Display for BoundSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundSide::Start => write!(f, "Start"),
            BoundSide::End => write!(f, "End"),
        }
    }
}

/// Ordered list of partition dimension names.
///
/// Cloning shares the underlying list, so a bucket and every partition
/// converted from it point at the same names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DimensionList(Arc<[String]>);

impl DimensionList {
    /// Creates a list from dimension names in partitioning order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// True if both lists share the same allocation.
    pub fn ptr_eq(&self, other: &DimensionList) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for DimensionList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for DimensionList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

/// Validated `[start, end)` range over a dimension list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DimensionRange {
    dimensions: DimensionList,
    start: Bound,
    end: Bound,
}

impl DimensionRange {
    /// Creates a range, rejecting boundaries whose arity differs from the
    /// number of dimensions.
    pub fn new(dimensions: DimensionList, start: Bound, end: Bound) -> Result<Self, RangeError> {
        if dimensions.is_empty() {
            return Err(RangeError::EmptyDimensions);
        }
        check_arity(BoundSide::Start, &dimensions, &start)?;
        check_arity(BoundSide::End, &dimensions, &end)?;

        Ok(Self {
            dimensions,
            start,
            end,
        })
    }

    /// Range covering every tuple.
    pub fn unbounded(dimensions: DimensionList) -> Result<Self, RangeError> {
        Self::new(dimensions, Bound::Unbounded, Bound::Unbounded)
    }

    pub fn dimensions(&self) -> &DimensionList {
        &self.dimensions
    }

    pub fn start(&self) -> &Bound {
        &self.start
    }

    pub fn end(&self) -> &Bound {
        &self.end
    }

    /// Whether the row's projected tuple falls in `[start, end)`.
    pub fn contains(&self, row: &dyn InputRow) -> Result<bool, TupleError> {
        is_in_chunk(&self.dimensions, &self.start, &self.end, row)
    }

    /// Whether an already projected tuple falls in `[start, end)`.
    ///
    /// Fails if `tuple` does not have one value per dimension.
    pub fn contains_tuple(&self, tuple: &StringTuple) -> Result<bool, TupleError> {
        if tuple.size() != self.dimensions.len() {
            return Err(TupleError::ArityMismatch {
                left: tuple.size(),
                right: self.dimensions.len(),
            });
        }
        comparator::tuple_in_range(tuple, &self.start, &self.end)
    }
}

impl fmt::Display for DimensionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dimensions={}, start={}, end={}",
            self.dimensions, self.start, self.end
        )
    }
}

fn check_arity(side: BoundSide, dimensions: &[String], bound: &Bound) -> Result<(), RangeError> {
    match bound {
        Bound::Bounded(tuple) if tuple.size() != dimensions.len() => {
            Err(RangeError::InvalidBoundary {
                side,
                expected: dimensions.len(),
                actual: tuple.size(),
            })
        }
        _ => Ok(()),
    }
}
