//! Fixed-arity string tuples used as composite range boundaries.
//!
//! A [`StringTuple`] holds one nullable value per partition dimension. The
//! same type is used for shard boundaries and for projected rows, so the
//! arity of both sides must agree before they can be compared.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors specific to tuple comparison.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TupleError {
    /// Two tuples of different arity were compared
    #[error("cannot compare tuples of size {left} and {right}")]
    ArityMismatch { left: usize, right: usize },
}

/// Ordered sequence of nullable string values.
///
/// Elements compare lexicographically by position; within a position `None`
/// sorts before every value, and values compare byte-wise.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StringTuple(Box<[Option<String>]>);

impl StringTuple {
    /// Creates a tuple from nullable values.
    pub fn new<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<String>>,
    {
        Self(values.into_iter().collect())
    }

    /// Creates a tuple where every position holds a value.
    pub fn of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Number of positions, nulls included.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Value at `index`, `None` when the position is null or out of range.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|v| v.as_deref())
    }

    /// All positions in order.
    pub fn values(&self) -> &[Option<String>] {
        &self.0
    }

    /// Compares two tuples of the same arity.
    ///
    /// Unlike the [`Ord`] impl, which orders tuples of any size, this refuses
    /// to compare tuples whose sizes differ. All range membership checks go
    /// through here.
    pub fn try_cmp(&self, other: &StringTuple) -> Result<Ordering, TupleError> {
        if self.size() != other.size() {
            return Err(TupleError::ArityMismatch {
                left: self.size(),
                right: other.size(),
            });
        }
        Ok(self.0.iter().cmp(other.0.iter()))
    }
}

impl fmt::Display for StringTuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, value) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match value {
                Some(v) => write!(f, "{:?}", v)?,
                None => write!(f, "null")?,
            }
        }
        write!(f, "]")
    }
}
