//! Half-open range membership for projected rows.

use crate::range::Bound;
use crate::row::InputRow;
use crate::tuple::{StringTuple, TupleError};
use std::cmp::Ordering;

/// Projects `row` onto `dimensions`, one flattened value per dimension.
pub fn project_row(dimensions: &[String], row: &dyn InputRow) -> StringTuple {
    StringTuple::new(
        dimensions
            .iter()
            .map(|dimension| row.dimension_value(dimension).map(str::to_owned)),
    )
}

/// Whether `row` falls in `[start, end)` over `dimensions`.
///
/// An unbounded start or end places no constraint on that side. Fails only
/// if a bounded side has a different arity than `dimensions`.
pub fn is_in_chunk(
    dimensions: &[String],
    start: &Bound,
    end: &Bound,
    row: &dyn InputRow,
) -> Result<bool, TupleError> {
    let tuple = project_row(dimensions, row);
    tuple_in_range(&tuple, start, end)
}

pub(crate) fn tuple_in_range(
    tuple: &StringTuple,
    start: &Bound,
    end: &Bound,
) -> Result<bool, TupleError> {
    if let Bound::Bounded(start) = start {
        if tuple.try_cmp(start)? == Ordering::Less {
            return Ok(false);
        }
    }
    if let Bound::Bounded(end) = end {
        if tuple.try_cmp(end)? != Ordering::Less {
            return Ok(false);
        }
    }
    Ok(true)
}
