//! Optional range boundaries.

use crate::tuple::StringTuple;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// One end of a range: either open or a concrete tuple.
///
/// Serialized as the tuple itself, or `null` when unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<StringTuple>", into = "Option<StringTuple>")]
pub enum Bound {
    #[default]
    Unbounded,
    Bounded(StringTuple),
}

impl Bound {
    pub fn is_bounded(&self) -> bool {
        matches!(self, Bound::Bounded(_))
    }

    pub fn as_tuple(&self) -> Option<&StringTuple> {
        match self {
            Bound::Bounded(tuple) => Some(tuple),
            Bound::Unbounded => None,
        }
    }

    /// Orders two lower bounds, with `Unbounded` as negative infinity.
    ///
    /// Both bounds are expected to share an arity; tuples compare with
    /// [`StringTuple`]'s total order.
    pub fn cmp_as_start(&self, other: &Bound) -> Ordering {
        // `None` sorts first, which is exactly negative infinity
        self.as_tuple().cmp(&other.as_tuple())
    }

    /// Orders two upper bounds, with `Unbounded` as positive infinity.
    pub fn cmp_as_end(&self, other: &Bound) -> Ordering {
        match (self, other) {
            (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
            (Bound::Unbounded, Bound::Bounded(_)) => Ordering::Greater,
            (Bound::Bounded(_), Bound::Unbounded) => Ordering::Less,
            (Bound::Bounded(a), Bound::Bounded(b)) => a.cmp(b),
        }
    }

    /// Orders this upper bound against a following lower bound.
    ///
    /// `Less` means a gap sits between them, `Greater` an overlap, and
    /// `Equal` that they meet exactly.
    pub fn cmp_end_to_start(&self, next_start: &Bound) -> Ordering {
        match (self, next_start) {
            (Bound::Unbounded, _) | (_, Bound::Unbounded) => Ordering::Greater,
            (Bound::Bounded(end), Bound::Bounded(start)) => end.cmp(start),
        }
    }
}

impl From<StringTuple> for Bound {
    fn from(tuple: StringTuple) -> Self {
        Bound::Bounded(tuple)
    }
}

impl From<Option<StringTuple>> for Bound {
    fn from(tuple: Option<StringTuple>) -> Self {
        match tuple {
            Some(tuple) => Bound::Bounded(tuple),
            None => Bound::Unbounded,
        }
    }
}

impl From<Bound> for Option<StringTuple> {
    fn from(bound: Bound) -> Self {
        match bound {
            Bound::Bounded(tuple) => Some(tuple),
            Bound::Unbounded => None,
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Bounded(tuple) => write!(f, "{}", tuple),
            Bound::Unbounded => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_ordering() {
        let a = Bound::from(StringTuple::of(["a"]));
        let b = Bound::from(StringTuple::of(["b"]));

        assert_eq!(Bound::Unbounded.cmp_as_start(&a), Ordering::Less);
        assert_eq!(a.cmp_as_start(&Bound::Unbounded), Ordering::Greater);
        assert_eq!(a.cmp_as_start(&b), Ordering::Less);
        assert_eq!(Bound::Unbounded.cmp_as_start(&Bound::Unbounded), Ordering::Equal);
    }

    #[test]
    fn test_end_ordering() {
        let a = Bound::from(StringTuple::of(["a"]));

        assert_eq!(Bound::Unbounded.cmp_as_end(&a), Ordering::Greater);
        assert_eq!(a.cmp_as_end(&Bound::Unbounded), Ordering::Less);
        assert_eq!(a.cmp_as_end(&a), Ordering::Equal);
    }

    #[test]
    fn test_end_to_start() {
        let a = Bound::from(StringTuple::of(["a"]));
        let b = Bound::from(StringTuple::of(["b"]));

        assert_eq!(a.cmp_end_to_start(&b), Ordering::Less);
        assert_eq!(a.cmp_end_to_start(&a), Ordering::Equal);
        assert_eq!(b.cmp_end_to_start(&a), Ordering::Greater);
        assert_eq!(Bound::Unbounded.cmp_end_to_start(&a), Ordering::Greater);
        assert_eq!(a.cmp_end_to_start(&Bound::Unbounded), Ordering::Greater);
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(Bound::from(None), Bound::Unbounded);
        let tuple = StringTuple::of(["x"]);
        let bound = Bound::from(Some(tuple.clone()));
        assert_eq!(bound.as_tuple(), Some(&tuple));
        assert_eq!(Option::<StringTuple>::from(bound), Some(tuple));
    }
}
