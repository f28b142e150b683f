//! Shrinking distance: the complexity score used to rank shrink candidates.

use crate::shrinkable::Shrinkable;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// A totally ordered, non-negative complexity score.
///
/// Distances are compared dimension by dimension; when one distance is a
/// prefix of the other, the shorter one is smaller.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShrinkingDistance {
    dimensions: Vec<u64>,
}

impl ShrinkingDistance {
    pub fn of(dimensions: impl Into<Vec<u64>>) -> Self {
        ShrinkingDistance {
            dimensions: dimensions.into(),
        }
    }

    /// The distance of the simplest possible value.
    pub fn min() -> Self {
        ShrinkingDistance::of([0])
    }

    /// Collection distance: element count first, then the summed element distances.
    pub fn for_collection<T>(elements: &[Shrinkable<T>]) -> Self {
        let sum = elements
            .iter()
            .map(|element| element.distance().clone())
            .sum::<ShrinkingDistance>();
        ShrinkingDistance::of([elements.len() as u64]).append(&sum)
    }

    pub fn dimensions(&self) -> &[u64] {
        &self.dimensions
    }

    /// Dimension-wise saturating sum; the longer tail is kept.
    pub fn plus(&self, other: &ShrinkingDistance) -> Self {
        let (longer, shorter) = if self.dimensions.len() >= other.dimensions.len() {
            (&self.dimensions, &other.dimensions)
        } else {
            (&other.dimensions, &self.dimensions)
        };
        let mut dimensions = longer.clone();
        for (dimension, value) in dimensions.iter_mut().zip(shorter) {
            *dimension = dimension.saturating_add(*value);
        }
        ShrinkingDistance { dimensions }
    }

    pub fn append(&self, other: &ShrinkingDistance) -> Self {
        let mut dimensions = self.dimensions.clone();
        dimensions.extend_from_slice(&other.dimensions);
        ShrinkingDistance { dimensions }
    }
}

impl Default for ShrinkingDistance {
    fn default() -> Self {
        ShrinkingDistance::min()
    }
}

impl Add for ShrinkingDistance {
    type Output = ShrinkingDistance;

    fn add(self, other: ShrinkingDistance) -> ShrinkingDistance {
        self.plus(&other)
    }
}

impl Sum for ShrinkingDistance {
    fn sum<I: Iterator<Item = ShrinkingDistance>>(iter: I) -> Self {
        iter.fold(ShrinkingDistance::min(), |acc, next| acc.plus(&next))
    }
}

impl fmt::Display for ShrinkingDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dimensions: Vec<String> = self.dimensions.iter().map(u64::to_string).collect();
        write!(f, "ShrinkingDistance[{}]", dimensions.join(", "))
    }
}
