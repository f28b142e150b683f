//! Edge cases: boundary values injected into generation.

use crate::data::Value;
use crate::shrinkable::Shrinkable;

/// An ordered set of interesting shrinkable values, deduplicated by value.
#[derive(Clone)]
pub struct EdgeCases<T> {
    cases: Vec<Shrinkable<T>>,
}

impl<T: Value> EdgeCases<T> {
    pub fn none() -> Self {
        EdgeCases { cases: Vec::new() }
    }

    /// Unshrinkable edge cases from plain values.
    pub fn from_values(values: Vec<T>) -> Self
    where
        T: PartialEq,
    {
        EdgeCases::from_shrinkables(values.into_iter().map(Shrinkable::unshrinkable).collect())
    }

    /// Edge cases from shrinkables; later duplicates of a value are dropped.
    pub fn from_shrinkables(shrinkables: Vec<Shrinkable<T>>) -> Self
    where
        T: PartialEq,
    {
        let mut cases: Vec<Shrinkable<T>> = Vec::with_capacity(shrinkables.len());
        for shrinkable in shrinkables {
            if !cases.iter().any(|case| case.value() == shrinkable.value()) {
                cases.push(shrinkable);
            }
        }
        EdgeCases { cases }
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Shrinkable<T>> {
        self.cases.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Shrinkable<T>> {
        self.cases.iter()
    }

    pub fn values(&self) -> Vec<T> {
        self.cases.iter().map(|case| case.value().clone()).collect()
    }

    /// Map every edge case. Mapped values may coincide; they are kept as is.
    pub fn map<U, F>(&self, f: F) -> EdgeCases<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f: std::sync::Arc<dyn Fn(T) -> U + Send + Sync> = std::sync::Arc::new(f);
        EdgeCases {
            cases: self
                .cases
                .iter()
                .map(|case| case.map_shared(std::sync::Arc::clone(&f)))
                .collect(),
        }
    }

    pub fn concat(self, other: EdgeCases<T>) -> Self
    where
        T: PartialEq,
    {
        let mut shrinkables = self.cases;
        shrinkables.extend(other.cases);
        EdgeCases::from_shrinkables(shrinkables)
    }
}

impl<T: Value> Default for EdgeCases<T> {
    fn default() -> Self {
        EdgeCases::none()
    }
}
