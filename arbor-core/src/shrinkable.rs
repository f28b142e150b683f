//! Shrinkable values: a generated value together with its distance and a
//! lazily enumerated tree of simpler candidates.

use crate::data::Value;
use crate::distance::ShrinkingDistance;
use std::fmt;
use std::sync::Arc;

pub mod render;

/// Lazy sequence of shrink candidates.
pub type Shrinks<T> = Box<dyn Iterator<Item = Shrinkable<T>>>;

type ShrinkFn<T> = dyn Fn() -> Shrinks<T> + Send + Sync;

/// A value with its shrinking distance and a re-enumerable shrink sequence.
///
/// The tree below a shrinkable is never materialised: every call to
/// [`Shrinkable::shrink`] builds a fresh iterator, so infinite trees are fine
/// and the same shrinkable always yields the same candidates.
pub struct Shrinkable<T> {
    value: T,
    distance: ShrinkingDistance,
    shrinks: Arc<ShrinkFn<T>>,
}

impl<T: Clone> Clone for Shrinkable<T> {
    fn clone(&self) -> Self {
        Shrinkable {
            value: self.value.clone(),
            distance: self.distance.clone(),
            shrinks: Arc::clone(&self.shrinks),
        }
    }
}

impl<T> Shrinkable<T> {
    /// Create a shrinkable from a value, a distance and a candidate factory.
    pub fn new<F>(value: T, distance: ShrinkingDistance, shrinks: F) -> Self
    where
        F: Fn() -> Shrinks<T> + Send + Sync + 'static,
    {
        Shrinkable {
            value,
            distance,
            shrinks: Arc::new(shrinks),
        }
    }

    /// A shrinkable with the given distance and no candidates.
    pub fn leaf(value: T, distance: ShrinkingDistance) -> Self
    where
        T: 'static,
    {
        Shrinkable::new(value, distance, || Box::new(std::iter::empty()))
    }

    /// A shrinkable that cannot be simplified.
    pub fn unshrinkable(value: T) -> Self
    where
        T: 'static,
    {
        Shrinkable::leaf(value, ShrinkingDistance::min())
    }

    /// Get the generated value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Take the generated value, dropping its shrinks.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Get the distance of this value from its shrink target.
    pub fn distance(&self) -> &ShrinkingDistance {
        &self.distance
    }

    /// Enumerate the shrink candidates.
    pub fn shrink(&self) -> Shrinks<T> {
        (self.shrinks)()
    }

    /// Check whether at least one shrink candidate exists.
    pub fn has_shrinks(&self) -> bool {
        self.shrink().next().is_some()
    }
}

impl<T: Value> Shrinkable<T> {
    /// Map a function over the value and every candidate below it.
    pub fn map<U, F>(&self, f: F) -> Shrinkable<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        self.map_shared(Arc::new(f))
    }

    pub(crate) fn map_shared<U: Value>(
        &self,
        f: Arc<dyn Fn(T) -> U + Send + Sync>,
    ) -> Shrinkable<U> {
        let value = f(self.value.clone());
        let source = self.clone();
        Shrinkable::new(value, self.distance.clone(), move || {
            let f = Arc::clone(&f);
            Box::new(source.shrink().map(move |candidate| candidate.map_shared(Arc::clone(&f))))
        })
    }

    /// Keep only candidates satisfying the predicate, at every level.
    pub fn filter<F>(&self, predicate: F) -> Shrinkable<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.filter_shared(Arc::new(predicate))
    }

    pub(crate) fn filter_shared(&self, predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>) -> Self {
        let source = self.clone();
        Shrinkable::new(self.value.clone(), self.distance.clone(), move || {
            let predicate = Arc::clone(&predicate);
            Box::new(
                source
                    .shrink()
                    .filter({
                        let predicate = Arc::clone(&predicate);
                        move |candidate| predicate(candidate.value())
                    })
                    .map(move |candidate| candidate.filter_shared(Arc::clone(&predicate))),
            )
        })
    }

    /// Collect up to `limit` candidate values, breadth-first.
    pub fn shrinks(&self, limit: usize) -> Vec<T> {
        let mut result = Vec::new();
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(self.clone());

        while let Some(node) = queue.pop_front() {
            for candidate in node.shrink() {
                if result.len() >= limit {
                    return result;
                }
                result.push(candidate.value.clone());
                queue.push_back(candidate);
            }
        }

        result
    }
}

impl<T: fmt::Debug> fmt::Debug for Shrinkable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinkable")
            .field("value", &self.value)
            .field("distance", &self.distance)
            .finish()
    }
}

impl<T: Value> From<T> for Shrinkable<T> {
    fn from(value: T) -> Self {
        Shrinkable::unshrinkable(value)
    }
}
