//! Container shrinking and a reference shrink search.
//!
//! Container candidates are enumerated lazily in this order:
//!
//! 1. size reductions (cut to the minimum size, drop a half, drop one element),
//! 2. one element replaced by one of its own shrinks,
//! 3. two elements shrunk together,
//! 4. the elements sorted by distance, then single swaps of out-of-order
//!    pairs, both only when the elements are not already sorted.
//!
//! A consumer that stops early never pays for the later strategies.

use crate::container::{is_unique, FeatureExtractor};
use crate::data::{Config, Value};
use crate::distance::ShrinkingDistance;
use crate::shrinkable::Shrinkable;
use log::debug;
use std::fmt;
use std::iter;
use std::sync::Arc;

type Candidates<T> = Box<dyn Iterator<Item = Vec<Shrinkable<T>>>>;

type UntilFn<T> = dyn Fn(&[T]) -> bool + Send + Sync;

/// Which element vectors a sized container may shrink into.
pub struct ContainerPolicy<T> {
    min: usize,
    max: usize,
    uniqueness: Vec<FeatureExtractor<T>>,
    reorder: bool,
}

impl<T: Value> ContainerPolicy<T> {
    /// `reorder` enables the sort and swap strategies; unordered containers turn it off.
    pub fn new(min: usize, max: usize, uniqueness: Vec<FeatureExtractor<T>>, reorder: bool) -> Self {
        ContainerPolicy {
            min,
            max,
            uniqueness,
            reorder,
        }
    }

    pub fn uniqueness(&self) -> &[FeatureExtractor<T>] {
        &self.uniqueness
    }

    pub fn admits(&self, values: &[T]) -> bool {
        self.min <= values.len()
            && values.len() <= self.max
            && is_unique(values, &self.uniqueness)
    }
}

impl<T> fmt::Debug for ContainerPolicy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerPolicy")
            .field("min", &self.min)
            .field("max", &self.max)
            .field("uniqueness", &self.uniqueness)
            .field("reorder", &self.reorder)
            .finish()
    }
}

fn values_of<T: Value>(elements: &[Shrinkable<T>]) -> Vec<T> {
    elements.iter().map(|element| element.value().clone()).collect()
}

/// Shrinkable container whose candidates all satisfy `policy`.
pub fn container_shrinkable<T: Value>(
    elements: Vec<Shrinkable<T>>,
    policy: Arc<ContainerPolicy<T>>,
) -> Shrinkable<Vec<T>> {
    let value = values_of(&elements);
    let distance = ShrinkingDistance::for_collection(&elements);
    let elements = Arc::new(elements);
    Shrinkable::new(value, distance, move || {
        let reductions = size_reductions(Arc::clone(&elements), policy.min);
        let substitutions = element_substitutions(Arc::clone(&elements));
        let pairs = pair_shrinks(Arc::clone(&elements));
        let reorders: Candidates<T> = if policy.reorder {
            reorderings(Arc::clone(&elements))
        } else {
            Box::new(iter::empty())
        };
        let admitted = Arc::clone(&policy);
        let policy = Arc::clone(&policy);
        Box::new(
            reductions
                .chain(substitutions)
                .chain(pairs)
                .chain(reorders)
                .filter(move |candidate| admitted.admits(&values_of(candidate)))
                .map(move |candidate| container_shrinkable(candidate, Arc::clone(&policy))),
        )
    })
}

/// Shrinkable for elements collected until `until` held.
///
/// A shrunk element is substituted and the result cut to the shortest
/// prefix still satisfying `until`; substitutions with no such prefix are
/// dropped. Every candidate satisfies `until`.
pub fn collect_shrinkable<T: Value>(
    elements: Vec<Shrinkable<T>>,
    until: Arc<UntilFn<T>>,
) -> Shrinkable<Vec<T>> {
    let value = values_of(&elements);
    let distance = ShrinkingDistance::for_collection(&elements);
    let elements = Arc::new(elements);
    Shrinkable::new(value, distance, move || {
        let substitutions = prefix_substitutions(Arc::clone(&elements), Arc::clone(&until));
        let reorders = reorderings(Arc::clone(&elements));
        let holds = Arc::clone(&until);
        let until = Arc::clone(&until);
        Box::new(
            substitutions
                .chain(reorders)
                .filter(move |candidate| holds(values_of(candidate).as_slice()))
                .map(move |candidate| collect_shrinkable(candidate, Arc::clone(&until))),
        )
    })
}

fn size_reductions<T: Value>(elements: Arc<Vec<Shrinkable<T>>>, min: usize) -> Candidates<T> {
    let len = elements.len();
    if len <= min {
        return Box::new(iter::empty());
    }
    let half = len / 2;
    let cut_to_min = (len - min > 1).then_some((min, len));
    let halves = (len >= 4).then_some([(0, half), (half, len)]);
    let removals = cut_to_min
        .into_iter()
        .chain(halves.into_iter().flatten())
        .chain((0..len).map(|index| (index, index + 1)));
    Box::new(removals.map(move |(start, end)| {
        let mut remaining = elements[..start].to_vec();
        remaining.extend_from_slice(&elements[end..]);
        remaining
    }))
}

fn element_substitutions<T: Value>(elements: Arc<Vec<Shrinkable<T>>>) -> Candidates<T> {
    Box::new((0..elements.len()).flat_map(move |index| {
        let shrinks = elements[index].shrink();
        let elements = Arc::clone(&elements);
        shrinks.map(move |candidate| {
            let mut substituted = elements.to_vec();
            substituted[index] = candidate;
            substituted
        })
    }))
}

fn pair_shrinks<T: Value>(elements: Arc<Vec<Shrinkable<T>>>) -> Candidates<T> {
    Box::new(distinct_pairs(elements.len()).flat_map(move |(i, j)| {
        let shrinks = elements[i].shrink().zip(elements[j].shrink());
        let elements = Arc::clone(&elements);
        shrinks.map(move |(left, right)| {
            let mut substituted = elements.to_vec();
            substituted[i] = left;
            substituted[j] = right;
            substituted
        })
    }))
}

fn prefix_substitutions<T: Value>(
    elements: Arc<Vec<Shrinkable<T>>>,
    until: Arc<UntilFn<T>>,
) -> Candidates<T> {
    Box::new((0..elements.len()).flat_map(move |index| {
        let shrinks = elements[index].shrink();
        let elements = Arc::clone(&elements);
        let until = Arc::clone(&until);
        shrinks.filter_map(move |candidate| shortest_prefix(&elements, index, candidate, &*until))
    }))
}

fn shortest_prefix<T: Value>(
    elements: &[Shrinkable<T>],
    index: usize,
    candidate: Shrinkable<T>,
    until: &UntilFn<T>,
) -> Option<Vec<Shrinkable<T>>> {
    let mut prefix = Vec::with_capacity(elements.len());
    let mut values = Vec::with_capacity(elements.len());
    for (position, element) in elements.iter().enumerate() {
        let next = if position == index {
            candidate.clone()
        } else {
            element.clone()
        };
        values.push(next.value().clone());
        prefix.push(next);
        if until(values.as_slice()) {
            return Some(prefix);
        }
    }
    None
}

/// Full sort by distance followed by single out-of-order swaps.
///
/// Yields nothing when the elements are already sorted, so repeatedly
/// accepting reorder candidates terminates.
fn reorderings<T: Value>(elements: Arc<Vec<Shrinkable<T>>>) -> Candidates<T> {
    Box::new(
        iter::once_with(move || -> Candidates<T> {
            match sorted_by_distance(&elements) {
                None => Box::new(iter::empty()),
                Some(sorted) => Box::new(iter::once(sorted).chain(pair_swaps(elements))),
            }
        })
        .flatten(),
    )
}

/// Elements stably sorted by distance, or `None` if the order would not change.
fn sorted_by_distance<T: Value>(elements: &[Shrinkable<T>]) -> Option<Vec<Shrinkable<T>>> {
    let mut order: Vec<usize> = (0..elements.len()).collect();
    order.sort_by(|&a, &b| elements[a].distance().cmp(elements[b].distance()));
    if order.iter().enumerate().all(|(position, &index)| position == index) {
        return None;
    }
    Some(order.into_iter().map(|index| elements[index].clone()).collect())
}

/// Swap each pair `i < j` whose earlier element is farther from its target.
fn pair_swaps<T: Value>(elements: Arc<Vec<Shrinkable<T>>>) -> Candidates<T> {
    Box::new(
        distinct_pairs(elements.len())
            .filter({
                let elements = Arc::clone(&elements);
                move |&(i, j)| elements[i].distance() > elements[j].distance()
            })
            .map(move |(i, j)| {
                let mut swapped = elements.to_vec();
                swapped.swap(i, j);
                swapped
            }),
    )
}

/// All index pairs `(i, j)` with `i < j < len`.
fn distinct_pairs(len: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..len).flat_map(move |i| (i + 1..len).map(move |j| (i, j)))
}

/// Result of [`minimize`].
#[derive(Debug, Clone)]
pub struct ShrinkOutcome<T> {
    /// The smallest falsifying shrinkable found.
    pub shrinkable: Shrinkable<T>,
    /// Accepted shrink steps.
    pub steps: usize,
    /// Candidates evaluated.
    pub attempts: usize,
}

impl<T> ShrinkOutcome<T> {
    pub fn value(&self) -> &T {
        self.shrinkable.value()
    }
}

/// Greedy shrink search from a falsifying value.
///
/// The first candidate that still falsifies and is no farther than the
/// current value replaces it. The search stops at a local fixpoint or when
/// the step or attempt limit of `config` is reached.
pub fn minimize<T, F>(start: Shrinkable<T>, falsifies: F, config: &Config) -> ShrinkOutcome<T>
where
    T: Value + fmt::Debug,
    F: Fn(&T) -> bool,
{
    let mut current = start;
    let mut steps = 0;
    let mut attempts = 0;
    'search: while steps < config.shrink_limit {
        for candidate in current.shrink() {
            if attempts >= config.attempt_limit {
                debug!("shrinking stopped after {attempts} attempts");
                break 'search;
            }
            attempts += 1;
            if candidate.distance() <= current.distance() && falsifies(candidate.value()) {
                steps += 1;
                debug!(
                    "shrink step {steps}: {:?} at distance {}",
                    candidate.value(),
                    candidate.distance()
                );
                current = candidate;
                continue 'search;
            }
        }
        break;
    }
    ShrinkOutcome {
        shrinkable: current,
        steps,
        attempts,
    }
}
