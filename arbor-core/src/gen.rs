//! Generator combinators.

use crate::data::*;
use crate::distance::ShrinkingDistance;
use crate::edge::EdgeCases;
use crate::error::{ArborError, Result};
use crate::shrinkable::Shrinkable;
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Maximum number of draws a filtered generator makes before giving up.
pub const FILTER_RETRY_LIMIT: usize = 10_000;

/// Maximum number of elements `Gen::collect` draws before giving up.
pub const COLLECT_ELEMENT_LIMIT: usize = 10_000;

type GenFn<T> = dyn Fn(Size, Seed) -> Result<Shrinkable<T>> + Send + Sync;

enum Source<T> {
    Run(Arc<GenFn<T>>),
    Fail(ArborError),
}

impl<T> Clone for Source<T> {
    fn clone(&self) -> Self {
        match self {
            Source::Run(run) => Source::Run(Arc::clone(run)),
            Source::Fail(error) => Source::Fail(error.clone()),
        }
    }
}

/// A generator for values of type `T`.
///
/// A generator is a pure function from a size hint and a seed to a
/// [`Shrinkable`]. Generators are explicit, first-class values composed with
/// combinator functions and never mutated once built.
///
/// A generator over a provably empty domain is still a valid value: it
/// carries its failure, which [`Gen::failure`] exposes at composition time
/// and [`Gen::generate`] reports at first use.
pub struct Gen<T> {
    source: Source<T>,
}

impl<T> Clone for Gen<T> {
    fn clone(&self) -> Self {
        Gen {
            source: self.source.clone(),
        }
    }
}

impl<T: Value> Gen<T> {
    /// Create a new generator from a function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Size, Seed) -> Result<Shrinkable<T>> + Send + Sync + 'static,
    {
        Gen {
            source: Source::Run(Arc::new(f)),
        }
    }

    /// A generator that always reports the given error.
    pub fn failing(error: ArborError) -> Self {
        Gen {
            source: Source::Fail(error),
        }
    }

    /// A generator over an empty domain.
    pub fn fail(reason: impl Into<String>) -> Self {
        Gen::failing(ArborError::empty_domain(reason))
    }

    /// The construction-time failure this generator carries, if any.
    pub fn failure(&self) -> Option<&ArborError> {
        match &self.source {
            Source::Run(_) => None,
            Source::Fail(error) => Some(error),
        }
    }

    /// Generate a shrinkable value using the given size and seed.
    pub fn generate(&self, size: Size, seed: Seed) -> Result<Shrinkable<T>> {
        match &self.source {
            Source::Run(run) => run(size, seed),
            Source::Fail(error) => Err(error.clone()),
        }
    }

    /// Create a generator that always produces the same value.
    pub fn constant(value: T) -> Self {
        Gen::new(move |_size, _seed| Ok(Shrinkable::unshrinkable(value.clone())))
    }

    /// Map a function over the generated values and their shrinks.
    pub fn map<U, F>(self, f: F) -> Gen<U>
    where
        U: Value,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let run = match self.source {
            Source::Run(run) => run,
            Source::Fail(error) => return Gen::failing(error),
        };
        let f: Arc<dyn Fn(T) -> U + Send + Sync> = Arc::new(f);
        Gen::new(move |size, seed| Ok(run(size, seed)?.map_shared(Arc::clone(&f))))
    }

    /// Dependent generation: feed each value into a function producing the next generator.
    ///
    /// The resulting shrink tree first shrinks the inner value, then shrinks
    /// the outer value and regenerates the inner one from the same seed.
    pub fn flat_map<U, F>(self, f: F) -> Gen<U>
    where
        U: Value,
        F: Fn(T) -> Gen<U> + Send + Sync + 'static,
    {
        let run = match self.source {
            Source::Run(run) => run,
            Source::Fail(error) => return Gen::failing(error),
        };
        let f: Arc<dyn Fn(T) -> Gen<U> + Send + Sync> = Arc::new(f);
        Gen::new(move |size, seed| {
            let (outer_seed, inner_seed) = seed.split();
            let outer = run(size, outer_seed)?;
            let inner = f(outer.value().clone()).generate(size, inner_seed)?;
            Ok(flat_mapped(outer, inner, Arc::clone(&f), size, inner_seed))
        })
    }

    /// Filter generated values by a predicate, redrawing on rejection.
    pub fn filter<F>(self, predicate: F) -> Gen<T>
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let run = match self.source {
            Source::Run(run) => run,
            Source::Fail(error) => return Gen::failing(error),
        };
        let predicate: Arc<dyn Fn(&T) -> bool + Send + Sync> = Arc::new(predicate);
        Gen::new(move |size, seed| {
            let mut seed = seed;
            for _ in 0..FILTER_RETRY_LIMIT {
                let (attempt, next) = seed.split();
                seed = next;
                let shrinkable = run(size, attempt)?;
                if predicate(shrinkable.value()) {
                    return Ok(shrinkable.filter_shared(Arc::clone(&predicate)));
                }
            }
            debug!("filter rejected {FILTER_RETRY_LIMIT} consecutive values");
            Err(ArborError::UnsatisfiableConstraint {
                constraint: "filter predicate".to_string(),
                attempted_size: 1,
                attempts: FILTER_RETRY_LIMIT,
            })
        })
    }

    /// Inject edge cases verbatim, more often for small generation sizes.
    pub fn with_edge_cases(self, gen_size: usize, edge_cases: EdgeCases<T>) -> Gen<T> {
        if edge_cases.is_empty() || self.failure().is_some() {
            return self;
        }
        let ratio = edge_case_ratio(gen_size, edge_cases.len());
        let edge_cases = Arc::new(edge_cases);
        Gen::new(move |size, seed| {
            let (choice_seed, base_seed) = seed.split();
            let mut random = Random::new(choice_seed);
            if random.gen_range(0..ratio) == 0 {
                let index = random.gen_range(0..edge_cases.len());
                if let Some(edge_case) = edge_cases.get(index) {
                    return Ok(edge_case.clone());
                }
            }
            self.generate(size, base_seed)
        })
    }

    /// Draw elements until `until` holds for the values drawn so far.
    ///
    /// Shrinking keeps the result a shortest prefix satisfying `until`.
    pub fn collect<F>(self, until: F) -> Gen<Vec<T>>
    where
        F: Fn(&[T]) -> bool + Send + Sync + 'static,
    {
        if let Some(error) = self.failure() {
            return Gen::failing(error.clone());
        }
        let until: Arc<dyn Fn(&[T]) -> bool + Send + Sync> = Arc::new(until);
        Gen::new(move |size, seed| {
            let mut seed = seed;
            let mut elements = Vec::new();
            let mut values = Vec::new();
            while !until(values.as_slice()) {
                if elements.len() >= COLLECT_ELEMENT_LIMIT {
                    debug!("collect gave up after {COLLECT_ELEMENT_LIMIT} elements");
                    return Err(ArborError::UnsatisfiableConstraint {
                        constraint: "collect predicate".to_string(),
                        attempted_size: elements.len(),
                        attempts: COLLECT_ELEMENT_LIMIT,
                    });
                }
                let (draw, next) = seed.split();
                seed = next;
                let element = self.generate(size, draw)?;
                values.push(element.value().clone());
                elements.push(element);
            }
            Ok(crate::shrink::collect_shrinkable(
                elements,
                Arc::clone(&until),
            ))
        })
    }

    /// Uniformly pick one of the values; shrinks towards earlier values.
    pub fn choose(values: Vec<T>) -> Self {
        if values.is_empty() {
            return Gen::fail("empty set of values");
        }
        let values = Arc::new(values);
        Gen::new(move |_size, seed| {
            let (index, _) = seed.next_bounded(values.len() as u64);
            Ok(chosen(Arc::clone(&values), index as usize))
        })
    }

    /// Uniformly pick one of the generators and delegate to it.
    pub fn one_of(generators: Vec<Gen<T>>) -> Self {
        if let Some(error) = all_failing(&generators) {
            return Gen::failing(error);
        }
        Gen::choose(generators).flat_map(|generator| generator)
    }

    /// Pick a value with probability proportional to its weight.
    ///
    /// Zero-weight alternatives are never chosen. Shrinks towards earlier
    /// alternatives.
    pub fn frequency(alternatives: Vec<(u32, T)>) -> Self {
        let (weights, values): (Vec<u64>, Vec<T>) = alternatives
            .into_iter()
            .filter(|(weight, _)| *weight > 0)
            .map(|(weight, value)| (u64::from(weight), value))
            .unzip();
        if values.is_empty() {
            return Gen::fail("no alternative with a positive frequency");
        }
        let index = match WeightedIndex::new(&weights) {
            Ok(index) => index,
            Err(error) => return Gen::failing(ArborError::invalid(error.to_string())),
        };
        let values = Arc::new(values);
        Gen::new(move |_size, seed| {
            let mut random = Random::new(seed);
            Ok(chosen(Arc::clone(&values), index.sample(&mut random)))
        })
    }

    /// Cycle through fixed values, independent of the seed.
    pub fn samples(values: Vec<T>) -> Self {
        let values = Arc::new(values);
        let shrinkables = (0..values.len())
            .map(|index| chosen(Arc::clone(&values), index))
            .collect();
        Gen::samples_from_shrinkables(shrinkables)
    }

    /// Cycle through fixed shrinkables, wrapping to the start after the last one.
    ///
    /// The position counter lives in the generator: trials sharing one
    /// instance concurrently interleave their positions.
    pub fn samples_from_shrinkables(samples: Vec<Shrinkable<T>>) -> Self {
        if samples.is_empty() {
            return Gen::fail("no samples to cycle through");
        }
        let position = AtomicUsize::new(0);
        Gen::new(move |_size, _seed| {
            let index = match position.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |i| {
                Some((i + 1) % samples.len())
            }) {
                Ok(index) | Err(index) => index,
            };
            Ok(samples[index].clone())
        })
    }
}

impl<T: Value> Gen<Vec<T>> {
    /// A random permutation of the values; the result does not shrink.
    pub fn shuffle(values: Vec<T>) -> Self {
        Gen::new(move |_size, seed| {
            let mut permutation = values.clone();
            permutation.shuffle(&mut Random::new(seed));
            Ok(Shrinkable::unshrinkable(permutation))
        })
    }
}

impl Gen<bool> {
    /// Generate a random boolean; `true` shrinks to `false`.
    pub fn bool() -> Self {
        Gen::choose(vec![false, true])
    }
}

/// The probability of an edge case is `1 / ratio`.
pub(crate) fn edge_case_ratio(gen_size: usize, count: usize) -> usize {
    let count = count.max(1);
    (gen_size / 5).max(count).min((100 / count).max(1)) + 1
}

fn all_failing<T: Value>(generators: &[Gen<T>]) -> Option<ArborError> {
    if generators.is_empty() {
        return Some(ArborError::empty_domain("no generators to choose from"));
    }
    let mut failures = generators.iter().map(Gen::failure);
    let first = failures.next().flatten()?.clone();
    if failures.all(|failure| failure.is_some()) {
        Some(first)
    } else {
        None
    }
}

/// Shrinkable for a value picked from a list; distance is its index.
pub(crate) fn chosen<T: Value>(values: Arc<Vec<T>>, index: usize) -> Shrinkable<T> {
    let value = values[index].clone();
    Shrinkable::new(
        value,
        ShrinkingDistance::of([index as u64]),
        move || {
            let values = Arc::clone(&values);
            Box::new((0..index).map(move |earlier| chosen(Arc::clone(&values), earlier)))
        },
    )
}

fn flat_mapped<T: Value, U: Value>(
    outer: Shrinkable<T>,
    inner: Shrinkable<U>,
    f: Arc<dyn Fn(T) -> Gen<U> + Send + Sync>,
    size: Size,
    seed: Seed,
) -> Shrinkable<U> {
    let distance = outer.distance().append(inner.distance());
    let value = inner.value().clone();
    Shrinkable::new(value, distance, move || {
        let inner_shrinks = {
            let outer = outer.clone();
            let f = Arc::clone(&f);
            inner
                .shrink()
                .map(move |candidate| flat_mapped(outer.clone(), candidate, Arc::clone(&f), size, seed))
        };
        let outer_shrinks = {
            let f = Arc::clone(&f);
            outer.shrink().filter_map(move |candidate| {
                match f(candidate.value().clone()).generate(size, seed) {
                    Ok(regenerated) => {
                        Some(flat_mapped(candidate, regenerated, Arc::clone(&f), size, seed))
                    }
                    Err(error) => {
                        debug!("skipping outer shrink candidate: {error}");
                        None
                    }
                }
            })
        };
        Box::new(inner_shrinks.chain(outer_shrinks))
    })
}
