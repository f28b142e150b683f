//! Container generation: size bounds, size sampling and uniqueness.

use crate::data::*;
use crate::error::{ArborError, Result};
use crate::gen::Gen;
use crate::shrink::{container_shrinkable, ContainerPolicy};
use crate::shrinkable::Shrinkable;
use log::{debug, trace};
use rand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

/// Default maximum size of generated containers.
pub const DEFAULT_COLLECTION_SIZE: usize = 255;

/// Largest container size a [`SizeBounds`] accepts.
pub const MAX_COLLECTION_SIZE: usize = 1 << 20;

/// Elements preallocated per container before it grows on demand.
const PREALLOCATION_LIMIT: usize = 1024;

/// Colliding element draws a single container may make before giving up.
pub const UNIQUENESS_RETRY_LIMIT: usize = 10_000;

/// Probability of drawing a size from the geometric window below the cutoff.
const GEOMETRIC_SHARE: f64 = 0.9;

/// Size bounds of a container: `min <= cutoff <= max`.
///
/// Without an explicit cutoff, the cutoff is derived from the generation
/// size with [`default_cutoff_size`] each time a value is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    min: usize,
    max: usize,
    cutoff: Option<usize>,
}

impl SizeBounds {
    /// Bounds admitting `min..=max` elements; `max` may not exceed [`MAX_COLLECTION_SIZE`].
    pub fn new(min: usize, max: usize) -> Result<Self> {
        if min > max {
            return Err(ArborError::invalid(format!(
                "min size {min} > max size {max}"
            )));
        }
        if max > MAX_COLLECTION_SIZE {
            return Err(ArborError::invalid(format!(
                "max size {max} exceeds the limit of {MAX_COLLECTION_SIZE}"
            )));
        }
        Ok(SizeBounds {
            min,
            max,
            cutoff: None,
        })
    }

    /// Bounds admitting exactly `size` elements.
    pub fn exactly(size: usize) -> Result<Self> {
        SizeBounds::new(size, size)
    }

    /// Fix the size separating geometric from uniform size sampling.
    ///
    /// Sizes up to `cutoff` are drawn geometrically, larger ones uniformly.
    /// A cutoff equal to `max` leaves nothing above it, so every size is
    /// then drawn geometrically from `[min, max]`.
    pub fn with_cutoff(self, cutoff: usize) -> Result<Self> {
        if cutoff < self.min || cutoff > self.max {
            return Err(ArborError::invalid(format!(
                "cutoff size {cutoff} outside [{}, {}]",
                self.min, self.max
            )));
        }
        Ok(SizeBounds {
            cutoff: Some(cutoff),
            ..self
        })
    }

    /// Smallest admitted size.
    pub fn min(&self) -> usize {
        self.min
    }

    /// Largest admitted size.
    pub fn max(&self) -> usize {
        self.max
    }

    /// The explicit cutoff, if one was set.
    pub fn cutoff(&self) -> Option<usize> {
        self.cutoff
    }

    /// The explicit cutoff, or the default one for this generation size.
    pub fn cutoff_for(&self, gen_size: usize) -> usize {
        self.cutoff
            .unwrap_or_else(|| default_cutoff_size(self.min, self.max, gen_size))
    }

    /// Check whether a container of `size` elements is admitted.
    pub fn contains(&self, size: usize) -> bool {
        self.min <= size && size <= self.max
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        SizeBounds {
            min: 0,
            max: DEFAULT_COLLECTION_SIZE,
            cutoff: None,
        }
    }
}

impl fmt::Display for SizeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)?;
        if let Some(cutoff) = self.cutoff {
            write!(f, " cutoff {cutoff}")?;
        }
        Ok(())
    }
}

/// Cutoff between geometric and uniform size sampling.
///
/// The window above `min` grows with the square root of the generation
/// size but is never narrower than ten elements.
pub fn default_cutoff_size(min: usize, max: usize, gen_size: usize) -> usize {
    let range = max.saturating_sub(min);
    let offset = ((gen_size as f64).sqrt().round() as usize).max(10);
    if range <= offset {
        max
    } else {
        min.saturating_add(offset).min(max)
    }
}

/// Draw a container size: mostly small sizes near `min`, occasionally
/// anything up to `max`.
pub(crate) fn sample_size(random: &mut Random, min: usize, max: usize, cutoff: usize) -> usize {
    if min >= max {
        return min;
    }
    let cutoff = cutoff.clamp(min, max);
    let size = if cutoff >= max || random.gen_bool(GEOMETRIC_SHARE) {
        geometric_size(random, min, cutoff)
    } else {
        random.gen_range(cutoff + 1..=max)
    };
    trace!("sampled container size {size} in [{min}, {max}] with cutoff {cutoff}");
    size
}

fn geometric_size(random: &mut Random, min: usize, cutoff: usize) -> usize {
    let window = cutoff - min;
    if window == 0 {
        return min;
    }
    // Mean offset is half the window.
    let p = 2.0 / (window as f64 + 2.0);
    let u: f64 = random.gen();
    let offset = ((1.0 - u).ln() / (1.0 - p).ln()).floor();
    if offset.is_finite() && offset <= window as f64 {
        min + offset as usize
    } else {
        random.gen_range(min..=cutoff)
    }
}

type SameFn<T> = dyn Fn(&T, &T) -> bool + Send + Sync;

/// A uniqueness key: two elements with equal features collide.
pub struct FeatureExtractor<T> {
    same: Arc<SameFn<T>>,
    description: Arc<str>,
}

impl<T> Clone for FeatureExtractor<T> {
    fn clone(&self) -> Self {
        FeatureExtractor {
            same: Arc::clone(&self.same),
            description: Arc::clone(&self.description),
        }
    }
}

impl<T: Value> FeatureExtractor<T> {
    /// Compare whole values.
    pub fn identity() -> Self
    where
        T: PartialEq,
    {
        FeatureExtractor {
            same: Arc::new(|a: &T, b: &T| a == b),
            description: Arc::from("identity"),
        }
    }

    /// Compare the keys computed by `key`.
    pub fn by<K, F>(description: impl Into<String>, key: F) -> Self
    where
        K: PartialEq,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        FeatureExtractor {
            same: Arc::new(move |a: &T, b: &T| key(a) == key(b)),
            description: Arc::from(description.into()),
        }
    }

    pub fn collides(&self, a: &T, b: &T) -> bool {
        (self.same)(a, b)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl<T> fmt::Debug for FeatureExtractor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FeatureExtractor")
            .field(&self.description)
            .finish()
    }
}

/// Check that no two values collide under any of the extractors.
pub fn is_unique<T: Value>(values: &[T], extractors: &[FeatureExtractor<T>]) -> bool {
    values.iter().enumerate().all(|(i, value)| {
        !collides_with_any(value, &values[..i], extractors)
    })
}

fn collides_with_any<T: Value>(value: &T, accepted: &[T], extractors: &[FeatureExtractor<T>]) -> bool {
    extractors.iter().any(|extractor| {
        accepted
            .iter()
            .any(|other| extractor.collides(value, other))
    })
}

fn describe<T: Value>(extractors: &[FeatureExtractor<T>]) -> String {
    let names: Vec<&str> = extractors.iter().map(FeatureExtractor::description).collect();
    format!("unique elements by {}", names.join(", "))
}

/// Draw `count` elements, redrawing elements that collide with earlier ones.
pub(crate) fn draw_elements<T: Value>(
    element: &Gen<T>,
    size: Size,
    seed: Seed,
    count: usize,
    uniqueness: &[FeatureExtractor<T>],
) -> Result<Vec<Shrinkable<T>>> {
    let mut elements = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
    let mut values = Vec::with_capacity(count.min(PREALLOCATION_LIMIT));
    let mut seed = seed;
    let mut misses = 0;
    while elements.len() < count {
        let (draw, next) = seed.split();
        seed = next;
        let candidate = element.generate(size, draw)?;
        if collides_with_any(candidate.value(), &values, uniqueness) {
            misses += 1;
            trace!("uniqueness collision at position {}", elements.len());
            if misses >= UNIQUENESS_RETRY_LIMIT {
                debug!(
                    "gave up on {count} unique elements after {misses} collisions, {} drawn",
                    elements.len()
                );
                return Err(ArborError::UnsatisfiableConstraint {
                    constraint: describe(uniqueness),
                    attempted_size: count,
                    attempts: misses,
                });
            }
            continue;
        }
        values.push(candidate.value().clone());
        elements.push(candidate);
    }
    Ok(elements)
}

/// Element vectors sized by `bounds`.
fn sized_container<T: Value>(
    element: Gen<T>,
    bounds: SizeBounds,
    uniqueness: Vec<FeatureExtractor<T>>,
    reorder: bool,
) -> Gen<Vec<T>> {
    if let Some(error) = element.failure() {
        return Gen::failing(error.clone());
    }
    let policy = Arc::new(ContainerPolicy::new(
        bounds.min(),
        bounds.max(),
        uniqueness,
        reorder,
    ));
    Gen::new(move |size, seed| {
        let (size_seed, elements_seed) = seed.split();
        let mut random = Random::new(size_seed);
        let count = sample_size(
            &mut random,
            bounds.min(),
            bounds.max(),
            bounds.cutoff_for(size.get()),
        );
        let elements = draw_elements(&element, size, elements_seed, count, policy.uniqueness())?;
        Ok(container_shrinkable(elements, Arc::clone(&policy)))
    })
}

impl<T: Value> Gen<Vec<T>> {
    /// Lists within `bounds` whose elements are unique under every extractor.
    pub fn list(
        element: Gen<T>,
        bounds: SizeBounds,
        uniqueness: Vec<FeatureExtractor<T>>,
    ) -> Self {
        sized_container(element, bounds, uniqueness, true)
    }

    /// Lists within `bounds` without uniqueness constraints.
    pub fn vec_of(element: Gen<T>, bounds: SizeBounds) -> Self {
        Gen::list(element, bounds, Vec::new())
    }
}

impl<T: Value + Eq + Hash> Gen<HashSet<T>> {
    /// Sets within `bounds`; elements are always unique by identity.
    pub fn set(
        element: Gen<T>,
        bounds: SizeBounds,
        uniqueness: Vec<FeatureExtractor<T>>,
    ) -> Self {
        let mut extractors = vec![FeatureExtractor::identity()];
        extractors.extend(uniqueness);
        sized_container(element, bounds, extractors, false)
            .map(|values| values.into_iter().collect())
    }
}

impl Gen<String> {
    /// Strings whose length in characters lies within `bounds`.
    pub fn strings(chars: Gen<char>, bounds: SizeBounds) -> Self {
        Gen::vec_of(chars, bounds).map(|chars| chars.into_iter().collect())
    }
}
