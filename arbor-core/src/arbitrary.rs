//! Arbitraries: reusable, immutable descriptions of a value domain.
//!
//! An arbitrary turns into a generator for a given generation size and
//! carries its own edge cases. Optional refinements (size bounds, unique
//! elements, disabling edge cases) are advertised through [`Capabilities`]
//! and applied with [`Arbitrary::refine`], which returns a new arbitrary.

use crate::container::{default_cutoff_size, FeatureExtractor, SizeBounds};
use crate::data::Value;
use crate::edge::EdgeCases;
use crate::error::Result;
use crate::gen::Gen;
use crate::numeric::{
    char_ordinal, integral_edge_cases, ordinal_char, Integral, IntegralRange, RandomDistribution,
};
use crate::shrink::{container_shrinkable, ContainerPolicy};
use crate::shrinkable::Shrinkable;
use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

/// Optional refinements an arbitrary supports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub size_bounds: bool,
    pub uniqueness: bool,
    pub edge_cases: bool,
}

/// A refinement applied through [`Arbitrary::refine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refinement {
    SizeBounds(SizeBounds),
    UniqueElements,
    WithoutEdgeCases,
}

impl Refinement {
    /// Whether arbitraries with these capabilities accept this refinement.
    pub fn supported_by(&self, capabilities: Capabilities) -> bool {
        match self {
            Refinement::SizeBounds(_) => capabilities.size_bounds,
            Refinement::UniqueElements => capabilities.uniqueness,
            Refinement::WithoutEdgeCases => capabilities.edge_cases,
        }
    }
}

/// A value domain with its default generation and shrinking policy.
pub trait Arbitrary<T: Value>: Send + Sync {
    /// A generator tuned for the generation size.
    fn generator(&self, gen_size: usize) -> Gen<T>;

    fn edge_cases(&self) -> EdgeCases<T> {
        EdgeCases::none()
    }

    /// The generator with this arbitrary's edge cases injected.
    fn generator_with_embedded_edge_cases(&self, gen_size: usize) -> Gen<T> {
        self.generator(gen_size)
            .with_edge_cases(gen_size, self.edge_cases())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Apply a refinement; `None` if this arbitrary does not support it.
    fn refine(&self, _refinement: Refinement) -> Option<Arc<dyn Arbitrary<T>>> {
        None
    }
}

impl<T: Value> Gen<T> {
    /// Pick an arbitrary with probability proportional to its weight and
    /// generate from it.
    pub fn frequency_of(
        alternatives: Vec<(u32, Arc<dyn Arbitrary<T>>)>,
        gen_size: usize,
        with_embedded_edge_cases: bool,
    ) -> Self {
        Gen::frequency(alternatives).flat_map(move |arbitrary| {
            if with_embedded_edge_cases {
                arbitrary.generator_with_embedded_edge_cases(gen_size)
            } else {
                arbitrary.generator(gen_size)
            }
        })
    }
}

/// Integers of any primitive type.
#[derive(Debug, Clone, Copy)]
pub struct IntegralArbitrary<T> {
    range: IntegralRange<T>,
    distribution: RandomDistribution,
    edge_cases: bool,
}

impl<T: Integral> IntegralArbitrary<T> {
    pub fn new(min: T, max: T) -> Result<Self> {
        Ok(IntegralArbitrary::from_range(IntegralRange::new(min, max)?))
    }

    pub fn from_range(range: IntegralRange<T>) -> Self {
        IntegralArbitrary {
            range,
            distribution: RandomDistribution::default(),
            edge_cases: true,
        }
    }

    /// All values of the type.
    pub fn full() -> Self {
        IntegralArbitrary::from_range(IntegralRange::full())
    }

    pub fn with_target(self, target: T) -> Result<Self> {
        Ok(IntegralArbitrary {
            range: self.range.with_target(target)?,
            ..self
        })
    }

    pub fn with_distribution(self, distribution: RandomDistribution) -> Self {
        IntegralArbitrary {
            distribution,
            ..self
        }
    }

    pub fn without_edge_cases(self) -> Self {
        IntegralArbitrary {
            edge_cases: false,
            ..self
        }
    }

    pub fn range(&self) -> &IntegralRange<T> {
        &self.range
    }
}

impl<T: Integral> Arbitrary<T> for IntegralArbitrary<T> {
    fn generator(&self, _gen_size: usize) -> Gen<T> {
        Gen::integral(self.range, self.distribution)
    }

    fn edge_cases(&self) -> EdgeCases<T> {
        if self.edge_cases {
            integral_edge_cases(&self.range)
        } else {
            EdgeCases::none()
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            edge_cases: true,
            ..Capabilities::default()
        }
    }

    fn refine(&self, refinement: Refinement) -> Option<Arc<dyn Arbitrary<T>>> {
        match refinement {
            Refinement::WithoutEdgeCases => Some(Arc::new(self.without_edge_cases())),
            _ => None,
        }
    }
}

/// Characters from an inclusive range.
#[derive(Debug, Clone, Copy)]
pub struct CharArbitrary {
    range: IntegralRange<u32>,
    edge_cases: bool,
}

impl CharArbitrary {
    pub fn new(min: char, max: char) -> Result<Self> {
        Ok(CharArbitrary {
            range: IntegralRange::new(char_ordinal(min), char_ordinal(max))?,
            edge_cases: true,
        })
    }

    /// Printable ASCII characters.
    pub fn ascii() -> Self {
        CharArbitrary {
            range: IntegralRange::spanning(char_ordinal(' '), char_ordinal('~')),
            edge_cases: true,
        }
    }

    /// Every Unicode scalar value.
    pub fn all() -> Self {
        CharArbitrary {
            range: IntegralRange::spanning(char_ordinal('\0'), char_ordinal(char::MAX)),
            edge_cases: true,
        }
    }

    pub fn without_edge_cases(self) -> Self {
        CharArbitrary {
            edge_cases: false,
            ..self
        }
    }
}

impl Arbitrary<char> for CharArbitrary {
    fn generator(&self, _gen_size: usize) -> Gen<char> {
        Gen::integral(self.range, RandomDistribution::Uniform).map(ordinal_char)
    }

    fn edge_cases(&self) -> EdgeCases<char> {
        if self.edge_cases {
            integral_edge_cases(&self.range).map(ordinal_char)
        } else {
            EdgeCases::none()
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            edge_cases: true,
            ..Capabilities::default()
        }
    }

    fn refine(&self, refinement: Refinement) -> Option<Arc<dyn Arbitrary<char>>> {
        match refinement {
            Refinement::WithoutEdgeCases => Some(Arc::new(self.without_edge_cases())),
            _ => None,
        }
    }
}

/// Bounds with the cutoff fixed for the generation size.
fn bounds_for(bounds: SizeBounds, gen_size: usize) -> SizeBounds {
    match bounds.cutoff() {
        Some(_) => bounds,
        None => bounds
            .with_cutoff(default_cutoff_size(bounds.min(), bounds.max(), gen_size))
            .unwrap_or(bounds),
    }
}

/// Container edge cases: the empty container and single-element containers.
fn container_edge_cases<T: Value + PartialEq>(
    element_edge_cases: &EdgeCases<T>,
    policy: Arc<ContainerPolicy<T>>,
    bounds: SizeBounds,
) -> EdgeCases<Vec<T>> {
    let mut cases = Vec::new();
    if bounds.contains(0) {
        cases.push(container_shrinkable(Vec::new(), Arc::clone(&policy)));
    }
    if bounds.contains(1) {
        cases.extend(
            element_edge_cases
                .iter()
                .map(|element| container_shrinkable(vec![element.clone()], Arc::clone(&policy))),
        );
    }
    EdgeCases::from_shrinkables(cases)
}

/// Lists of elements drawn from another arbitrary.
#[derive(Clone)]
pub struct ListArbitrary<T: Value> {
    element: Arc<dyn Arbitrary<T>>,
    bounds: SizeBounds,
    uniqueness: Vec<FeatureExtractor<T>>,
    edge_cases: bool,
}

impl<T: Value + PartialEq> ListArbitrary<T> {
    pub fn new<A: Arbitrary<T> + 'static>(element: A) -> Self {
        ListArbitrary::from_shared(Arc::new(element))
    }

    pub fn from_shared(element: Arc<dyn Arbitrary<T>>) -> Self {
        ListArbitrary {
            element,
            bounds: SizeBounds::default(),
            uniqueness: Vec::new(),
            edge_cases: true,
        }
    }

    pub fn with_size_bounds(self, bounds: SizeBounds) -> Self {
        ListArbitrary { bounds, ..self }
    }

    pub fn of_size(self, min: usize, max: usize) -> Result<Self> {
        Ok(self.with_size_bounds(SizeBounds::new(min, max)?))
    }

    /// Raise the minimum size, keeping the current maximum.
    pub fn of_min_size(self, min: usize) -> Result<Self> {
        let max = self.bounds.max();
        self.of_size(min, max)
    }

    /// Lower the maximum size, keeping the current minimum.
    pub fn of_max_size(self, max: usize) -> Result<Self> {
        let min = self.bounds.min();
        self.of_size(min, max)
    }

    /// Elements unique by identity.
    pub fn unique(self) -> Self {
        self.unique_by(FeatureExtractor::identity())
    }

    pub fn unique_by(mut self, extractor: FeatureExtractor<T>) -> Self {
        self.uniqueness.push(extractor);
        self
    }

    pub fn without_edge_cases(self) -> Self {
        ListArbitrary {
            edge_cases: false,
            ..self
        }
    }

    fn list(&self, element: Gen<T>, gen_size: usize) -> Gen<Vec<T>> {
        Gen::list(
            element,
            bounds_for(self.bounds, gen_size),
            self.uniqueness.clone(),
        )
    }
}

impl<T: Value + PartialEq> Arbitrary<Vec<T>> for ListArbitrary<T> {
    fn generator(&self, gen_size: usize) -> Gen<Vec<T>> {
        self.list(self.element.generator(gen_size), gen_size)
    }

    fn generator_with_embedded_edge_cases(&self, gen_size: usize) -> Gen<Vec<T>> {
        self.list(self.element.generator_with_embedded_edge_cases(gen_size), gen_size)
            .with_edge_cases(gen_size, self.edge_cases())
    }

    fn edge_cases(&self) -> EdgeCases<Vec<T>> {
        if !self.edge_cases {
            return EdgeCases::none();
        }
        let policy = Arc::new(ContainerPolicy::new(
            self.bounds.min(),
            self.bounds.max(),
            self.uniqueness.clone(),
            true,
        ));
        container_edge_cases(&self.element.edge_cases(), policy, self.bounds)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            size_bounds: true,
            uniqueness: true,
            edge_cases: true,
        }
    }

    fn refine(&self, refinement: Refinement) -> Option<Arc<dyn Arbitrary<Vec<T>>>> {
        let refined = match refinement {
            Refinement::SizeBounds(bounds) => self.clone().with_size_bounds(bounds),
            Refinement::UniqueElements => self.clone().unique(),
            Refinement::WithoutEdgeCases => self.clone().without_edge_cases(),
        };
        Some(Arc::new(refined))
    }
}

/// Sets of elements drawn from another arbitrary.
#[derive(Clone)]
pub struct SetArbitrary<T: Value> {
    element: Arc<dyn Arbitrary<T>>,
    bounds: SizeBounds,
    uniqueness: Vec<FeatureExtractor<T>>,
    edge_cases: bool,
}

impl<T: Value + Eq + Hash> SetArbitrary<T> {
    pub fn new<A: Arbitrary<T> + 'static>(element: A) -> Self {
        SetArbitrary {
            element: Arc::new(element),
            bounds: SizeBounds::default(),
            uniqueness: Vec::new(),
            edge_cases: true,
        }
    }

    pub fn with_size_bounds(self, bounds: SizeBounds) -> Self {
        SetArbitrary { bounds, ..self }
    }

    pub fn of_size(self, min: usize, max: usize) -> Result<Self> {
        Ok(self.with_size_bounds(SizeBounds::new(min, max)?))
    }

    /// Raise the minimum size, keeping the current maximum.
    pub fn of_min_size(self, min: usize) -> Result<Self> {
        let max = self.bounds.max();
        self.of_size(min, max)
    }

    /// Lower the maximum size, keeping the current minimum.
    pub fn of_max_size(self, max: usize) -> Result<Self> {
        let min = self.bounds.min();
        self.of_size(min, max)
    }

    /// Additional uniqueness on top of set identity.
    pub fn unique_by(mut self, extractor: FeatureExtractor<T>) -> Self {
        self.uniqueness.push(extractor);
        self
    }

    pub fn without_edge_cases(self) -> Self {
        SetArbitrary {
            edge_cases: false,
            ..self
        }
    }

    fn set(&self, element: Gen<T>, gen_size: usize) -> Gen<HashSet<T>> {
        Gen::set(
            element,
            bounds_for(self.bounds, gen_size),
            self.uniqueness.clone(),
        )
    }
}

impl<T: Value + Eq + Hash> Arbitrary<HashSet<T>> for SetArbitrary<T> {
    fn generator(&self, gen_size: usize) -> Gen<HashSet<T>> {
        self.set(self.element.generator(gen_size), gen_size)
    }

    fn generator_with_embedded_edge_cases(&self, gen_size: usize) -> Gen<HashSet<T>> {
        self.set(self.element.generator_with_embedded_edge_cases(gen_size), gen_size)
            .with_edge_cases(gen_size, self.edge_cases())
    }

    fn edge_cases(&self) -> EdgeCases<HashSet<T>> {
        if !self.edge_cases {
            return EdgeCases::none();
        }
        let mut uniqueness = vec![FeatureExtractor::identity()];
        uniqueness.extend(self.uniqueness.iter().cloned());
        let policy = Arc::new(ContainerPolicy::new(
            self.bounds.min(),
            self.bounds.max(),
            uniqueness,
            false,
        ));
        let lists = container_edge_cases(&self.element.edge_cases(), policy, self.bounds);
        let sets: Vec<Shrinkable<HashSet<T>>> = lists
            .iter()
            .map(|list| list.map(|values| values.into_iter().collect::<HashSet<T>>()))
            .collect();
        EdgeCases::from_shrinkables(sets)
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            size_bounds: true,
            uniqueness: true,
            edge_cases: true,
        }
    }

    fn refine(&self, refinement: Refinement) -> Option<Arc<dyn Arbitrary<HashSet<T>>>> {
        let refined = match refinement {
            Refinement::SizeBounds(bounds) => self.clone().with_size_bounds(bounds),
            // Set elements are unique already.
            Refinement::UniqueElements => self.clone(),
            Refinement::WithoutEdgeCases => self.clone().without_edge_cases(),
        };
        Some(Arc::new(refined))
    }
}

/// Strings of characters drawn from a [`CharArbitrary`].
#[derive(Debug, Clone, Copy)]
pub struct StringArbitrary {
    chars: CharArbitrary,
    bounds: SizeBounds,
    unique_chars: bool,
    edge_cases: bool,
}

impl StringArbitrary {
    pub fn new(chars: CharArbitrary) -> Self {
        StringArbitrary {
            chars,
            bounds: SizeBounds::default(),
            unique_chars: false,
            edge_cases: true,
        }
    }

    pub fn ascii() -> Self {
        StringArbitrary::new(CharArbitrary::ascii())
    }

    pub fn with_size_bounds(self, bounds: SizeBounds) -> Self {
        StringArbitrary { bounds, ..self }
    }

    pub fn of_length(self, min: usize, max: usize) -> Result<Self> {
        Ok(self.with_size_bounds(SizeBounds::new(min, max)?))
    }

    pub fn of_min_length(self, min: usize) -> Result<Self> {
        let max = self.bounds.max();
        self.of_length(min, max)
    }

    pub fn of_max_length(self, max: usize) -> Result<Self> {
        let min = self.bounds.min();
        self.of_length(min, max)
    }

    pub fn unique_chars(self) -> Self {
        StringArbitrary {
            unique_chars: true,
            ..self
        }
    }

    pub fn without_edge_cases(self) -> Self {
        StringArbitrary {
            edge_cases: false,
            ..self
        }
    }

    fn string(&self, chars: Gen<char>, gen_size: usize) -> Gen<String> {
        let bounds = bounds_for(self.bounds, gen_size);
        if self.unique_chars {
            Gen::list(chars, bounds, vec![FeatureExtractor::identity()])
                .map(|chars| chars.into_iter().collect())
        } else {
            Gen::strings(chars, bounds)
        }
    }
}

impl Arbitrary<String> for StringArbitrary {
    fn generator(&self, gen_size: usize) -> Gen<String> {
        self.string(self.chars.generator(gen_size), gen_size)
    }

    fn generator_with_embedded_edge_cases(&self, gen_size: usize) -> Gen<String> {
        self.string(self.chars.generator_with_embedded_edge_cases(gen_size), gen_size)
            .with_edge_cases(gen_size, self.edge_cases())
    }

    fn edge_cases(&self) -> EdgeCases<String> {
        if !self.edge_cases {
            return EdgeCases::none();
        }
        let policy = Arc::new(ContainerPolicy::new(
            self.bounds.min(),
            self.bounds.max(),
            Vec::new(),
            true,
        ));
        container_edge_cases(&self.chars.edge_cases(), policy, self.bounds)
            .map(|chars| chars.into_iter().collect::<String>())
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            size_bounds: true,
            uniqueness: true,
            edge_cases: true,
        }
    }

    fn refine(&self, refinement: Refinement) -> Option<Arc<dyn Arbitrary<String>>> {
        let refined = match refinement {
            Refinement::SizeBounds(bounds) => self.with_size_bounds(bounds),
            Refinement::UniqueElements => self.unique_chars(),
            Refinement::WithoutEdgeCases => self.without_edge_cases(),
        };
        Some(Arc::new(refined))
    }
}

type GeneratorFn<T> = dyn Fn(usize) -> Gen<T> + Send + Sync;

/// Adapter turning a generator factory into an arbitrary.
pub struct FnArbitrary<T> {
    generator: Arc<GeneratorFn<T>>,
    edge_cases: EdgeCases<T>,
}

impl<T: Value> Clone for FnArbitrary<T> {
    fn clone(&self) -> Self {
        FnArbitrary {
            generator: Arc::clone(&self.generator),
            edge_cases: self.edge_cases.clone(),
        }
    }
}

impl<T: Value> FnArbitrary<T> {
    pub fn new<F>(generator: F) -> Self
    where
        F: Fn(usize) -> Gen<T> + Send + Sync + 'static,
    {
        FnArbitrary {
            generator: Arc::new(generator),
            edge_cases: EdgeCases::none(),
        }
    }

    /// An arbitrary that ignores the generation size.
    pub fn from_gen(gen: Gen<T>) -> Self {
        FnArbitrary::new(move |_gen_size| gen.clone())
    }

    pub fn with_edge_cases(self, edge_cases: EdgeCases<T>) -> Self {
        FnArbitrary { edge_cases, ..self }
    }
}

impl<T: Value> Arbitrary<T> for FnArbitrary<T> {
    fn generator(&self, gen_size: usize) -> Gen<T> {
        (self.generator)(gen_size)
    }

    fn edge_cases(&self) -> EdgeCases<T> {
        self.edge_cases.clone()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            edge_cases: !self.edge_cases.is_empty(),
            ..Capabilities::default()
        }
    }

    fn refine(&self, refinement: Refinement) -> Option<Arc<dyn Arbitrary<T>>> {
        match refinement {
            Refinement::WithoutEdgeCases if !self.edge_cases.is_empty() => Some(Arc::new(
                self.clone().with_edge_cases(EdgeCases::none()),
            )),
            _ => None,
        }
    }
}
