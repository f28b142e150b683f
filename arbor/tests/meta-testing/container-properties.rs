//! Container generation properties
//!
//! Sizes respect their bounds, uniqueness holds for every extractor, and
//! both hold for every shrink candidate as well.

use crate::for_all_trials;
use arbor::*;

/// Property: Generated containers and their candidates respect size bounds
pub fn test_container_sizes_within_bounds() {
    for (min, max) in [(0, 0), (0, 5), (3, 3), (2, 40), (10, 255)] {
        let bounds = SizeBounds::new(min, max).unwrap();
        let gen = Gen::vec_of(Gen::<i8>::integers(-10, 10).unwrap(), bounds);
        for_all_trials("container sizes within bounds", |size, seed| {
            let shrinkable = gen.generate(size, seed).unwrap();
            bounds.contains(shrinkable.value().len())
                && shrinkable
                    .shrink()
                    .take(100)
                    .all(|candidate| bounds.contains(candidate.value().len()))
        });
    }
}

/// Property: No two elements share a key under any configured extractor
pub fn test_unique_elements() {
    let by_magnitude = FeatureExtractor::by("magnitude", |n: &i32| n.abs());
    let by_parity = FeatureExtractor::by("parity", |n: &i32| n.rem_euclid(2));
    let gen = Gen::list(
        Gen::<i32>::integers(-20, 20).unwrap(),
        SizeBounds::new(0, 2).unwrap(),
        vec![by_magnitude.clone(), by_parity.clone()],
    );
    let extractors = [by_magnitude, by_parity];
    for_all_trials("unique elements", |size, seed| {
        let shrinkable = gen.generate(size, seed).unwrap();
        is_unique(shrinkable.value(), &extractors)
            && shrinkable
                .shrink()
                .take(100)
                .all(|candidate| is_unique(candidate.value(), &extractors))
    });
}

/// Property: Sets and strings respect bounds and element domains
pub fn test_sets_and_strings() {
    let bounds = SizeBounds::new(1, 12).unwrap();
    let sets = Gen::set(Gen::<u64>::integers(0, 30).unwrap(), bounds, Vec::new());
    for_all_trials("set sizes within bounds", |size, seed| {
        let shrinkable = sets.generate(size, seed).unwrap();
        bounds.contains(shrinkable.value().len())
            && shrinkable.value().iter().all(|&n| n <= 30)
    });

    let strings = Gen::strings(Gen::chars('0', '9').unwrap(), bounds);
    for_all_trials("strings within bounds", |size, seed| {
        let shrinkable = strings.generate(size, seed).unwrap();
        let value = shrinkable.value();
        bounds.contains(value.chars().count())
            && value.chars().all(|c| c.is_ascii_digit())
            && shrinkable
                .shrink()
                .take(50)
                .all(|candidate| bounds.contains(candidate.value().chars().count()))
    });

    let words = Gen::set(
        Gen::strings(Gen::chars('a', 'b').unwrap(), SizeBounds::new(1, 2).unwrap()),
        SizeBounds::new(0, 6).unwrap(),
        Vec::new(),
    );
    for_all_trials("sets of strings hold distinct values", |size, seed| {
        let shrinkable = words.generate(size, seed).unwrap();
        shrinkable.value().len() <= 6
            && shrinkable.value().iter().all(|word| (1..=2).contains(&word.len()))
    });
}

/// Property: Collected lists stay shortest prefixes satisfying their predicate
pub fn test_collect_shrinks_keep_predicate() {
    let until = |values: &[u32]| values.iter().sum::<u32>() >= 30;
    let gen = Gen::<u32>::integers(1, 10).unwrap().collect(until);
    for_all_trials("collect shrinks keep predicate", |size, seed| {
        let shrinkable = gen.generate(size, seed).unwrap();
        let keeps = |values: &Vec<u32>| {
            until(values.as_slice()) && !until(&values[..values.len() - 1])
        };
        keeps(shrinkable.value())
            && shrinkable
                .shrink()
                .take(50)
                .all(|candidate| keeps(candidate.value()))
    });
}
