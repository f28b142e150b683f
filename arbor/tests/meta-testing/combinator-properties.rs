//! Combinator properties
//!
//! Sampling, choice, shuffling and failure propagation behave the same no
//! matter how generators are composed.

use crate::for_all_trials;
use arbor::*;

/// Property: Samples cycle in order and wrap after the last one
pub fn test_samples_cycle() {
    let gen = Gen::samples_from_shrinkables(vec![
        Shrinkable::unshrinkable("A"),
        Shrinkable::unshrinkable("B"),
        Shrinkable::unshrinkable("C"),
    ]);
    let drawn: Vec<&str> = (0..4)
        .map(|seed| {
            gen.generate(Size::new(seed), Seed::from_u64(seed as u64))
                .unwrap()
                .into_value()
        })
        .collect();
    assert_eq!(drawn, vec!["A", "B", "C", "A"]);
    println!("✓ Samples cycle A, B, C, A");
}

/// Property: `one_of` shrinks within the chosen generator first
pub fn test_one_of_flattens() {
    let gen = Gen::one_of(vec![
        Gen::<i32>::integers(0, 10).unwrap(),
        Gen::<i32>::integers(100, 110).unwrap(),
    ]);
    for_all_trials("one_of shrinks within chosen generator", |size, seed| {
        let shrinkable = gen.generate(size, seed).unwrap();
        let value = *shrinkable.value();
        let target = if value >= 100 { 100 } else { 0 };
        let first = shrinkable.shrink().next().map(|candidate| *candidate.value());
        let in_domain = shrinkable
            .shrink()
            .all(|candidate| (0..=10).contains(candidate.value()) || (100..=110).contains(candidate.value()));
        in_domain && (value == target || first == Some(target))
    });
}

/// Property: Shuffles are unshrinkable permutations
pub fn test_shuffle_is_permutation() {
    let values: Vec<u16> = (0..12).collect();
    let gen = Gen::shuffle(values.clone());
    let mut orders = std::collections::HashSet::new();
    for_all_trials("shuffle is a permutation", |size, seed| {
        let shrinkable = gen.generate(size, seed).unwrap();
        let mut sorted = shrinkable.value().clone();
        sorted.sort();
        sorted == values && !shrinkable.has_shrinks()
    });
    for seed in 0..20 {
        let shrinkable = gen.generate(Size::new(10), Seed::from_u64(seed)).unwrap();
        orders.insert(shrinkable.into_value());
    }
    assert!(orders.len() > 1);
}

/// Property: A failing generator stays failing through every combinator
pub fn test_failure_propagates_through_composition() {
    let failing: Gen<i32> = Gen::fail("no integers");
    let expected = ArborError::empty_domain("no integers");

    let composed = failing
        .clone()
        .map(|n| n * 2)
        .filter(|n| n % 3 == 0)
        .flat_map(|n| Gen::constant(n + 1));
    assert_eq!(composed.failure(), Some(&expected));

    let list = Gen::vec_of(failing.clone(), SizeBounds::default());
    assert_eq!(list.failure(), Some(&expected));

    let collected = failing.clone().collect(|values: &[i32]| values.len() > 3);
    assert_eq!(collected.failure(), Some(&expected));

    let edged = failing.with_edge_cases(10, EdgeCases::from_values(vec![1]));
    assert_eq!(edged.failure(), Some(&expected));

    let rescued = Gen::one_of(vec![Gen::fail("no integers"), Gen::constant(4)]);
    assert!(rescued.failure().is_none());
    println!("✓ Failures propagate through composition");
}
