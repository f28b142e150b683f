//! Shrinking correctness properties
//!
//! These properties ensure that shrinking stays within the domain, only
//! proposes simpler candidates and converges to local minima.

use crate::for_all_trials;
use arbor::*;
use std::sync::Arc;

/// Property: Following the first shrink reaches the target in bounded steps
pub fn test_integer_shrinking_converges() {
    for (min, max, target) in [(-1000, 1000, 0), (10, 500, 10), (-500, -10, -10)] {
        let gen = Gen::<i64>::integers(min, max).unwrap();
        for_all_trials("integer shrinking converges", |size, seed| {
            let mut current = gen.generate(size, seed).unwrap();
            for _ in 0..64 {
                if !(min..=max).contains(current.value()) {
                    return false;
                }
                match current.shrink().next() {
                    Some(next) => current = next,
                    None => break,
                }
            }
            *current.value() == target
        });
    }
}

/// Property: Container candidates are never larger or farther than their parent
pub fn test_shrink_candidates_are_simpler() {
    let gen = Gen::vec_of(
        Gen::<u32>::integers(0, 1000).unwrap(),
        SizeBounds::new(0, 30).unwrap(),
    );
    for_all_trials("container candidates are simpler", |size, seed| {
        let shrinkable = gen.generate(size, seed).unwrap();
        shrinkable.shrink().take(300).all(|candidate| {
            candidate.value().len() <= shrinkable.value().len()
                && candidate.distance() <= shrinkable.distance()
        })
    });
}

fn integer_shrinkable(value: i32) -> Shrinkable<i32> {
    let gen = Gen::<i32>::integers(0, 10).unwrap();
    (0..)
        .map(|seed| gen.generate(Size::new(10), Seed::from_u64(seed)).unwrap())
        .find(|shrinkable| *shrinkable.value() == value)
        .unwrap()
}

/// Property: `[9, 9, 9]` with "sum > 20" shrinks to a local minimum summing to 21
pub fn test_sum_counterexample_is_local_minimum() {
    let nine = integer_shrinkable(9);
    let policy = Arc::new(ContainerPolicy::new(0, 5, Vec::new(), true));
    let start = container_shrinkable(vec![nine.clone(), nine.clone(), nine], policy);
    let falsifies = |values: &Vec<i32>| values.iter().sum::<i32>() > 20;

    let outcome = minimize(start, falsifies, &Config::default());
    let minimal = outcome.value();
    assert!(minimal.len() <= 3);
    assert_eq!(minimal.iter().sum::<i32>(), 21);
    assert!(outcome
        .shrinkable
        .shrink()
        .all(|candidate| !falsifies(candidate.value())));
    println!("✓ Shrunk [9, 9, 9] to {minimal:?} in {} steps", outcome.steps);
}

fn is_reordering(candidate: &[u8], original: &[u8]) -> bool {
    let mut left = candidate.to_vec();
    let mut right = original.to_vec();
    left.sort();
    right.sort();
    left == right && candidate != original
}

/// Property: Sorted containers propose no reorderings; unsorted ones do
pub fn test_sorted_containers_have_no_reorderings() {
    let gen = Gen::vec_of(
        Gen::<u8>::integers(0, 100).unwrap(),
        SizeBounds::new(0, 8).unwrap(),
    );
    for_all_trials("sort step is idempotent", |size, seed| {
        let shrinkable = gen.generate(size, seed).unwrap();
        let value = shrinkable.value().clone();
        let sorted = value.windows(2).all(|pair| pair[0] <= pair[1]);
        let reorders = shrinkable
            .shrink()
            .filter(|candidate| is_reordering(candidate.value(), &value))
            .count();
        if sorted {
            reorders == 0
        } else {
            reorders > 0
        }
    });
}

/// Property: Greedy shrinking stops at the smallest falsifying value
pub fn test_shrinking_terminates() {
    let gen = Gen::vec_of(
        Gen::<u32>::integers(0, 100).unwrap(),
        SizeBounds::new(0, 20).unwrap(),
    );
    let falsifies = |values: &Vec<u32>| values.iter().any(|&v| v >= 10);
    for_all_trials("shrinking terminates at a minimum", |size, seed| {
        let shrinkable = gen.generate(size, seed).unwrap();
        if !falsifies(shrinkable.value()) {
            return true;
        }
        let outcome = minimize(shrinkable, falsifies, &Config::default());
        outcome.value() == &vec![10]
    });
}
