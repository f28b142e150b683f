//! Distribution validation
//!
//! Sampling shapes change which values are likely, never which values are
//! legal or where shrinking converges.

use crate::for_all_trials;
use arbor::*;

/// Property: Frequencies follow their weights; zero weights never win
pub fn test_frequency_weights() {
    let gen = Gen::frequency(vec![(1, 'a'), (3, 'b'), (0, 'c')]);
    let mut counts = [0usize; 3];
    for seed in 0..4000 {
        let value = gen
            .generate(Size::new(10), Seed::from_u64(seed))
            .unwrap()
            .into_value();
        counts[(value as u8 - b'a') as usize] += 1;
    }
    let ratio = counts[1] as f64 / counts[0] as f64;
    assert_eq!(counts[2], 0);
    assert!((2.5..3.5).contains(&ratio), "weight ratio was {ratio}");
    println!("✓ Frequency weights respected: {counts:?}");
}

/// Property: Every distribution stays in range and shrinks to the target
pub fn test_distributions_keep_range_and_target() {
    let distributions = [
        RandomDistribution::Uniform,
        RandomDistribution::Biased,
        RandomDistribution::gaussian(),
        RandomDistribution::Gaussian { border_sigmas: 0.5 },
    ];
    for distribution in distributions {
        let gen = Gen::big_integers(-50, 5000, 7, distribution).unwrap();
        for_all_trials("distribution keeps range and target", |size, seed| {
            let shrinkable = gen.generate(size, seed).unwrap();
            let value = *shrinkable.value();
            let first = shrinkable.shrink().next().map(|candidate| *candidate.value());
            (-50..=5000).contains(&value) && (value == 7 || first == Some(7))
        });
    }
}

/// Property: Most container sizes fall below the cutoff
pub fn test_container_sizes_favour_small() {
    let bounds = SizeBounds::new(0, 100).unwrap();
    let gen = Gen::vec_of(Gen::constant(()), bounds);
    let cutoff = bounds.cutoff_for(100);
    let small = (0..1000)
        .filter(|&seed| {
            let shrinkable = gen.generate(Size::new(100), Seed::from_u64(seed)).unwrap();
            shrinkable.value().len() <= cutoff
        })
        .count();
    assert_eq!(cutoff, 10);
    assert!(small > 800, "only {small} of 1000 sizes at or below the cutoff");
    println!("✓ {small} of 1000 container sizes at or below the cutoff");
}
