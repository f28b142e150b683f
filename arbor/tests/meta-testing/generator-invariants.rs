//! Generator invariants
//!
//! Generated values always belong to the declared domain, the same seed
//! always reproduces the same value, and errors surface at the right time.

use crate::for_all_trials;
use arbor::*;

/// Property: Values lie within their declared ranges for every size
pub fn test_values_stay_in_domain() {
    let integers = Gen::<i16>::integers(-300, 300).unwrap();
    for_all_trials("integers stay in range", |size, seed| {
        let value = *integers.generate(size, seed).unwrap().value();
        (-300..=300).contains(&value)
    });

    let chars = Gen::chars('α', 'ω').unwrap();
    for_all_trials("chars stay in range", |size, seed| {
        let value = *chars.generate(size, seed).unwrap().value();
        ('α'..='ω').contains(&value)
    });

    let range = DecimalRange::new(
        "-1.5".parse().unwrap(),
        false,
        "2.25".parse().unwrap(),
        true,
    )
    .unwrap();
    let decimals =
        Gen::big_decimals(range, 2, Decimal::zero(), RandomDistribution::Biased).unwrap();
    for_all_trials("decimals stay in range", |size, seed| {
        let value = *decimals.generate(size, seed).unwrap().value();
        range.contains(value) && value.scale() == 2
    });
}

/// Property: Identically seeded generation produces identical shrink trees
pub fn test_generation_is_deterministic() {
    let bounds = SizeBounds::new(0, 20).unwrap();
    let gen = Gen::list(
        Gen::<i32>::integers(-50, 50).unwrap(),
        bounds,
        vec![FeatureExtractor::identity()],
    );
    for_all_trials("generation is deterministic", |size, seed| {
        let first = gen.generate(size, seed).unwrap();
        let second = gen.generate(size, seed).unwrap();
        first.value() == second.value()
            && first.distance() == second.distance()
            && first.shrinks(30) == second.shrinks(30)
    });
}

/// Property: Empty domains are valid generators that fail on first use
pub fn test_empty_domain_fails_lazily() {
    let empty: Gen<String> = Gen::choose(vec![]);
    assert!(matches!(empty.failure(), Some(ArborError::EmptyDomain { .. })));
    assert!(matches!(
        empty.generate(Size::new(10), Seed::from_u64(0)),
        Err(ArborError::EmptyDomain { .. })
    ));

    let nested = Gen::vec_of(Gen::<u8>::one_of(vec![]), SizeBounds::default());
    assert!(matches!(
        nested.generate(Size::new(10), Seed::from_u64(0)),
        Err(ArborError::EmptyDomain { .. })
    ));

    let frequencies = Gen::frequency(vec![(0, 'a'), (0, 'b')]);
    assert!(frequencies
        .generate(Size::new(10), Seed::from_u64(0))
        .is_err());
    println!("✓ Empty domains fail lazily");
}

/// Property: Malformed bounds are rejected when the generator is built
pub fn test_invalid_configuration_fails_fast() {
    let invalid = |result: Result<()>| matches!(result, Err(ArborError::InvalidConfiguration { .. }));

    assert!(invalid(Gen::<i32>::integers(5, 1).map(|_| ())));
    assert!(invalid(
        Gen::big_integers(0, 10, 11, RandomDistribution::Uniform).map(|_| ())
    ));
    assert!(invalid(Gen::chars('b', 'a').map(|_| ())));
    assert!(invalid(SizeBounds::new(3, 2).map(|_| ())));
    assert!(invalid(
        SizeBounds::new(0, 10).and_then(|bounds| bounds.with_cutoff(11)).map(|_| ())
    ));
    assert!(invalid(
        DecimalRange::closed(Decimal::from(3), Decimal::from(1)).map(|_| ())
    ));
    println!("✓ Invalid configuration fails fast");
}
