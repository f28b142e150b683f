//! Edge case properties
//!
//! Edge cases show up verbatim during generation and arbitraries derive
//! sensible boundary values.

use arbor::*;

fn generated<T: Value>(gen: &Gen<T>, trials: u64) -> Vec<T> {
    (0..trials)
        .map(|seed| {
            gen.generate(Size::new(5), Seed::from_u64(seed))
                .unwrap()
                .into_value()
        })
        .collect()
}

/// Property: Range boundaries are generated far more often than by chance
pub fn test_edge_cases_injected() {
    let range = IntegralRange::new(0u64, 1_000_000).unwrap();
    let gen = Gen::integral(range, RandomDistribution::Uniform)
        .with_edge_cases(5, integral_edge_cases(&range));
    let values = generated(&gen, 500);
    for boundary in [0, 1, 1_000_000] {
        assert!(values.contains(&boundary), "edge case {boundary} never generated");
    }
    println!("✓ Edge cases are injected");
}

/// Property: Arbitraries inject their own and their elements' edge cases
pub fn test_arbitrary_edge_cases() {
    let lists = ListArbitrary::new(IntegralArbitrary::new(-3i32, 300).unwrap())
        .of_size(0, 10)
        .unwrap();
    let values = generated(&lists.generator_with_embedded_edge_cases(5), 300);
    assert!(values.contains(&vec![]));
    assert!(values.iter().flatten().any(|&n| n == 300));

    let quiet = lists.clone().without_edge_cases();
    assert!(quiet.edge_cases().is_empty());

    let strings = StringArbitrary::ascii().of_length(0, 4).unwrap();
    let edge_cases = strings.edge_cases().values();
    assert!(edge_cases.contains(&String::new()));
    assert!(edge_cases.iter().all(|s| s.chars().count() <= 1));

    let decimals = decimal_edge_cases(
        &DecimalRange::closed("0.5".parse().unwrap(), "9.5".parse().unwrap()).unwrap(),
        1,
    )
    .unwrap();
    assert_eq!(decimals.get(0).map(|case| *case.value()), "0.5".parse().ok());
    println!("✓ Arbitraries provide edge cases");
}
