//! Shrinking demonstration
//!
//! This example generates failing values and minimizes them with the
//! reference shrink loop, printing each counterexample before and after.

use arbor::*;

fn main() -> Result<()> {
    println!("=== Shrinking Demonstration ===\n");

    // Example 1: A list whose sum is too large
    example_sum_too_large()?;

    // Example 2: Unique elements under a custom key
    example_unique_words()?;

    // Example 3: Shrink trees of a single integer
    example_integer_tree()?;

    // Example 4: Arbitraries mixed by frequency
    example_frequency_of()?;

    Ok(())
}

/// Find the first seed whose value falsifies the predicate.
fn find_failure<T, F>(gen: &Gen<T>, falsifies: F) -> Result<Option<Shrinkable<T>>>
where
    T: Value,
    F: Fn(&T) -> bool,
{
    let config = Config::default();
    for trial in 0..500 {
        let size = config.size_for_trial(trial, 500);
        let shrinkable = gen.generate(size, Seed::from_u64(trial as u64))?;
        if falsifies(shrinkable.value()) {
            return Ok(Some(shrinkable));
        }
    }
    Ok(None)
}

/// Example 1: Lists of small integers with a sum above twenty
fn example_sum_too_large() -> Result<()> {
    println!("1. Lists of integers in [0, 10] summing to more than 20");

    let gen = Gen::vec_of(Gen::<i32>::integers(0, 10)?, SizeBounds::new(0, 5)?);
    let falsifies = |values: &Vec<i32>| values.iter().sum::<i32>() > 20;

    match find_failure(&gen, falsifies)? {
        Some(failure) => {
            println!("   original: {:?}", failure.value());
            let outcome = minimize(failure, falsifies, &Config::default());
            println!(
                "   shrunk:   {:?} after {} steps and {} attempts\n",
                outcome.value(),
                outcome.steps,
                outcome.attempts
            );
        }
        None => println!("   no failure found\n"),
    }
    Ok(())
}

/// Example 2: Words unique by their first letter
fn example_unique_words() -> Result<()> {
    println!("2. Word lists unique by first letter, failing when longer than 3");

    let words = Gen::strings(Gen::chars('a', 'f')?, SizeBounds::new(1, 6)?);
    let first_letter = FeatureExtractor::by("first letter", |word: &String| word.chars().next());
    let gen = Gen::list(words, SizeBounds::new(0, 6)?, vec![first_letter]);
    let falsifies = |values: &Vec<String>| values.len() > 3;

    match find_failure(&gen, falsifies)? {
        Some(failure) => {
            println!("   original: {:?}", failure.value());
            let outcome = minimize(failure, falsifies, &Config::default());
            println!("   shrunk:   {:?}\n", outcome.value());
        }
        None => println!("   no failure found\n"),
    }
    Ok(())
}

/// Example 3: The first levels of an integer shrink tree
fn example_integer_tree() -> Result<()> {
    println!("3. Shrink tree of an integer in [-100, 100]");

    let gen = Gen::<i32>::integers(-100, 100)?;
    let shrinkable = gen.generate(Size::new(50), Seed::from_u64(42))?;
    println!("   {}", shrinkable.render_shrinks(8));
    println!("{}", shrinkable.render(2));
    Ok(())
}

/// Example 4: Small numbers, large numbers and edge cases mixed by weight
fn example_frequency_of() -> Result<()> {
    println!("4. Arbitraries mixed by frequency");

    let small: std::sync::Arc<dyn Arbitrary<i64>> =
        std::sync::Arc::new(IntegralArbitrary::new(0i64, 9)?);
    let large: std::sync::Arc<dyn Arbitrary<i64>> = std::sync::Arc::new(
        IntegralArbitrary::new(0i64, 1_000_000)?.with_distribution(RandomDistribution::gaussian()),
    );
    let gen = Gen::frequency_of(vec![(3, small), (1, large)], 20, true);

    let values: Vec<i64> = (0..12)
        .map(|seed| {
            gen.generate(Size::new(20), Seed::from_u64(seed))
                .map(Shrinkable::into_value)
        })
        .collect::<Result<_>>()?;
    println!("   {values:?}");
    Ok(())
}
