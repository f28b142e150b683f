//! Core data types: size hints, splittable seeds and driver configuration.

use rand::RngCore;
use std::fmt;

/// Bound satisfied by every type a generator can produce.
///
/// Generators and their shrink trees are shared freely between trials and
/// threads, so generated values must be cheap to clone and thread-safe.
pub trait Value: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Value for T {}

/// Size hint passed to every generator.
///
/// Engines usually grow it from 0 towards 100 over a run. Container
/// generators derive their size cutoff from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Size(pub usize);

impl Size {
    /// Create a new size value.
    pub fn new(value: usize) -> Self {
        Size(value)
    }

    /// Get the inner size value.
    pub fn get(&self) -> usize {
        self.0
    }

    /// Size for the given trial when `trials` trials are spread over `0..limit`.
    pub fn for_trial(trial: usize, trials: usize, limit: usize) -> Self {
        match trials {
            0 => Size(0),
            _ => Size(trial.saturating_mul(limit) / trials),
        }
    }

    /// The smaller of this size and `max`.
    pub fn at_most(&self, max: usize) -> Self {
        Size(self.0.min(max))
    }
}

impl From<usize> for Size {
    fn from(size: usize) -> Self {
        Size(size)
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Size({})", self.0)
    }
}

/// Splittable SplitMix64 seed.
///
/// A seed is an immutable position in a random stream. Every draw returns
/// the value together with the advanced seed, and [`Seed::split`] forks two
/// independent streams, so one seed always reproduces the same shrinkable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Seed {
    state: u64,
    gamma: u64,
}

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

impl Seed {
    pub fn from_u64(value: u64) -> Self {
        let state = mix64(value);
        Seed {
            state,
            gamma: gamma_for(state),
        }
    }

    /// Fork into two independent streams.
    pub fn split(self) -> (Self, Self) {
        let (output, advanced) = self.step();
        let forked = Seed {
            state: output,
            gamma: gamma_for(output),
        };
        (advanced, forked)
    }

    /// Draw a raw 64-bit value.
    pub fn next_u64(self) -> (u64, Self) {
        self.step()
    }

    /// Draw a value in `[0, bound)`; a zero bound always yields 0.
    pub fn next_bounded(self, bound: u64) -> (u64, Self) {
        let (raw, next) = self.step();
        let scaled = (u128::from(raw) * u128::from(bound)) >> 64;
        (scaled as u64, next)
    }

    pub fn next_bool(self) -> (bool, Self) {
        let (raw, next) = self.step();
        (raw >> 63 == 1, next)
    }

    /// A fresh seed from thread-local entropy.
    pub fn random() -> Self {
        use rand::Rng;
        Seed::from_u64(rand::thread_rng().gen())
    }

    /// Turn this seed into a mutable randomness source.
    pub fn random_source(self) -> Random {
        Random { seed: self }
    }

    fn step(self) -> (u64, Self) {
        let state = self.state.wrapping_add(self.gamma);
        (mix64(state), Seed { state, ..self })
    }
}

impl fmt::Display for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed({:#018x}, {:#018x})", self.state, self.gamma)
    }
}

/// A mutable randomness source walking a [`Seed`] stream.
///
/// Owned exclusively by the generation step that created it.
#[derive(Debug, Clone)]
pub struct Random {
    seed: Seed,
}

impl Random {
    pub fn new(seed: Seed) -> Self {
        Random { seed }
    }

    /// The seed the next draw will come from.
    pub fn seed(&self) -> Seed {
        self.seed
    }
}

impl RngCore for Random {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        let (value, next) = self.seed.next_u64();
        self.seed = next;
        value
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// Configuration for driving a shrink search.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of accepted shrink steps.
    pub shrink_limit: usize,

    /// Maximum number of shrink candidates evaluated.
    pub attempt_limit: usize,

    /// Largest size hint handed to generators.
    pub size_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            shrink_limit: 1000,
            attempt_limit: 10_000,
            size_limit: 100,
        }
    }
}

impl Config {
    /// Cap the number of accepted shrink steps.
    pub fn with_shrinks(mut self, shrinks: usize) -> Self {
        self.shrink_limit = shrinks;
        self
    }

    /// Cap the number of shrink candidates evaluated.
    pub fn with_attempts(mut self, attempts: usize) -> Self {
        self.attempt_limit = attempts;
        self
    }

    /// Cap the size hint handed to generators.
    pub fn with_size_limit(mut self, size: usize) -> Self {
        self.size_limit = size;
        self
    }

    /// Size hint for a trial, growing from 0 to `size_limit` over `trials` trials.
    pub fn size_for_trial(&self, trial: usize, trials: usize) -> Size {
        Size::for_trial(trial, trials, self.size_limit.saturating_add(1)).at_most(self.size_limit)
    }
}

fn mix64(mut z: u64) -> u64 {
    z = z.wrapping_add(GOLDEN_GAMMA);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

// Odd gammas give every stream the full 2^64 period.
fn gamma_for(state: u64) -> u64 {
    (mix64(state) | 1).wrapping_mul(GOLDEN_GAMMA)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seed_is_deterministic() {
        let a = Seed::from_u64(7);
        let b = Seed::from_u64(7);
        assert_eq!(a.next_u64().0, b.next_u64().0);
        assert_eq!(a.split(), b.split());
    }

    #[test]
    fn test_split_streams_differ() {
        let (left, right) = Seed::from_u64(99).split();
        assert_ne!(left.next_u64().0, right.next_u64().0);
    }

    #[test]
    fn test_random_source_follows_seed() {
        let seed = Seed::from_u64(3);
        let mut random = seed.random_source();
        assert_eq!(random.next_u64(), seed.next_u64().0);
        assert_eq!(random.seed(), seed.next_u64().1);
    }

    #[test]
    fn test_random_source_drives_rand() {
        let mut random = Random::new(Seed::from_u64(11));
        for _ in 0..100 {
            let value: i64 = random.gen_range(-5..=5);
            assert!((-5..=5).contains(&value));
        }

        let mut bytes = [0u8; 13];
        random.fill_bytes(&mut bytes);
        assert!(bytes.iter().any(|&b| b != 0));
    }

    #[test]
    fn test_size_for_trial() {
        assert_eq!(Size::for_trial(0, 10, 100), Size(0));
        assert_eq!(Size::for_trial(5, 10, 100), Size(50));
        assert_eq!(Size::for_trial(3, 0, 100), Size(0));
        assert_eq!(Size::new(150).at_most(100), Size(100));
        assert_eq!(Size::new(42).at_most(100), Size(42));
    }

    #[test]
    fn test_config_sizes_reach_the_limit() {
        let config = Config::default().with_size_limit(50);
        assert_eq!(config.size_for_trial(0, 10), Size(0));
        assert_eq!(config.size_for_trial(5, 10), Size(25));
        assert_eq!(config.size_for_trial(9, 10), Size(45));
        assert_eq!(config.size_for_trial(10, 10), Size(50));
        assert_eq!(config.size_for_trial(99, 10), Size(50));
        assert_eq!(Config::default().size_for_trial(199, 200), Size(100));
    }

    #[test]
    fn test_config_builders() {
        let config = Config::default()
            .with_shrinks(5)
            .with_attempts(50)
            .with_size_limit(20);
        assert_eq!(config.shrink_limit, 5);
        assert_eq!(config.attempt_limit, 50);
        assert_eq!(config.size_limit, 20);
    }
}
