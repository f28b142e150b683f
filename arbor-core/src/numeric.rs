//! Integral and character generators.
//!
//! Every integral type is generated through one `i128` core: values are drawn
//! from the range by a [`RandomDistribution`] and shrink towards a target by
//! halving the distance. Characters reuse the same core over Unicode ordinals.

use crate::data::*;
use crate::distance::ShrinkingDistance;
use crate::edge::EdgeCases;
use crate::error::{ArborError, Result};
use crate::gen::Gen;
use crate::shrinkable::Shrinkable;
use rand::Rng;
use std::fmt;

/// Primitive integers that fit into `i128`.
pub trait Integral: Value + Copy + Ord + fmt::Debug {
    const MIN: Self;
    const MAX: Self;

    fn to_i128(self) -> i128;

    /// Convert back; only called with values inside `MIN..=MAX`.
    fn from_i128(value: i128) -> Self;
}

macro_rules! integral {
    ($($t:ty),* $(,)?) => {
        $(
            impl Integral for $t {
                const MIN: Self = <$t>::MIN;
                const MAX: Self = <$t>::MAX;

                fn to_i128(self) -> i128 {
                    self as i128
                }

                fn from_i128(value: i128) -> Self {
                    value as $t
                }
            }
        )*
    };
}

integral!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

/// Sampling shape for integral draws.
///
/// The distribution only decides which values are likely; range membership
/// and the shrinking target do not depend on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RandomDistribution {
    /// Every value in the range is equally likely.
    Uniform,
    /// Values close to the shrinking target are more likely.
    Biased,
    /// Bell curve around the centre of the range; the range borders lie
    /// `border_sigmas` standard deviations away from the centre.
    Gaussian { border_sigmas: f64 },
}

const GAUSSIAN_RETRIES: usize = 16;

impl Default for RandomDistribution {
    fn default() -> Self {
        RandomDistribution::Biased
    }
}

impl RandomDistribution {
    pub fn gaussian() -> Self {
        RandomDistribution::Gaussian { border_sigmas: 3.0 }
    }

    pub(crate) fn draw(&self, random: &mut Random, min: i128, max: i128, target: i128) -> i128 {
        if min == max {
            return min;
        }
        match *self {
            RandomDistribution::Uniform => random.gen_range(min..=max),
            RandomDistribution::Biased => {
                let span = max.abs_diff(min);
                let bits = 128 - span.leading_zeros();
                let window = match random.gen_range(0..=bits) {
                    128 => u128::MAX,
                    shift => (1u128 << shift) - 1,
                };
                let low = target
                    .checked_sub_unsigned(window)
                    .unwrap_or(i128::MIN)
                    .max(min);
                let high = target
                    .checked_add_unsigned(window)
                    .unwrap_or(i128::MAX)
                    .min(max);
                random.gen_range(low..=high)
            }
            RandomDistribution::Gaussian { border_sigmas } => {
                if border_sigmas.is_nan() || border_sigmas <= 0.0 {
                    return random.gen_range(min..=max);
                }
                let span = max.abs_diff(min);
                let center = min + (span / 2) as i128;
                let sigma = span as f64 / (2.0 * border_sigmas);
                for _ in 0..GAUSSIAN_RETRIES {
                    let u1: f64 = random.gen();
                    let u2: f64 = random.gen();
                    let z = (-2.0 * (1.0 - u1).ln()).sqrt() * (std::f64::consts::TAU * u2).cos();
                    let candidate = center as f64 + z * sigma;
                    if candidate >= min as f64 && candidate <= max as f64 {
                        return (candidate.round() as i128).clamp(min, max);
                    }
                }
                random.gen_range(min..=max)
            }
        }
    }
}

/// An inclusive integral range with the value shrinking converges to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegralRange<T> {
    min: T,
    max: T,
    target: T,
}

impl<T: Integral> IntegralRange<T> {
    /// Range with the default target: zero if inside, otherwise the bound nearest zero.
    pub fn new(min: T, max: T) -> Result<Self> {
        if min > max {
            return Err(ArborError::invalid(format!(
                "range minimum {min:?} is greater than maximum {max:?}"
            )));
        }
        Ok(IntegralRange {
            min,
            max,
            target: default_shrinking_target(min, max),
        })
    }

    /// Range between two bounds given in either order.
    pub fn spanning(a: T, b: T) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        IntegralRange {
            min,
            max,
            target: default_shrinking_target(min, max),
        }
    }

    /// The full range of the type.
    pub fn full() -> Self {
        IntegralRange {
            min: T::MIN,
            max: T::MAX,
            target: default_shrinking_target(T::MIN, T::MAX),
        }
    }

    pub fn with_target(self, target: T) -> Result<Self> {
        if !self.contains(target) {
            return Err(ArborError::invalid(format!(
                "shrinking target {target:?} outside [{:?}, {:?}]",
                self.min, self.max
            )));
        }
        Ok(IntegralRange { target, ..self })
    }

    /// Get the lower bound.
    pub fn min(&self) -> T {
        self.min
    }

    /// Get the upper bound.
    pub fn max(&self) -> T {
        self.max
    }

    /// Get the value shrinking moves towards.
    pub fn target(&self) -> T {
        self.target
    }

    /// Check whether `value` lies within the bounds.
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }
}

pub fn default_shrinking_target<T: Integral>(min: T, max: T) -> T {
    let (low, high) = (min.to_i128(), max.to_i128());
    if low <= 0 && 0 <= high {
        T::from_i128(0)
    } else if low > 0 {
        min
    } else {
        max
    }
}

impl<T: Integral> Gen<T> {
    /// Integral values from a validated range.
    pub fn integral(range: IntegralRange<T>, distribution: RandomDistribution) -> Self {
        let (min, max, target) = (
            range.min.to_i128(),
            range.max.to_i128(),
            range.target.to_i128(),
        );
        Gen::new(move |_size, seed| {
            let mut random = Random::new(seed);
            let value = distribution.draw(&mut random, min, max, target);
            Ok(integral_shrinkable(value, target).map(T::from_i128))
        })
    }

    /// Uniform integers in `[min, max]` shrinking towards the default target.
    pub fn integers(min: T, max: T) -> Result<Self> {
        Ok(Gen::integral(
            IntegralRange::new(min, max)?,
            RandomDistribution::Uniform,
        ))
    }
}

impl Gen<i128> {
    /// Wide integers with an explicit shrinking target and distribution.
    pub fn big_integers(
        min: i128,
        max: i128,
        shrinking_target: i128,
        distribution: RandomDistribution,
    ) -> Result<Self> {
        let range = IntegralRange::new(min, max)?.with_target(shrinking_target)?;
        Ok(Gen::integral(range, distribution))
    }
}

/// Shrinkable integer: the target first, then halving steps back towards the value.
pub(crate) fn integral_shrinkable(value: i128, target: i128) -> Shrinkable<i128> {
    let distance = u64::try_from(value.abs_diff(target)).unwrap_or(u64::MAX);
    Shrinkable::new(value, ShrinkingDistance::of([distance]), move || {
        Box::new(towards(value, target).map(move |candidate| integral_shrinkable(candidate, target)))
    })
}

fn towards(value: i128, target: i128) -> impl Iterator<Item = i128> {
    let distance = value.abs_diff(target);
    let first = (distance > 0).then_some(target);
    first.into_iter().chain((1..128u32).map_while(move |shift| {
        let step = distance >> shift;
        (step > 0).then(|| {
            if value > target {
                value.checked_sub_unsigned(step)
            } else {
                value.checked_add_unsigned(step)
            }
            .unwrap_or(target)
        })
    }))
}

/// Target, bounds and the neighbours of the target.
pub fn integral_edge_cases<T: Integral>(range: &IntegralRange<T>) -> EdgeCases<T> {
    let (min, max, target) = (
        range.min.to_i128(),
        range.max.to_i128(),
        range.target.to_i128(),
    );
    let mut values = vec![target, min, max];
    if let Some(next) = target.checked_add(1).filter(|&next| next <= max) {
        values.push(next);
    }
    if let Some(previous) = target.checked_sub(1).filter(|&previous| previous >= min) {
        values.push(previous);
    }
    EdgeCases::from_shrinkables(
        values
            .into_iter()
            .map(|value| integral_shrinkable(value, target).map(T::from_i128))
            .collect(),
    )
}

const SURROGATE_START: u32 = 0xD800;
const SURROGATE_COUNT: u32 = 0x800;

/// Gap-free ordinal of a character: surrogate code points are skipped.
pub(crate) fn char_ordinal(c: char) -> u32 {
    let code = c as u32;
    if code >= SURROGATE_START + SURROGATE_COUNT {
        code - SURROGATE_COUNT
    } else {
        code
    }
}

pub(crate) fn ordinal_char(ordinal: u32) -> char {
    let code = if ordinal >= SURROGATE_START {
        ordinal + SURROGATE_COUNT
    } else {
        ordinal
    };
    // Ordinals come from char_ordinal ranges, so the code point is valid.
    char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER)
}

impl Gen<char> {
    /// Characters in `[min, max]`, shrinking towards the character nearest `'\0'`.
    pub fn chars(min: char, max: char) -> Result<Self> {
        if min > max {
            return Err(ArborError::invalid(format!(
                "character range minimum {min:?} is greater than maximum {max:?}"
            )));
        }
        Ok(Gen::<u32>::integers(char_ordinal(min), char_ordinal(max))?.map(ordinal_char))
    }
}
