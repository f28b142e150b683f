//! Fixed-scale decimal values and their generator.

use crate::edge::EdgeCases;
use crate::error::{ArborError, Result};
use crate::gen::Gen;
use crate::numeric::{integral_edge_cases, IntegralRange, RandomDistribution};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// A decimal number `unscaled * 10^-scale`.
///
/// Equality and ordering are numeric: `1.0` and `1.00` are equal.
#[derive(Debug, Clone, Copy)]
pub struct Decimal {
    unscaled: i128,
    scale: u32,
}

/// Rounding applied when a decimal loses digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Floor,
    Ceiling,
    /// Nearest value, ties away from zero.
    HalfUp,
}

impl Decimal {
    pub const fn new(unscaled: i128, scale: u32) -> Self {
        Decimal { unscaled, scale }
    }

    pub const fn zero() -> Self {
        Decimal::new(0, 0)
    }

    pub fn unscaled(&self) -> i128 {
        self.unscaled
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn to_f64(&self) -> f64 {
        self.unscaled as f64 / 10f64.powi(self.scale as i32)
    }

    /// The same number at another scale, or `None` if it does not fit in `i128`.
    pub fn rescale(&self, scale: u32, rounding: Rounding) -> Option<Decimal> {
        let unscaled = match scale.cmp(&self.scale) {
            Ordering::Equal => self.unscaled,
            Ordering::Greater => self
                .unscaled
                .checked_mul(10i128.checked_pow(scale - self.scale)?)?,
            Ordering::Less => divide(self.unscaled, self.scale - scale, rounding),
        };
        Some(Decimal::new(unscaled, scale))
    }
}

/// `value / 10^digits`, rounded.
fn divide(value: i128, digits: u32, rounding: Rounding) -> i128 {
    let Some(divisor) = 10i128.checked_pow(digits) else {
        // The divisor exceeds every representable magnitude.
        return match rounding {
            Rounding::Floor if value < 0 => -1,
            Rounding::Ceiling if value > 0 => 1,
            _ => 0,
        };
    };
    let quotient = value / divisor;
    let remainder = value % divisor;
    if remainder == 0 {
        return quotient;
    }
    match rounding {
        Rounding::Floor if value < 0 => quotient - 1,
        Rounding::Ceiling if value > 0 => quotient + 1,
        Rounding::HalfUp if remainder.unsigned_abs() >= divisor.unsigned_abs() - remainder.unsigned_abs() => {
            quotient + value.signum()
        }
        _ => quotient,
    }
}

impl PartialEq for Decimal {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Decimal {}

impl PartialOrd for Decimal {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Decimal {
    fn cmp(&self, other: &Self) -> Ordering {
        let scale = self.scale.max(other.scale);
        match (
            self.rescale(scale, Rounding::Floor),
            other.rescale(scale, Rounding::Floor),
        ) {
            (Some(left), Some(right)) => left.unscaled.cmp(&right.unscaled),
            // Overflowing at the common scale means the magnitude dominates.
            (None, Some(_)) => 0.cmp(&self.unscaled).reverse(),
            (Some(_), None) => 0.cmp(&other.unscaled),
            (None, None) => {
                let scale = self.scale.min(other.scale);
                let left = self.rescale(scale, Rounding::Floor).map(|d| d.unscaled);
                let right = other.rescale(scale, Rounding::Floor).map(|d| d.unscaled);
                left.cmp(&right).then_with(|| {
                    self.to_f64()
                        .partial_cmp(&other.to_f64())
                        .unwrap_or(Ordering::Equal)
                })
            }
        }
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.unscaled.unsigned_abs().to_string();
        let sign = if self.unscaled < 0 { "-" } else { "" };
        let scale = self.scale as usize;
        if scale == 0 {
            return write!(f, "{sign}{digits}");
        }
        let padded = format!("{digits:0>width$}", width = scale + 1);
        let (integer, fraction) = padded.split_at(padded.len() - scale);
        write!(f, "{sign}{integer}.{fraction}")
    }
}

impl FromStr for Decimal {
    type Err = ArborError;

    fn from_str(text: &str) -> Result<Self> {
        let invalid = || ArborError::invalid(format!("not a decimal number: {text:?}"));
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (integer, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if integer.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        if !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let magnitude: i128 = format!("{integer}{fraction}")
            .parse()
            .map_err(|_| invalid())?;
        let unscaled = if negative { -magnitude } else { magnitude };
        Ok(Decimal::new(unscaled, fraction.len() as u32))
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal::new(i128::from(value), 0)
    }
}

/// A decimal range whose ends may each be open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalRange {
    min: Decimal,
    min_included: bool,
    max: Decimal,
    max_included: bool,
}

impl DecimalRange {
    pub fn new(min: Decimal, min_included: bool, max: Decimal, max_included: bool) -> Result<Self> {
        if min > max {
            return Err(ArborError::invalid(format!(
                "decimal range minimum {min} is greater than maximum {max}"
            )));
        }
        if min == max && !(min_included && max_included) {
            return Err(ArborError::invalid(format!(
                "decimal range around {min} is empty"
            )));
        }
        Ok(DecimalRange {
            min,
            min_included,
            max,
            max_included,
        })
    }

    pub fn closed(min: Decimal, max: Decimal) -> Result<Self> {
        DecimalRange::new(min, true, max, true)
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, value: Decimal) -> bool {
        let above = if self.min_included {
            value >= self.min
        } else {
            value > self.min
        };
        let below = if self.max_included {
            value <= self.max
        } else {
            value < self.max
        };
        above && below
    }

    /// The unscaled integral range of all values at `scale` inside this range.
    pub(crate) fn unscaled(&self, scale: u32) -> Result<IntegralRange<i128>> {
        let overflow = || {
            ArborError::invalid(format!(
                "decimal range {self} does not fit at scale {scale}"
            ))
        };
        let low = self.min.rescale(scale, Rounding::Ceiling).ok_or_else(overflow)?;
        let high = self.max.rescale(scale, Rounding::Floor).ok_or_else(overflow)?;
        let low = if !self.min_included && low == self.min {
            low.unscaled.checked_add(1).ok_or_else(overflow)?
        } else {
            low.unscaled
        };
        let high = if !self.max_included && high == self.max {
            high.unscaled.checked_sub(1).ok_or_else(overflow)?
        } else {
            high.unscaled
        };
        if low > high {
            return Err(ArborError::invalid(format!(
                "no value with scale {scale} in {self}"
            )));
        }
        IntegralRange::new(low, high)
    }
}

impl fmt::Display for DecimalRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let open = if self.min_included { '[' } else { '(' };
        let close = if self.max_included { ']' } else { ')' };
        write!(f, "{open}{}, {}{close}", self.min, self.max)
    }
}

impl Gen<Decimal> {
    /// Decimals of a fixed scale in the range, shrinking towards `shrinking_target`.
    pub fn big_decimals(
        range: DecimalRange,
        scale: u32,
        shrinking_target: Decimal,
        distribution: RandomDistribution,
    ) -> Result<Self> {
        if !range.contains(shrinking_target) {
            return Err(ArborError::invalid(format!(
                "shrinking target {shrinking_target} outside {range}"
            )));
        }
        let unscaled = range.unscaled(scale)?;
        let target = shrinking_target
            .rescale(scale, Rounding::HalfUp)
            .map(|target| target.unscaled.clamp(unscaled.min(), unscaled.max()))
            .ok_or_else(|| ArborError::invalid("shrinking target does not fit at scale"))?;
        let unscaled = unscaled.with_target(target)?;
        Ok(Gen::integral(unscaled, distribution).map(move |value| Decimal::new(value, scale)))
    }

    /// Uniform decimals shrinking towards zero, or the bound nearest zero.
    pub fn decimals(range: DecimalRange, scale: u32) -> Result<Self> {
        let unscaled = range.unscaled(scale)?;
        Ok(Gen::integral(unscaled, RandomDistribution::Uniform)
            .map(move |value| Decimal::new(value, scale)))
    }
}

/// Edge cases of the unscaled range, mapped back to decimals.
pub fn decimal_edge_cases(range: &DecimalRange, scale: u32) -> Result<EdgeCases<Decimal>> {
    let unscaled = range.unscaled(scale)?;
    Ok(integral_edge_cases(&unscaled).map(move |value| Decimal::new(value, scale)))
}
