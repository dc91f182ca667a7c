//! Weight normalization.
//!
//! Turns raw `(item, weight)` options into positive integer weights sorted
//! ascending:
//!
//! 1. Non-positive weights (including `-inf`) are dropped.
//! 2. NaN and `+inf` are rejected.
//! 3. The survivors are stably sorted by weight.
//! 4. Float weights are multiplied by a single `10^p`, where `p` is the
//!    largest fractional digit count in the batch. Scaling the whole batch by
//!    one factor keeps the ratios between weights exact. `p` is capped, and
//!    lowered further if the largest weight would not fit in
//!    [`MAX_WEIGHT`](crate::MAX_WEIGHT) at that precision.

use crate::error::{Error, Result};
use crate::selector::MAX_WEIGHT;
use crate::weight::Weight;

/// Upper limit for the fractional digit cap. `10^18` is the largest power of
/// ten below [`MAX_WEIGHT`](crate::MAX_WEIGHT).
pub const MAX_FRACTIONAL_DIGITS: u32 = 18;

/// Fractional digit cap used unless configured otherwise.
pub const DEFAULT_MAX_FRACTIONAL_DIGITS: u32 = MAX_FRACTIONAL_DIGITS;

/// An item paired with its raw weight.
///
/// A weight of zero or below excludes the item from selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeightedOption<T, W> {
    /// The payload returned when this option is selected.
    pub item: T,
    /// Relative weight.
    pub weight: W,
}

impl<T, W> WeightedOption<T, W> {
    /// Pair an item with a weight.
    pub fn new(item: T, weight: W) -> Self {
        Self { item, weight }
    }
}

impl<T, W> From<(T, W)> for WeightedOption<T, W> {
    fn from((item, weight): (T, W)) -> Self {
        Self { item, weight }
    }
}

/// An item with a positive integer weight, produced by [`normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedOption<T> {
    item: T,
    weight: u128,
}

impl<T> NormalizedOption<T> {
    /// The payload.
    pub fn item(&self) -> &T {
        &self.item
    }

    /// The integer weight, always `>= 1`.
    pub fn weight(&self) -> u128 {
        self.weight
    }

    /// Split into `(item, weight)`.
    pub fn into_parts(self) -> (T, u128) {
        (self.item, self.weight)
    }
}

/// Normalize raw options into positive integer weights, ascending.
///
/// `max_fractional_digits` caps the decimal precision used for float weights
/// and is clamped to [`MAX_FRACTIONAL_DIGITS`]; it has no effect on integer
/// weights. A float that still rounds to zero at the chosen precision is
/// dropped with a warning.
///
/// # Errors
///
/// - [`Error::InvalidWeight`] if any weight is NaN or positive infinity.
/// - [`Error::NoValidOptions`] if no weight is positive (or, for floats, every
///   positive weight rounds to zero at the chosen precision).
pub fn normalize<T, W, I>(options: I, max_fractional_digits: u32) -> Result<Vec<NormalizedOption<T>>>
where
    W: Weight,
    I: IntoIterator<Item = WeightedOption<T, W>>,
{
    let mut kept: Vec<WeightedOption<T, W>> = Vec::new();
    for option in options {
        let weight = option.weight;
        if weight.is_nan() || (weight.is_positive() && !weight.is_finite()) {
            return Err(Error::InvalidWeight {
                weight: weight.to_string(),
            });
        }
        if weight.is_positive() {
            kept.push(option);
        }
    }

    if kept.is_empty() {
        return Err(Error::NoValidOptions);
    }

    // Finite values are totally ordered, so `Equal` is never a NaN stand-in.
    // `sort_by` is stable: equal weights keep their input order.
    kept.sort_by(|a, b| {
        a.weight
            .partial_cmp(&b.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let precision = if W::IS_FLOAT {
        float_precision(&kept, max_fractional_digits)
    } else {
        0
    };

    let mut normalized = Vec::with_capacity(kept.len());
    for option in kept {
        let weight = option.weight.scale(precision);
        if weight == 0 {
            tracing::warn!(
                weight = %option.weight,
                precision,
                "weight rounds to zero at this precision; option dropped"
            );
            continue;
        }
        normalized.push(NormalizedOption {
            item: option.item,
            weight,
        });
    }

    if normalized.is_empty() {
        return Err(Error::NoValidOptions);
    }
    Ok(normalized)
}

/// Shared decimal precision for a sorted, non-empty batch of float weights.
fn float_precision<T, W: Weight>(sorted: &[WeightedOption<T, W>], max_fractional_digits: u32) -> u32 {
    let cap = max_fractional_digits.min(MAX_FRACTIONAL_DIGITS);
    let wanted = sorted
        .iter()
        .map(|o| o.weight.fractional_digits())
        .max()
        .unwrap_or(0)
        .min(cap);

    // The largest weight is last; at precision 0 an oversized weight is left
    // for the overflow check.
    let mut precision = wanted;
    if let Some(largest) = sorted.last() {
        while precision > 0 && largest.weight.scale(precision) > u128::from(MAX_WEIGHT) {
            precision -= 1;
        }
    }
    tracing::trace!(precision, wanted, cap, "scaling float weights");
    precision
}
