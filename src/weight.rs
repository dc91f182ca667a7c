//! Numeric weight types.
//!
//! [`Weight`] is implemented for every primitive integer and both float
//! widths, so one code path accepts `u8` loot tables and `f64` drop rates
//! alike. Integer weights are used as-is. Float weights go through exact
//! decimal scaling: a weight is read back through its shortest round-trip
//! decimal representation (`0.1f32` is `"0.1"`, not `0.100000001490116...`),
//! and the scaled integer is assembled from those digits rather than by
//! multiplying in binary floating point.

use std::fmt;

mod private {
    pub trait Sealed {}
}

/// A numeric type usable as an option weight.
///
/// This trait is sealed; it is implemented for `i8..=i128`, `isize`,
/// `u8..=u128`, `usize`, `f32` and `f64`.
pub trait Weight: Copy + PartialOrd + fmt::Debug + fmt::Display + private::Sealed {
    /// `true` for `f32`/`f64`; selects decimal scaling during normalization.
    const IS_FLOAT: bool;

    /// Whether the weight takes part in selection at all.
    fn is_positive(self) -> bool;

    /// Positive infinity is not a valid weight.
    fn is_finite(self) -> bool;

    /// NaN is never a valid weight, whatever its sign bit.
    fn is_nan(self) -> bool;

    /// Digits after the decimal point in the shortest decimal form of the
    /// weight. Integral values (and every integer type) report 0.
    fn fractional_digits(self) -> u32;

    /// `round(self * 10^digits)`, saturating at `u128::MAX`.
    ///
    /// Integers are exact at `digits == 0`. Non-positive weights scale to 0.
    fn scale(self, digits: u32) -> u128;
}

macro_rules! impl_unsigned {
    ($($t:ty),* $(,)?) => {$(
        impl private::Sealed for $t {}

        impl Weight for $t {
            const IS_FLOAT: bool = false;

            #[inline]
            fn is_positive(self) -> bool {
                self != 0
            }

            #[inline]
            fn is_finite(self) -> bool {
                true
            }

            #[inline]
            fn is_nan(self) -> bool {
                false
            }

            #[inline]
            fn fractional_digits(self) -> u32 {
                0
            }

            fn scale(self, digits: u32) -> u128 {
                scale_integer(self as u128, digits)
            }
        }
    )*};
}

macro_rules! impl_signed {
    ($($t:ty),* $(,)?) => {$(
        impl private::Sealed for $t {}

        impl Weight for $t {
            const IS_FLOAT: bool = false;

            #[inline]
            fn is_positive(self) -> bool {
                self > 0
            }

            #[inline]
            fn is_finite(self) -> bool {
                true
            }

            #[inline]
            fn is_nan(self) -> bool {
                false
            }

            #[inline]
            fn fractional_digits(self) -> u32 {
                0
            }

            fn scale(self, digits: u32) -> u128 {
                scale_integer(u128::try_from(self).unwrap_or(0), digits)
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),* $(,)?) => {$(
        impl private::Sealed for $t {}

        impl Weight for $t {
            const IS_FLOAT: bool = true;

            #[inline]
            fn is_positive(self) -> bool {
                self > 0.0
            }

            #[inline]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }

            fn fractional_digits(self) -> u32 {
                if !<$t>::is_finite(self) || self.fract() == 0.0 {
                    return 0;
                }
                count_fractional_digits(&self.abs().to_string())
            }

            fn scale(self, digits: u32) -> u128 {
                if !<$t>::is_finite(self) || self <= 0.0 {
                    return 0;
                }
                scale_decimal(&self.to_string(), digits)
            }
        }
    )*};
}

impl_unsigned!(u8, u16, u32, u64, u128, usize);
impl_signed!(i8, i16, i32, i64, i128, isize);
impl_float!(f32, f64);

fn scale_integer(value: u128, digits: u32) -> u128 {
    (0..digits).fold(value, |acc, _| acc.saturating_mul(10))
}

/// Fractional digit count of a plain (non-exponent) decimal string.
fn count_fractional_digits(repr: &str) -> u32 {
    repr.split_once('.')
        .map_or(0, |(_, frac)| u32::try_from(frac.len()).unwrap_or(u32::MAX))
}

/// Scale a positive decimal string by `10^digits`, rounding half up on the
/// first dropped digit.
///
/// `Display` for floats never uses exponent notation, so the input is always
/// `int[.frac]`.
fn scale_decimal(repr: &str, digits: u32) -> u128 {
    let (int_part, frac_part) = repr.split_once('.').unwrap_or((repr, ""));
    let digits = digits as usize;
    let (kept, dropped) = frac_part.split_at(frac_part.len().min(digits));

    let mut value = int_part
        .bytes()
        .chain(kept.bytes())
        .filter(u8::is_ascii_digit)
        .fold(0u128, |acc, b| {
            acc.saturating_mul(10).saturating_add(u128::from(b - b'0'))
        });
    for _ in kept.len()..digits {
        value = value.saturating_mul(10);
    }
    if dropped.as_bytes().first().is_some_and(|&b| b >= b'5') {
        value = value.saturating_add(1);
    }
    value
}
