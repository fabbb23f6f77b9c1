//! Numeric element types storable in an SI array
//!
//! The engine is generic over [`Element`], implemented for `f64` and `f32`.
//! Every stored value is an SI magnitude; the element type only decides the
//! precision it is held in.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// IEEE-754 floating-point element of an SI array
///
/// Implementations must follow standard floating-point semantics: division by
/// zero yields ±∞ or NaN and is never trapped.
pub trait Element:
    Copy
    + fmt::Debug
    + fmt::Display
    + PartialEq
    + PartialOrd
    + Default
    + Send
    + Sync
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Sum<Self>
    + Serialize
    + DeserializeOwned
    + 'static
{
    /// Additive identity; the implicit value of every unstored sparse position
    const ZERO: Self;

    /// Multiplicative identity
    const ONE: Self;

    /// True for both `+0.0` and `-0.0`
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// True if the value is NaN
    fn is_nan(self) -> bool;

    /// True if the value is neither infinite nor NaN
    fn is_finite(self) -> bool;

    /// Absolute value
    fn abs(self) -> Self;

    /// Smallest integer greater than or equal to the value
    fn ceil(self) -> Self;

    /// Largest integer less than or equal to the value
    fn floor(self) -> Self;

    /// Nearest integer, ties to even
    fn rint(self) -> Self;

    /// Bit pattern used for hashing
    ///
    /// Both zeros map to the same bits, and every NaN maps to one canonical
    /// NaN, so values that compare equal hash equally.
    fn hash_bits(self) -> u64;
}

impl Element for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f64::is_finite(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f64::abs(self)
    }

    #[inline]
    fn ceil(self) -> Self {
        f64::ceil(self)
    }

    #[inline]
    fn floor(self) -> Self {
        f64::floor(self)
    }

    #[inline]
    fn rint(self) -> Self {
        f64::round_ties_even(self)
    }

    #[inline]
    fn hash_bits(self) -> u64 {
        if self == 0.0 {
            0
        } else if f64::is_nan(self) {
            f64::NAN.to_bits()
        } else {
            self.to_bits()
        }
    }
}

impl Element for f32 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    #[inline]
    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    #[inline]
    fn is_finite(self) -> bool {
        f32::is_finite(self)
    }

    #[inline]
    fn abs(self) -> Self {
        f32::abs(self)
    }

    #[inline]
    fn ceil(self) -> Self {
        f32::ceil(self)
    }

    #[inline]
    fn floor(self) -> Self {
        f32::floor(self)
    }

    #[inline]
    fn rint(self) -> Self {
        f32::round_ties_even(self)
    }

    #[inline]
    fn hash_bits(self) -> u64 {
        if self == 0.0 {
            0
        } else if f32::is_nan(self) {
            u64::from(f32::NAN.to_bits())
        } else {
            u64::from(self.to_bits())
        }
    }
}
