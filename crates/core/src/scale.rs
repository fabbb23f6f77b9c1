//! Unit scales: conversion between a display unit and the SI magnitude
//!
//! The array engine only consumes the [`Scale`] capability. Unit catalogues
//! live elsewhere and supply their own implementations; the stock scales here
//! cover the common linear and offset-linear cases.
//!
//! # Usage
//! ```
//! use si_array_core::scale::{LinearScale, OffsetLinearScale, Scale};
//!
//! let km = LinearScale::new(1000.0_f64);
//! assert_eq!(km.to_standard_unit(2.5), 2500.0);
//!
//! let celsius = OffsetLinearScale::new(1.0_f64, 273.15);
//! assert!((celsius.to_standard_unit(25.0) - 298.15).abs() < 1e-9);
//! ```

use crate::element::Element;
use serde::{Deserialize, Serialize};

/// Conversion between raw values in some unit and SI magnitudes
///
/// Implementations must be pure: the same input always maps to the same
/// output, independent of call order, so conversions can run in parallel.
pub trait Scale<T: Element>: Sync {
    /// Convert a raw value in this scale's unit to the SI magnitude
    fn to_standard_unit(&self, value: T) -> T;

    /// Convert an SI magnitude back to this scale's unit
    #[allow(clippy::wrong_self_convention)]
    fn from_standard_unit(&self, value: T) -> T;

    /// True if raw values already are SI magnitudes (copy-only fast path)
    fn is_base_si_scale(&self) -> bool;
}

impl<T: Element, S: Scale<T> + ?Sized> Scale<T> for &S {
    #[inline]
    fn to_standard_unit(&self, value: T) -> T {
        (**self).to_standard_unit(value)
    }

    #[inline]
    fn from_standard_unit(&self, value: T) -> T {
        (**self).from_standard_unit(value)
    }

    #[inline]
    fn is_base_si_scale(&self) -> bool {
        (**self).is_base_si_scale()
    }
}

/// The SI base unit itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentityScale;

impl<T: Element> Scale<T> for IdentityScale {
    #[inline]
    fn to_standard_unit(&self, value: T) -> T {
        value
    }

    #[inline]
    fn from_standard_unit(&self, value: T) -> T {
        value
    }

    #[inline]
    fn is_base_si_scale(&self) -> bool {
        true
    }
}

/// `si = raw * factor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale<T> {
    factor: T,
}

impl<T: Element> LinearScale<T> {
    /// Create a linear scale. `factor` is the SI magnitude of one raw unit.
    #[inline]
    #[must_use]
    pub const fn new(factor: T) -> Self {
        Self { factor }
    }

    /// SI magnitude of one raw unit
    #[inline]
    pub fn factor(&self) -> T {
        self.factor
    }
}

impl<T: Element> Scale<T> for LinearScale<T> {
    #[inline]
    fn to_standard_unit(&self, value: T) -> T {
        value * self.factor
    }

    #[inline]
    fn from_standard_unit(&self, value: T) -> T {
        value / self.factor
    }

    #[inline]
    fn is_base_si_scale(&self) -> bool {
        self.factor == T::ONE
    }
}

/// `si = (raw + offset) * factor`
///
/// Covers interval scales such as Celsius (`factor = 1`, `offset = 273.15`)
/// or Fahrenheit (`factor = 5/9`, `offset = 459.67`). A raw zero is not an SI
/// zero on such a scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OffsetLinearScale<T> {
    factor: T,
    offset: T,
}

impl<T: Element> OffsetLinearScale<T> {
    /// Create an offset-linear scale
    #[inline]
    #[must_use]
    pub const fn new(factor: T, offset: T) -> Self {
        Self { factor, offset }
    }
}

impl<T: Element> Scale<T> for OffsetLinearScale<T> {
    #[inline]
    fn to_standard_unit(&self, value: T) -> T {
        (value + self.offset) * self.factor
    }

    #[inline]
    fn from_standard_unit(&self, value: T) -> T {
        value / self.factor - self.offset
    }

    #[inline]
    fn is_base_si_scale(&self) -> bool {
        self.factor == T::ONE && self.offset.is_zero()
    }
}
