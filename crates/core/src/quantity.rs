//! SI-tagged scalar values
//!
//! Ingestion accepts anything that can report its own SI magnitude through
//! [`SiValue`]. [`Quantity`] is the generic scalar used for that: one type for
//! every physical quantity, distinguished by a zero-sized dimension marker
//! rather than by a separate type per quantity.
//!
//! # Usage
//! ```
//! use si_array_core::quantity::{Dimension, Quantity, SiValue};
//! use si_array_core::scale::LinearScale;
//!
//! #[derive(Debug, Clone, Copy, PartialEq)]
//! struct Length;
//! impl Dimension for Length {
//!     const SI_UNIT: &'static str = "m";
//! }
//!
//! let km = LinearScale::new(1000.0_f64);
//! let d: Quantity<f64, Length> = Quantity::new(1.2, &km);
//! assert_eq!(d.si(), 1200.0);
//! assert_eq!(d.in_unit(&km), 1.2);
//! ```

use crate::element::Element;
use crate::scale::Scale;
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Add, Neg, Sub};

/// A value that knows its SI magnitude
pub trait SiValue<T: Element> {
    /// The SI magnitude
    fn si(&self) -> T;
}

impl<T: Element, Q: SiValue<T> + ?Sized> SiValue<T> for &Q {
    #[inline]
    fn si(&self) -> T {
        (**self).si()
    }
}

/// Marker for a physical dimension (length, mass, ...)
pub trait Dimension: Copy + fmt::Debug + Send + Sync + 'static {
    /// Symbol of the SI unit in which magnitudes of this dimension are stored
    const SI_UNIT: &'static str;
}

/// A scalar SI magnitude tagged with its dimension
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Quantity<T, D> {
    si: T,
    dimension: PhantomData<D>,
}

impl<T: Element, D: Dimension> Quantity<T, D> {
    /// Create from a raw value expressed in `scale`'s unit
    #[inline]
    #[must_use]
    pub fn new<S: Scale<T>>(value: T, scale: &S) -> Self {
        Self::from_si(scale.to_standard_unit(value))
    }

    /// Create from an SI magnitude
    #[inline]
    #[must_use]
    pub const fn from_si(si: T) -> Self {
        Self {
            si,
            dimension: PhantomData,
        }
    }

    /// The value expressed in `scale`'s unit
    #[inline]
    pub fn in_unit<S: Scale<T>>(&self, scale: &S) -> T {
        scale.from_standard_unit(self.si)
    }
}

impl<T: Element, D: Dimension> SiValue<T> for Quantity<T, D> {
    #[inline]
    fn si(&self) -> T {
        self.si
    }
}

impl<T: Element, D: Dimension> fmt::Debug for Quantity<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Quantity({:?} {})", self.si, D::SI_UNIT)
    }
}

impl<T: Element, D: Dimension> fmt::Display for Quantity<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.si, D::SI_UNIT)
    }
}

impl<T: Element, D: Dimension> PartialEq for Quantity<T, D> {
    fn eq(&self, other: &Self) -> bool {
        self.si == other.si
    }
}

impl<T: Element, D: Dimension> PartialOrd for Quantity<T, D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.si.partial_cmp(&other.si)
    }
}

impl<T: Element, D: Dimension> Add for Quantity<T, D> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::from_si(self.si + rhs.si)
    }
}

impl<T: Element, D: Dimension> Sub for Quantity<T, D> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::from_si(self.si - rhs.si)
    }
}

impl<T: Element, D: Dimension> Neg for Quantity<T, D> {
    type Output = Self;

    fn neg(self) -> Self {
        Self::from_si(-self.si)
    }
}
