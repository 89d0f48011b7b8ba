//! Scalar complex arithmetic.
//!
//! Amplitudes and matrix entries are [`Complex64`] values from `num-complex`,
//! which already provides the arithmetic operators, `conj`, `norm`,
//! `norm_sqr`, `arg` and `from_polar`. This module adds the few pieces the
//! simulator needs on top: named constants and tolerance-based equality.

pub use num_complex::Complex64;

/// Additive identity.
pub const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Multiplicative identity.
pub const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Imaginary unit.
pub const I: Complex64 = Complex64::new(0.0, 1.0);

/// Default tolerance used for amplitude comparisons.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Convenience operations on [`Complex64`].
pub trait ComplexExt {
    /// Equality within `tolerance` on both components.
    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool;

    /// Magnitude `sqrt(re² + im²)`.
    fn magnitude(&self) -> f64;

    /// Phase `atan2(im, re)`.
    fn phase(&self) -> f64;

    /// True if both components are finite.
    fn is_finite_value(&self) -> bool;
}

impl ComplexExt for Complex64 {
    #[inline]
    fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.re - other.re).abs() <= tolerance && (self.im - other.im).abs() <= tolerance
    }

    #[inline]
    fn magnitude(&self) -> f64 {
        self.norm()
    }

    #[inline]
    fn phase(&self) -> f64 {
        self.arg()
    }

    #[inline]
    fn is_finite_value(&self) -> bool {
        self.re.is_finite() && self.im.is_finite()
    }
}
