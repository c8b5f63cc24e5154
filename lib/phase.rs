//! Numerically exact phases backed by rational numbers.
//!
//! Qudit gates are built almost entirely from powers of the primitive root of
//! unity *ω* = exp(2*πi* / *d*). Holding the exponent of a phase as an exact
//! fraction of a full turn means that identities like *ω*<sup>*d*</sup> = 1
//! hold exactly, and the conversion to floating point happens only once, at the
//! very end, in [`Phase::cis`].
//!
//! All phases and arithmetic operations thereof are automatically performed
//! modulo 2*π*.

use std::f64::consts::TAU;
use num_complex::Complex64 as C64;
use num_rational::Rational64 as R64;
use num_traits::Zero;

// reduce `a` to the half-open unit interval [0, 1)
fn unit_rem(a: R64) -> R64 { a - a.floor() }

// convert a rational number to a floating-point number.
fn r2f(a: R64) -> f64 { *a.numer() as f64 / *a.denom() as f64 }

/// A description of a phase.
///
/// This type holds an inner [`R64`] representing the number *φ* such that the
/// phase represented by a `Phase` as a whole is 2*π* × *φ*. *φ* is kept in the
/// range [0, 1) under all operations.
///
/// ```
/// # use qudit_calc::phase::Phase;
/// assert_eq!( Phase::new(3, 4),      Phase::new(-1, 4) );
/// assert_eq!( Phase::root(3, 5),     Phase::new(3, 5)  );
/// assert_eq!( Phase::root(7, 5),     Phase::root(2, 5) );
/// assert_eq!( Phase::root(1, 3) * 3, Phase::zero()     );
/// ```
#[derive(Copy, Clone, Debug)]
pub struct Phase(pub R64);

impl PartialEq for Phase {
    fn eq(&self, other: &Self) -> bool {
        unit_rem(self.0 - other.0) == R64::zero()
    }
}

impl Eq for Phase { }

impl Phase {
    /// Construct a new `Phase` as `(numer / denom) × 2π`.
    ///
    /// *Panics if `denom` is zero.*
    pub fn new(numer: i64, denom: i64) -> Self {
        Self(unit_rem(R64::new(numer, denom)))
    }

    /// Return the phase of *ω*<sup>`k`</sup>, where *ω* is the primitive
    /// `d`-th root of unity exp(2*πi* / `d`).
    ///
    /// *Panics if `d` is zero.*
    pub fn root(k: i64, d: usize) -> Self { Self::new(k, d as i64) }

    /// Return the `Phase` representation of 0 ≡ 2π mod 2π.
    pub fn zero() -> Self { Self(R64::zero()) }

    /// Convert to a complex number with modulus 1 and argument equal to `self`.
    ///
    /// Multiples of π/2 are mapped to exact values so that permutation and
    /// sign structure in gate matrices carries no rounding noise.
    pub fn cis(self) -> C64 {
        let ph = unit_rem(self.0);
        if ph == R64::zero() {
            C64::new(1.0, 0.0)
        } else if ph == R64::new(1, 4) {
            C64::new(0.0, 1.0)
        } else if ph == R64::new(1, 2) {
            C64::new(-1.0, 0.0)
        } else if ph == R64::new(3, 4) {
            C64::new(0.0, -1.0)
        } else {
            C64::cis(TAU * r2f(ph))
        }
    }
}

impl std::ops::Mul<i64> for Phase {
    type Output = Phase;

    fn mul(self, rhs: i64) -> Self::Output {
        Self(unit_rem(self.0 * rhs))
    }
}
