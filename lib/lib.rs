//! This package contains tools for describing quantum circuits on *qudits*,
//! *d*-level generalizations of qubits, and for sampling measurement outcomes
//! from their states.
//!
//! - [`gate`] implements the standard single- and two-qudit gates (shift,
//! clock, Fourier, controlled shift and clock, quadratic phase, and the magic
//! π/8 gate) as exact unitary matrices.
//! - [`circuit`] provides append-only circuits over named qudits, along with a
//! declarative builder that infers qudit dimensions from context.
//! - [`state`] prepares basis states and samples joint measurement outcomes
//! according to the Born rule.
//!
//! Errors from every module can be classified with an [`ErrorKind`].
//!
//! # Further reading
//! - D. Gottesman, "Fault-tolerant quantum computation with higher-dimensional
//! systems." [arXiv:quant-ph/9802007](https://arxiv.org/abs/quant-ph/9802007)
//! - Y. Wang, Z. Hu, B. C. Sanders, S. Kais, "Qudits and high-dimensional
//! quantum computing." [arXiv:2008.00959](https://arxiv.org/abs/2008.00959)

use std::fmt;

pub mod arith;
pub mod phase;
pub mod gate;
pub mod qudit;
pub mod circuit;
pub mod state;

pub extern crate num_complex;
/// Handy macro to create `num_complex::Complex64`s from more natural and
/// succinct syntax.
///
/// ```
/// use std::f64::consts::PI;
/// use num_complex::Complex64;
/// use qudit_calc::c;
///
/// assert_eq!( c!(i (-1.0)),    Complex64::new(0.0, -1.0)      );
/// assert_eq!( c!(e PI),        Complex64::cis(PI)             );
/// assert_eq!( c!(1.0),         Complex64::new(1.0, 0.0)       );
/// assert_eq!( c!(1.0 + i 1.0), Complex64::new(1.0, 1.0)       );
/// assert_eq!( c!(1.0 - 1.0 i), Complex64::new(1.0, -1.0)      );
/// assert_eq!( c!(1.0, e PI),   Complex64::from_polar(1.0, PI) );
/// ```
#[macro_export]
macro_rules! c {
    ( i $im:expr )
        => { $crate::num_complex::Complex64::new(0.0, $im) };
    ( e $ph:expr )
        => { $crate::num_complex::Complex64::cis($ph) };
    ( $re:expr )
        => { $crate::num_complex::Complex64::new($re, 0.0) };
    ( $re:literal + i $im:literal )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - i $im:literal )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $re:literal + $im:literal i )
        => { $crate::num_complex::Complex64::new($re, $im) };
    ( $re:literal - $im:literal i )
        => { $crate::num_complex::Complex64::new($re, -$im) };
    ( $r:expr, e $ph:expr )
        => { $crate::num_complex::Complex64::from_polar($r, $ph) };
    ( $re:expr, $im:expr )
        => { $crate::num_complex::Complex64::new($re, $im) };
}

/// Broad classification of every error produced by this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A malformed argument or an operation that makes no sense structurally.
    Validation,
    /// A qudit used with a dimension other than the one it was defined with.
    DimensionMismatch,
    /// A dimension or parameter outside a gate's domain.
    Domain,
    /// A failed number-theoretic or floating-point precondition.
    Numerical,
    /// An index or length out of range.
    Bounds,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name =
            match self {
                Self::Validation => "validation",
                Self::DimensionMismatch => "dimension mismatch",
                Self::Domain => "domain",
                Self::Numerical => "numerical",
                Self::Bounds => "bounds",
            };
        name.fmt(f)
    }
}
