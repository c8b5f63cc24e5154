//! Unitary operators on qudits of arbitrary dimension.
//!
//! Every [`Gate`] knows its *shape* (the dimension of each qudit it acts on,
//! in order), its unitary matrix, and a short label for each wire. All
//! matrices are written in the computational basis, with multi-qudit states
//! ∣*a*, *b*⟩ indexed as *a d* + *b*.
//!
//! Throughout, *ω* = exp(2*πi* / *d*).

use std::fmt;
use ndarray as nd;
use num_complex::Complex64 as C64;
use thiserror::Error;
use crate::{
    ErrorKind,
    arith::{ is_prime, rem_euclid },
    phase::Phase,
};

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GateError {
    #[error("invalid dimension {0}: qudits must have at least two levels")]
    InvalidDimension(usize),

    #[error("phase gate is defined only for odd prime dimensions, got {0}")]
    PhaseDimension(usize),

    #[error("U8 gate requires a prime dimension, got {0}")]
    NonPrimeDimension(usize),

    #[error("U8 gate requires a non-zero gamma")]
    ZeroGamma,

    #[error("inverse of 12 mod {0} does not exist")]
    NoInverse(usize),

    #[error("sum of U8 residues is not 0 mod {0}: got {1}")]
    ResidueSum(usize, usize),
}
pub type GateResult<T> = Result<T, GateError>;
use GateError::*;

impl GateError {
    /// Return the broad category of `self`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvalidDimension(_)
            | PhaseDimension(_)
            | NonPrimeDimension(_)
            | ZeroGamma => ErrorKind::Domain,
            NoInverse(_) | ResidueSum(..) => ErrorKind::Numerical,
        }
    }
}

/// Tolerance for approximate comparisons of gate matrix entries.
pub const EPSILON: f64 = 1e-12;

pub(crate) mod magic;
pub use magic::{ U8, U8Params };

/// The kinds of gates understood by this crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// Cyclic shift (generalized Pauli-X).
    X,
    /// Clock (generalized Pauli-Z).
    Z,
    /// Discrete Fourier transform (generalized Hadamard).
    H,
    /// Controlled shift.
    CNOT,
    /// Controlled clock.
    CZ,
    /// Quadratic phase gate.
    P,
    /// Magic π/8 gate.
    U8,
    /// Computational-basis measurement.
    Measure,
}

impl GateKind {
    /// Return the number of qudits a gate of this kind acts on.
    pub fn arity(&self) -> usize {
        match self {
            Self::CNOT | Self::CZ => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name =
            match self {
                Self::X => "X",
                Self::Z => "Z",
                Self::H => "H",
                Self::CNOT => "CNOT",
                Self::CZ => "CZ",
                Self::P => "P",
                Self::U8 => "U8",
                Self::Measure => "Measure",
            };
        name.fmt(f)
    }
}

/// A gate kind together with any kind-specific parameters, but no dimension.
///
/// This is what a circuit description names; the dimension is supplied later,
/// by context, through [`GateSpec::instantiate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GateSpec {
    /// Cyclic shift raised to the given exponent.
    X(i64),
    /// Clock raised to the given exponent.
    Z(i64),
    H,
    CNOT,
    CZ,
    P,
    U8(U8Params),
    Measure,
}

impl From<GateKind> for GateSpec {
    fn from(kind: GateKind) -> Self {
        match kind {
            GateKind::X => Self::X(1),
            GateKind::Z => Self::Z(1),
            GateKind::H => Self::H,
            GateKind::CNOT => Self::CNOT,
            GateKind::CZ => Self::CZ,
            GateKind::P => Self::P,
            GateKind::U8 => Self::U8(U8Params::default()),
            GateKind::Measure => Self::Measure,
        }
    }
}

impl GateSpec {
    /// Return the kind of gate described.
    pub fn kind(&self) -> GateKind {
        match self {
            Self::X(_) => GateKind::X,
            Self::Z(_) => GateKind::Z,
            Self::H => GateKind::H,
            Self::CNOT => GateKind::CNOT,
            Self::CZ => GateKind::CZ,
            Self::P => GateKind::P,
            Self::U8(_) => GateKind::U8,
            Self::Measure => GateKind::Measure,
        }
    }

    /// Construct the described gate for qudits of dimension `d`.
    ///
    /// Measurements created this way carry the key `"m"`.
    pub fn instantiate(&self, d: usize) -> GateResult<Gate> {
        match *self {
            Self::X(exponent) => Gate::x(d, exponent),
            Self::Z(exponent) => Gate::z(d, exponent),
            Self::H => Gate::h(d),
            Self::CNOT => Gate::cnot(d),
            Self::CZ => Gate::cz(d),
            Self::P => Gate::phase(d),
            Self::U8(params) => Gate::u8(d, params),
            Self::Measure => Gate::measure(d, "m"),
        }
    }
}

/// A gate on one or two qudits of a common dimension `d`.
///
/// Gates can only be created through the associated constructors, which check
/// dimension preconditions and normalize parameters. Variant fields may be
/// read by matching, but not used to build a gate directly:
///
/// ```compile_fail
/// use qudit_calc::gate::Gate;
///
/// let p = Gate::P { d: 4 };
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gate {
    /// Cyclic shift ∣*i*⟩ → ∣*i* + `exponent` mod *d*⟩.
    #[non_exhaustive]
    X { d: usize, exponent: usize },
    /// Clock ∣*i*⟩ → *ω*<sup>*i* `exponent`</sup>∣*i*⟩.
    #[non_exhaustive]
    Z { d: usize, exponent: usize },
    /// Fourier transform with entries *ω*<sup>*ij*</sup> / √*d*.
    #[non_exhaustive]
    H { d: usize },
    /// Controlled shift ∣*a*, *b*⟩ → ∣*a*, *a* + *b* mod *d*⟩.
    #[non_exhaustive]
    CNOT { d: usize },
    /// Controlled clock ∣*a*, *b*⟩ → *ω*<sup>*ab*</sup>∣*a*, *b*⟩.
    #[non_exhaustive]
    CZ { d: usize },
    /// Quadratic phase ∣*s*⟩ → *ω*<sup>*s*(*s* – 1)/2</sup>∣*s*⟩.
    #[non_exhaustive]
    P { d: usize },
    /// Magic π/8 gate.
    U8(U8),
    /// Measurement in the computational basis, tagged with a sampling key.
    #[non_exhaustive]
    Measure { d: usize, key: String },
}

fn check_dim(d: usize) -> GateResult<()> {
    if d < 2 { Err(InvalidDimension(d)) } else { Ok(()) }
}

fn diagonal<F>(n: usize, phase: F) -> nd::Array2<C64>
where F: Fn(usize) -> Phase
{
    let diag: nd::Array1<C64> = (0..n).map(|k| phase(k).cis()).collect();
    nd::Array2::from_diag(&diag)
}

fn permutation<F>(n: usize, image: F) -> nd::Array2<C64>
where F: Fn(usize) -> usize
{
    nd::Array2::from_shape_fn(
        (n, n),
        |(r, c)| if r == image(c) { C64::new(1.0, 0.0) } else { C64::new(0.0, 0.0) },
    )
}

impl Gate {
    /// Create a cyclic shift by `exponent` (reduced modulo `d`).
    pub fn x(d: usize, exponent: i64) -> GateResult<Self> {
        check_dim(d)?;
        Ok(Self::X { d, exponent: rem_euclid(exponent as i128, d) })
    }

    /// Create a clock gate raised to `exponent` (reduced modulo `d`).
    pub fn z(d: usize, exponent: i64) -> GateResult<Self> {
        check_dim(d)?;
        Ok(Self::Z { d, exponent: rem_euclid(exponent as i128, d) })
    }

    /// Create a Fourier gate.
    pub fn h(d: usize) -> GateResult<Self> {
        check_dim(d)?;
        Ok(Self::H { d })
    }

    /// Create a controlled shift; the first qudit is the control.
    pub fn cnot(d: usize) -> GateResult<Self> {
        check_dim(d)?;
        Ok(Self::CNOT { d })
    }

    /// Create a controlled clock.
    pub fn cz(d: usize) -> GateResult<Self> {
        check_dim(d)?;
        Ok(Self::CZ { d })
    }

    /// Create a quadratic phase gate.
    ///
    /// Fails unless `d` is an odd prime.
    pub fn phase(d: usize) -> GateResult<Self> {
        check_dim(d)?;
        if d == 2 || !is_prime(d) { return Err(PhaseDimension(d)); }
        Ok(Self::P { d })
    }

    /// Create a magic π/8 gate.
    ///
    /// See [`U8::new`] for failure conditions.
    pub fn u8(d: usize, params: U8Params) -> GateResult<Self> {
        U8::new(d, params).map(Self::U8)
    }

    /// Create a measurement with sampling key `key`.
    pub fn measure<S>(d: usize, key: S) -> GateResult<Self>
    where S: Into<String>
    {
        check_dim(d)?;
        Ok(Self::Measure { d, key: key.into() })
    }

    /// Return the kind of `self`.
    pub fn kind(&self) -> GateKind {
        match self {
            Self::X { .. } => GateKind::X,
            Self::Z { .. } => GateKind::Z,
            Self::H { .. } => GateKind::H,
            Self::CNOT { .. } => GateKind::CNOT,
            Self::CZ { .. } => GateKind::CZ,
            Self::P { .. } => GateKind::P,
            Self::U8(_) => GateKind::U8,
            Self::Measure { .. } => GateKind::Measure,
        }
    }

    /// Return the dimension of each qudit acted on.
    pub fn dim(&self) -> usize {
        match self {
            Self::X { d, .. }
            | Self::Z { d, .. }
            | Self::H { d }
            | Self::CNOT { d }
            | Self::CZ { d }
            | Self::P { d }
            | Self::Measure { d, .. }
            => *d,
            Self::U8(u) => u.dim(),
        }
    }

    /// Return the number of qudits acted on.
    pub fn arity(&self) -> usize { self.kind().arity() }

    /// Return the dimensions of the qudits acted on, in order.
    pub fn shape(&self) -> Vec<usize> { vec![self.dim(); self.arity()] }

    /// Return `true` if `self` is `Measure`.
    pub fn is_measure(&self) -> bool { matches!(self, Self::Measure { .. }) }

    /// Return the sampling key if `self` is a measurement.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Measure { key, .. } => Some(key.as_str()),
            _ => None,
        }
    }

    /// Return the unitary matrix of `self`, or `None` for measurements.
    pub fn unitary(&self) -> Option<nd::Array2<C64>> {
        let mat =
            match self {
                Self::X { d, exponent } => {
                    let (d, e) = (*d, *exponent);
                    permutation(d, |i| (i + e) % d)
                },
                Self::Z { d, exponent } => {
                    let (d, e) = (*d, *exponent);
                    let w = Phase::root(1, d);
                    diagonal(d, |i| w * ((i * e) % d) as i64)
                },
                Self::H { d } => {
                    let d = *d;
                    let w = Phase::root(1, d);
                    let norm = (d as f64).sqrt().recip();
                    nd::Array2::from_shape_fn(
                        (d, d),
                        |(i, j)| (w * ((i * j) % d) as i64).cis() * norm,
                    )
                },
                Self::CNOT { d } => {
                    let d = *d;
                    permutation(d * d, |ab| {
                        let (a, b) = (ab / d, ab % d);
                        a * d + (a + b) % d
                    })
                },
                Self::CZ { d } => {
                    let d = *d;
                    let w = Phase::root(1, d);
                    diagonal(d * d, |ab| {
                        let (a, b) = (ab / d, ab % d);
                        w * ((a * b) % d) as i64
                    })
                },
                Self::P { d } => {
                    let d = *d;
                    let w = Phase::root(1, d);
                    diagonal(d, |s| w * ((s * s.saturating_sub(1) / 2) % d) as i64)
                },
                Self::U8(u) => diagonal(u.dim(), |k| u.phase(k)),
                Self::Measure { .. } => { return None; },
            };
        Some(mat)
    }

    /// Return the conjugate transpose of [`unitary`][Self::unitary].
    pub fn adjoint(&self) -> Option<nd::Array2<C64>> {
        self.unitary().map(|u| u.t().mapv(|z| z.conj()))
    }

    /// Raise `self` to an integer power.
    ///
    /// Only shifts and clocks are closed under powers; returns `None` for all
    /// other kinds.
    pub fn pow(&self, p: i64) -> Option<Self> {
        match *self {
            Self::X { d, exponent } => {
                let e = rem_euclid(exponent as i128 * p as i128, d);
                Some(Self::X { d, exponent: e })
            },
            Self::Z { d, exponent } => {
                let e = rem_euclid(exponent as i128 * p as i128, d);
                Some(Self::Z { d, exponent: e })
            },
            _ => None,
        }
    }

    /// Return the inverse of `self` if it is a shift or a clock.
    pub fn inverse(&self) -> Option<Self> { self.pow(-1) }

    /// Return one diagram label per wire.
    pub fn wire_labels(&self) -> Vec<String> {
        let d = self.dim();
        match self {
            Self::X { exponent, .. } => vec![format!("X^{}(d={})", exponent, d)],
            Self::Z { exponent, .. } => vec![format!("Z^{}(d={})", exponent, d)],
            Self::H { .. } => vec![format!("H(d={})", d)],
            Self::CNOT { .. } =>
                vec![format!("C(d={})", d), format!("X(d={})", d)],
            Self::CZ { .. } =>
                vec![format!("C(d={})", d), format!("Z(d={})", d)],
            Self::P { .. } => vec![format!("P(d={})", d)],
            Self::U8(_) => vec![format!("U8(d={})", d)],
            Self::Measure { key, .. } => vec![format!("M({})", key)],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels = self.wire_labels();
        if labels.len() == 1 {
            labels[0].fmt(f)
        } else {
            write!(f, "({})", labels.join(", "))
        }
    }
}

/// Return the largest entry-wise deviation of `u u†` from the identity.
///
/// Returns `f64::INFINITY` if `u` is not square.
pub fn unitarity_error(u: &nd::Array2<C64>) -> f64 {
    if u.nrows() != u.ncols() { return f64::INFINITY; }
    let prod = u.dot(&u.t().mapv(|z| z.conj()));
    prod.indexed_iter()
        .map(|((i, j), z)| {
            let target = if i == j { C64::new(1.0, 0.0) } else { C64::new(0.0, 0.0) };
            (z - target).norm()
        })
        .fold(0.0, f64::max)
}
