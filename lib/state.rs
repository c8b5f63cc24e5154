//! Basis-state preparation and Born-rule sampling of joint measurements.
//!
//! States of several qudits are stored as flat vectors indexed in mixed radix,
//! with the *first* qudit of an ordering as the most significant digit. For
//! qudits *a*, *b* of dimensions *d*<sub>*a*</sub>, *d*<sub>*b*</sub>, the
//! amplitude of ∣*i*, *j*⟩ lives at index *i d*<sub>*b*</sub> + *j*. This
//! matches the index convention of the two-qudit gate matrices in
//! [`gate`][crate::gate].

use itertools::Itertools;
use ndarray as nd;
use num_complex::Complex64 as C64;
use rand::{ Rng, distributions::{ Distribution, WeightedIndex } };
use rustc_hash::FxHashMap as HashMap;
use thiserror::Error;
use crate::{ ErrorKind, qudit::Qudit };

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("invalid dimension {0}: qudits must have at least two levels")]
    InvalidDimension(usize),

    #[error("basis index {1} is out of range for dimension {0}")]
    IndexOutOfBounds(usize, usize),

    #[error("state vector has length {0}, but the qudit ordering requires {1}")]
    SizeMismatch(usize, usize),

    #[error("joint dimension of the qudit ordering overflows")]
    SizeOverflow,

    #[error("cannot sample from an empty qudit ordering")]
    NoQudits,

    #[error("cannot take the tensor product of zero states")]
    EmptyProduct,

    #[error("state vector has zero or non-finite norm")]
    ZeroNorm,
}
pub type StateResult<T> = Result<T, StateError>;
use StateError::*;

impl StateError {
    /// Return the broad category of `self`.
    pub fn kind(&self) -> ErrorKind {
        match self {
            InvalidDimension(_) => ErrorKind::Domain,
            IndexOutOfBounds(..) | SizeMismatch(..) | SizeOverflow
                => ErrorKind::Bounds,
            NoQudits | EmptyProduct => ErrorKind::Validation,
            ZeroNorm => ErrorKind::Numerical,
        }
    }
}

/// Return the computational basis state ∣`index`⟩ of a single qudit.
///
/// ```
/// # use qudit_calc::{ c, state::basis_state };
/// let psi = basis_state(4, 2).unwrap();
/// assert_eq!(psi.to_vec(), vec![c!(0.0), c!(0.0), c!(1.0), c!(0.0)]);
/// assert!(basis_state(4, 5).is_err());
/// ```
pub fn basis_state(dimension: usize, index: usize) -> StateResult<nd::Array1<C64>> {
    if dimension < 2 { return Err(InvalidDimension(dimension)); }
    if index >= dimension { return Err(IndexOutOfBounds(dimension, index)); }
    let mut state: nd::Array1<C64> = nd::Array1::zeros(dimension);
    state[index] = C64::new(1.0, 0.0);
    Ok(state)
}

/// Return the Kronecker product of a list of state vectors, the first being the
/// most significant.
pub fn tensor_product(states: &[nd::Array1<C64>]) -> StateResult<nd::Array1<C64>> {
    let (first, rest) = states.split_first().ok_or(EmptyProduct)?;
    let prod =
        rest.iter()
        .fold(first.clone(), |acc, state| {
            acc.iter()
                .cartesian_product(state.iter())
                .map(|(a, b)| a * b)
                .collect()
        });
    Ok(prod)
}

/// Sample a measurement of every qudit in `order` from `state`.
///
/// `state` must have length equal to the product of the qudits' dimensions.
/// Outcome probabilities are the squared magnitudes of the amplitudes,
/// renormalized by their sum, so `state` need not be exactly normalized. The
/// sampled joint index is decoded back to front: the last qudit of `order`
/// takes the least significant digit.
///
/// Returns each qudit's name mapped to its outcome.
pub fn sample_measurement<R>(
    state: &nd::Array1<C64>,
    order: &[Qudit],
    rng: &mut R,
) -> StateResult<HashMap<String, usize>>
where R: Rng + ?Sized
{
    if order.is_empty() { return Err(NoQudits); }
    let size =
        order.iter()
        .try_fold(1_usize, |acc, q| acc.checked_mul(q.dim()))
        .ok_or(SizeOverflow)?;
    if state.len() != size { return Err(SizeMismatch(state.len(), size)); }

    let norm: f64 = state.iter().map(|a| a.norm_sqr()).sum();
    if !norm.is_finite() || norm <= 0.0 { return Err(ZeroNorm); }
    let probs: Vec<f64> = state.iter().map(|a| a.norm_sqr() / norm).collect();
    let dist = WeightedIndex::new(&probs).map_err(|_| ZeroNorm)?;
    let index = dist.sample(rng);

    let mut rem = index;
    let mut outcomes: HashMap<String, usize> = HashMap::default();
    for q in order.iter().rev() {
        outcomes.insert(q.name().to_string(), rem % q.dim());
        rem /= q.dim();
    }
    tracing::debug!(index, ?outcomes, "sampled measurement");
    Ok(outcomes)
}
