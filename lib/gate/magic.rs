//! The non-Clifford *U*<sub>π/8</sub> ("magic") gate for prime dimensions.
//!
//! The gate is diagonal with entries *ω*<sup>*v*<sub>*k*</sub></sup>, where the
//! residues *v*<sub>*k*</sub> are fixed by the parameters (*γ*, *z*, *ε*):
//!
//! *v*<sub>0</sub> = 0 and
//! *v*<sub>*k*</sub> = 12<sup>–1</sup> *k* (*γ* + *k* (6*z* + (2*k* – 3) *γ*)) + *ε k* (mod *d*)
//!
//! for *d* > 3. For *d* = 3 the residues are fixed to (0, 1, 8), since 12 has
//! no inverse modulo 3.
//!
//! # Further reading
//! - E. T. Campbell, H. Anwar, D. E. Browne, "Magic-state distillation in all
//! prime dimensions using quantum Reed-Muller codes."
//! [arXiv:1205.3104](https://arxiv.org/abs/1205.3104)
//! - M. Howard, J. Vala, "Qudit versions of the qubit π/8 gate."
//! [arXiv:1206.1598](https://arxiv.org/abs/1206.1598)

use crate::{
    arith::{ add_mod, is_prime, mod_inverse, mul_mod, rem_euclid },
    phase::Phase,
};
use super::{ GateError, GateResult };

/// Free parameters of the magic gate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct U8Params {
    pub gamma: i64,
    pub z: i64,
    pub eps: i64,
}

impl Default for U8Params {
    fn default() -> Self { Self { gamma: 2, z: 1, eps: 0 } }
}

impl U8Params {
    pub fn new(gamma: i64, z: i64, eps: i64) -> Self { Self { gamma, z, eps } }
}

/// A validated magic gate on a single qudit of prime dimension.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct U8 {
    d: usize,
    params: U8Params,
    vks: Vec<i64>,
}

impl U8 {
    /// Validate parameters and compute the gate's residues.
    ///
    /// Fails if `d` is not prime, if `gamma` is zero, if 12 has no inverse
    /// modulo `d`, or if the computed residues do not sum to 0 modulo `d`.
    pub fn new(d: usize, params: U8Params) -> GateResult<Self> {
        if d < 2 { return Err(GateError::InvalidDimension(d)); }
        if !is_prime(d) { return Err(GateError::NonPrimeDimension(d)); }
        if params.gamma == 0 { return Err(GateError::ZeroGamma); }
        let vks = residues(d, params)?;
        Ok(Self { d, params, vks })
    }

    /// Return the qudit dimension.
    pub fn dim(&self) -> usize { self.d }

    /// Return the parameters used to construct `self`.
    pub fn params(&self) -> U8Params { self.params }

    /// Return the residues *v*<sub>*k*</sub>.
    ///
    /// For *d* = 3 these are the literal values (0, 1, 8); otherwise each lies
    /// in `0..d`.
    pub fn residues(&self) -> &[i64] { &self.vks }

    /// Return the phase on the `k`-th diagonal entry.
    pub fn phase(&self, k: usize) -> Phase { Phase::root(self.vks[k], self.d) }
}

pub(crate) fn residues(d: usize, params: U8Params) -> GateResult<Vec<i64>> {
    let vks: Vec<i64> =
        if d == 3 {
            vec![0, 1, 8]
        } else {
            let inv12 = mod_inverse(12, d).ok_or(GateError::NoInverse(d))?;
            let gamma = rem_euclid(params.gamma as i128, d);
            let six_z = rem_euclid(6 * params.z as i128, d);
            let eps = rem_euclid(params.eps as i128, d);
            // every intermediate stays reduced modulo d
            (0..d)
                .map(|k| {
                    let two_k_3 = rem_euclid(2 * k as i128 - 3, d);
                    let inner = add_mod(six_z, mul_mod(two_k_3, gamma, d), d);
                    let outer = add_mod(gamma, mul_mod(k, inner, d), d);
                    let v = mul_mod(mul_mod(inv12, k, d), outer, d);
                    add_mod(v, mul_mod(eps, k, d), d) as i64
                })
                .collect()
        };
    tracing::debug!(d, ?vks, "computed U8 residues");
    check_residue_sum(&vks, d)?;
    Ok(vks)
}

pub(crate) fn check_residue_sum(vks: &[i64], d: usize) -> GateResult<()> {
    let sum = rem_euclid(vks.iter().map(|v| *v as i128).sum(), d);
    if sum == 0 { Ok(()) } else { Err(GateError::ResidueSum(d, sum)) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qutrit_residues() {
        let u = U8::new(3, U8Params::default()).unwrap();
        assert_eq!(u.residues(), &[0, 1, 8]);
        let reduced: Vec<usize> =
            u.residues().iter().map(|v| rem_euclid(*v as i128, 3)).collect();
        assert_eq!(reduced, vec![0, 1, 2]);
        // parameters play no role for d = 3
        let v = U8::new(3, U8Params::new(5, -4, 7)).unwrap();
        assert_eq!(v.residues(), u.residues());
    }

    #[test]
    fn residues_d5_d7() {
        let u = U8::new(5, U8Params::default()).unwrap();
        assert_eq!(u.residues(), &[0, 3, 3, 2, 2]);
        let u = U8::new(7, U8Params::default()).unwrap();
        assert_eq!(u.residues(), &[0, 4, 3, 6, 1, 4, 3]);
        let u = U8::new(5, U8Params::new(3, 2, 1)).unwrap();
        assert_eq!(u.residues(), &[0, 2, 0, 2, 1]);
    }

    #[test]
    fn residue_sums_vanish() {
        for d in [5_usize, 7, 11, 13, 17, 19, 23] {
            for gamma in [-3_i64, -1, 1, 2, 5] {
                for z in [-2_i64, 0, 1, 4] {
                    for eps in [0_i64, 1, 3] {
                        let u = U8::new(d, U8Params::new(gamma, z, eps))
                            .unwrap();
                        assert_eq!(u.residues().len(), d);
                        assert!(check_residue_sum(u.residues(), d).is_ok());
                    }
                }
            }
        }
    }

    #[test]
    fn large_parameters() {
        let d = 65537;
        let u = U8::new(d, U8Params::new(i64::MAX, i64::MIN, i64::MAX)).unwrap();
        assert_eq!(u.residues().len(), d);
        assert!(u.residues().iter().all(|v| (0..d as i64).contains(v)));
        assert!(check_residue_sum(u.residues(), d).is_ok());
        // the parameters only matter modulo d
        let gamma = i64::MAX % d as i64;
        let z = (i64::MIN % d as i64) + d as i64;
        let reduced = U8::new(d, U8Params::new(gamma, z, gamma)).unwrap();
        assert_eq!(u.residues(), reduced.residues());
        let u = U8::new(7, U8Params::new(2 + 7 * 1000, 1 - 7 * 3, 7)).unwrap();
        assert_eq!(u.residues(), &[0, 4, 3, 6, 1, 4, 3]);
    }

    #[test]
    fn domain_errors() {
        assert_eq!(
            U8::new(4, U8Params::default()),
            Err(GateError::NonPrimeDimension(4)),
        );
        assert_eq!(
            U8::new(9, U8Params::default()),
            Err(GateError::NonPrimeDimension(9)),
        );
        assert_eq!(
            U8::new(1, U8Params::default()),
            Err(GateError::InvalidDimension(1)),
        );
        assert_eq!(
            U8::new(5, U8Params::new(0, 1, 0)),
            Err(GateError::ZeroGamma),
        );
    }

    #[test]
    fn numerical_errors() {
        assert_eq!(U8::new(2, U8Params::default()), Err(GateError::NoInverse(2)));
        assert_eq!(check_residue_sum(&[0, 1, 1], 3), Err(GateError::ResidueSum(3, 2)));
        assert_eq!(check_residue_sum(&[0, 4, 4, 3, 3], 5), Err(GateError::ResidueSum(5, 4)));
        assert!(check_residue_sum(&[0, 1, 8], 3).is_ok());
    }
}
