//! Bayesian linear-regression sufficient statistics.
//!
//! ```text
//!   B     = I + sum_i c_i c_i^T      (d x d, SPD)
//!   f     = sum_i r_i c_i            (d)
//!   muhat = B^{-1} f                 (posterior mean)
//! ```
//!
//! `B` only ever grows by rank-1 positive-semidefinite outer products, so it
//! stays symmetric positive-definite.  `muhat` is derived but stored alongside
//! `B` and `f` so a model store holds everything selection needs.

use crate::linalg::{add_outer, dot, identity, spd_solve};
use crate::BanditError;

/// Parameter state `(B, muhat, f)` persisted through a
/// [`ModelStorage`][crate::ModelStorage].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterState {
    /// Dimension `d`.
    pub dim: usize,
    /// Design matrix `B` (d x d, row-major).
    pub b: Vec<f64>,
    /// Posterior mean `muhat = B^{-1} f` (d).
    pub muhat: Vec<f64>,
    /// Reward-weighted context sum `f` (d).
    pub f: Vec<f64>,
}

impl ParameterState {
    /// Fresh state: `B = I`, `muhat = 0`, `f = 0`.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            b: identity(dim),
            muhat: vec![0.0; dim],
            f: vec![0.0; dim],
        }
    }

    /// Entry `B[i][j]`.
    pub fn b_at(&self, i: usize, j: usize) -> f64 {
        self.b[i * self.dim + j]
    }

    /// Posterior-mean score `dot(context, muhat)`.
    pub fn expected_reward(&self, context: &[f64]) -> f64 {
        dot(context, &self.muhat)
    }

    /// Check a state handed back by a store: shape, finiteness, symmetry of `B`.
    pub fn validate(&self, dim: usize) -> Result<(), BanditError> {
        if self.dim != dim {
            return Err(BanditError::DimensionMismatch {
                expected: dim,
                actual: self.dim,
            });
        }
        if self.b.len() != dim * dim || self.muhat.len() != dim || self.f.len() != dim {
            return Err(BanditError::NumericDomain(
                "parameter state has inconsistent shape",
            ));
        }
        let finite = self
            .b
            .iter()
            .chain(&self.muhat)
            .chain(&self.f)
            .all(|v| v.is_finite());
        if !finite {
            return Err(BanditError::NumericDomain(
                "parameter state contains non-finite values",
            ));
        }
        for i in 0..dim {
            for j in (i + 1)..dim {
                let (a, b) = (self.b_at(i, j), self.b_at(j, i));
                if (a - b).abs() > 1e-9 * (1.0 + a.abs().max(b.abs())) {
                    return Err(BanditError::NumericDomain("B is not symmetric"));
                }
            }
        }
        Ok(())
    }

    /// Fold one rewarded observation into the statistics, returning the new state.
    ///
    /// `B' = B + c c^T`, `f' = f + r c`, `muhat' = B'^{-1} f'` (via Cholesky solve).
    /// `self` is left untouched, so a failure here mutates nothing.
    pub fn fold_reward(&self, context: &[f64], reward: f64) -> Result<Self, BanditError> {
        let d = self.dim;
        if context.len() != d {
            return Err(BanditError::DimensionMismatch {
                expected: d,
                actual: context.len(),
            });
        }
        let mut b = self.b.clone();
        add_outer(&mut b, d, context);

        let mut f = self.f.clone();
        for (fi, ci) in f.iter_mut().zip(context) {
            *fi += reward * ci;
        }

        let muhat = spd_solve(&b, d, &f).ok_or(BanditError::SingularMatrix)?;
        Ok(Self {
            dim: d,
            b,
            muhat,
            f,
        })
    }
}
