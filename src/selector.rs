//! Posterior sampling and action scoring.
//!
//! Each round draws `mu ~ N(muhat, v^2 B^{-1})` and scores actions by
//! `dot(context, mu)`.  With `B = L L^T`, solving `L^T x = z` for standard
//! normal `z` gives `Cov(x) = B^{-1}`, so the draw needs one factorisation and
//! one back substitution per sample and no explicit inverse.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::linalg::{cholesky, dot, solve_lower_transpose};
use crate::{BanditError, LinThompsonConfig, ParameterState, SampleBreadth};

/// Audit record for one selection round.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Selection<A> {
    /// Identifier to pass back to `submit_reward`.
    pub id: u64,
    /// Chosen action.
    pub action: A,
    /// Round counter `t` at selection time (1-based).
    pub round: u64,
    /// Exploration scale `v` used for the posterior draw.
    pub exploration_scale: f64,
    /// Sampled score per action, in action-list order.
    pub scores: Vec<f64>,
}

/// Exploration scale `v = R * sqrt(24 / epsilon * d * ln(t / delta))`.
///
/// `round` is the 1-based round counter.  Errors when `ln(t / delta)` is not
/// defined and non-negative.
pub fn exploration_scale(cfg: &LinThompsonConfig, round: u64) -> Result<f64, BanditError> {
    let ratio = round as f64 / cfg.delta;
    if !ratio.is_finite() || ratio < 1.0 {
        return Err(BanditError::NumericDomain(
            "exploration scale needs t / delta >= 1",
        ));
    }
    let v = cfg.r * (24.0 / cfg.epsilon * cfg.dim as f64 * ratio.ln()).sqrt();
    if v.is_finite() {
        Ok(v)
    } else {
        Err(BanditError::NumericDomain("exploration scale is not finite"))
    }
}

/// Draw `k` parameter vectors from `N(muhat, scale^2 B^{-1})`.
pub(crate) fn sample_posterior<R: Rng + ?Sized>(
    state: &ParameterState,
    scale: f64,
    k: usize,
    rng: &mut R,
) -> Result<Vec<Vec<f64>>, BanditError> {
    let d = state.dim;
    let l = cholesky(&state.b, d).ok_or(BanditError::SingularMatrix)?;
    let mut out = Vec::with_capacity(k);
    for _ in 0..k {
        let z: Vec<f64> = (0..d)
            .map(|_| -> f64 { StandardNormal.sample(&mut *rng) })
            .collect();
        let x = solve_lower_transpose(&l, d, &z);
        let mu: Vec<f64> = state
            .muhat
            .iter()
            .zip(&x)
            .map(|(m, xi)| m + scale * xi)
            .collect();
        out.push(mu);
    }
    Ok(out)
}

/// Sampled score for each of `n_actions` actions.
pub(crate) fn sampled_scores<R: Rng + ?Sized>(
    state: &ParameterState,
    context: &[f64],
    scale: f64,
    breadth: SampleBreadth,
    n_actions: usize,
    rng: &mut R,
) -> Result<Vec<f64>, BanditError> {
    match breadth {
        SampleBreadth::PerRound => {
            let mu = sample_posterior(state, scale, 1, rng)?;
            let s = dot(context, &mu[0]);
            Ok(vec![s; n_actions])
        }
        SampleBreadth::PerAction => {
            let mus = sample_posterior(state, scale, n_actions, rng)?;
            Ok(mus.iter().map(|mu| dot(context, mu)).collect())
        }
    }
}

/// Index of the maximum score; ties go to the earliest index.
pub(crate) fn argmax_first(scores: &[f64]) -> usize {
    let mut best = 0;
    let mut best_score = f64::NEG_INFINITY;
    for (i, &s) in scores.iter().enumerate() {
        if s > best_score {
            best = i;
            best_score = s;
        }
    }
    best
}
