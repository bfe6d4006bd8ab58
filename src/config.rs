//! Construction parameters for linear Thompson sampling.

use crate::BanditError;

/// How many posterior draws a selection round uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SampleBreadth {
    /// One posterior sample per round, scored against every action.
    ///
    /// Because the context is shared across actions, every action receives the
    /// same score and the first action in the list wins the tie.
    #[default]
    PerRound,
    /// One independent posterior sample per candidate action.
    PerAction,
}

/// Configuration for [`LinThompson`][crate::LinThompson].
///
/// The exploration scale follows Agrawal & Goyal (2013):
/// `v = R * sqrt(24 / epsilon * d * ln(t / delta))`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinThompsonConfig {
    /// Context / parameter dimension (must be >= 1).
    pub dim: usize,
    /// Confidence parameter, in `(0, 1]`.
    pub delta: f64,
    /// Sub-Gaussian reward scale, `> 0`.
    pub r: f64,
    /// Exploration-schedule parameter, in `(0, 1)`.
    pub epsilon: f64,
    /// Seed for the posterior-sampling RNG.
    pub seed: u64,
    /// Posterior draws per round.
    pub breadth: SampleBreadth,
}

impl Default for LinThompsonConfig {
    fn default() -> Self {
        Self {
            dim: 6,
            delta: 0.5,
            r: 0.5,
            epsilon: 0.1,
            seed: 0,
            breadth: SampleBreadth::PerRound,
        }
    }
}

impl LinThompsonConfig {
    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<(), BanditError> {
        if self.dim == 0 {
            return Err(BanditError::InvalidConfig("dim must be >= 1"));
        }
        if !self.delta.is_finite() || self.delta <= 0.0 || self.delta > 1.0 {
            return Err(BanditError::InvalidConfig("delta should be in (0, 1]"));
        }
        if !self.r.is_finite() || self.r <= 0.0 {
            return Err(BanditError::InvalidConfig("R should be positive"));
        }
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 || self.epsilon >= 1.0 {
            return Err(BanditError::InvalidConfig("epsilon should be in (0, 1)"));
        }
        Ok(())
    }
}
