//! Error taxonomy.
//!
//! Every fallible operation in this crate returns [`BanditError`].  A call that
//! fails never leaves partial state behind: validation runs before the model
//! store is touched, and the model is saved only after the new statistics are
//! fully computed.  If the history store rejects a reward after the model was
//! saved, the previous model is written back; should that write fail too, the
//! selection is retired so the same reward can never be folded twice.

use thiserror::Error;

/// Failures reported by a [`ModelStorage`][crate::ModelStorage] or
/// [`HistoryStorage`][crate::HistoryStorage] implementation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("model store is empty: no parameter state has been saved")]
    MissingModel,

    #[error("history entry {0} already exists")]
    DuplicateEntry(u64),

    #[error("history entry {0} does not exist or was already finalized")]
    UnknownEntry(u64),

    #[error("history entry {0} already carries a reward")]
    AlreadyRewarded(u64),

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Errors surfaced by the bandit.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BanditError {
    /// Construction parameter out of its domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("action set must be non-empty")]
    NoActions,

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid context: {0}")]
    InvalidContext(&'static str),

    /// Reward was NaN or infinite.
    #[error("reward must be a finite real number, got {0}")]
    InvalidReward(f64),

    /// `submit_reward` referenced something other than the outstanding selection.
    #[error("selection id {got} is not the outstanding selection (expected {expected:?})")]
    UnknownSelection { expected: Option<u64>, got: u64 },

    #[error("selection {0} has already been rewarded")]
    AlreadyRewarded(u64),

    /// `B` failed Cholesky factorisation (not positive-definite).
    #[error("design matrix is singular or not positive-definite")]
    SingularMatrix,

    #[error("numeric domain error: {0}")]
    NumericDomain(&'static str),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
