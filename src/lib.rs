//! `linthomp`: seedable linear Thompson sampling for contextual bandits.
//!
//! Each round the caller supplies a context vector `c` (dimension `d`) and the
//! bandit picks one action from a fixed, ordered list.  Later the caller
//! reports a scalar reward for that pick, and the bandit folds it into a
//! Bayesian linear-regression posterior over the reward model `r ~ c^T mu`.
//!
//! **Model** (Agrawal & Goyal 2013, "Thompson Sampling for Contextual Bandits
//! with Linear Payoffs", arXiv:1209.3352):
//!
//! ```text
//!   B     = I + sum c c^T
//!   f     = sum r c
//!   muhat = B^{-1} f
//!   v     = R * sqrt(24 / epsilon * d * ln(t / delta))
//!   mu    ~ N(muhat, v^2 B^{-1})
//!   score(action) = c^T mu
//! ```
//!
//! **Pieces:**
//! - [`LinThompsonConfig`] / [`SampleBreadth`]: construction parameters, validated eagerly.
//! - [`ParameterState`]: the sufficient statistics `(B, muhat, f)`.
//! - [`exploration_scale`] and the posterior sampler behind [`LinThompson::select_action`].
//! - [`LinThompson`]: the session that enforces strict select → reward alternation.
//! - [`ModelStorage`] / [`HistoryStorage`]: where state and history live, with
//!   in-memory implementations ([`MemoryModelStorage`], [`MemoryHistoryStorage`]).
//! - [`SharedLinThompson`]: mutex-guarded handle for multi-threaded callers.
//!
//! **Goals:**
//! - **Deterministic by default**: same seed + same call sequence → same choices.
//! - **No silent corruption**: every failure is a typed [`BanditError`] and leaves
//!   the parameter state untouched.
//!
//! **Non-goals:**
//! - No durable storage backends; implement the storage traits for those.
//! - No other bandit algorithms (epsilon-greedy, UCB, ...).
//! - No action-set management beyond reading the list given at construction.
//!
//! ```rust
//! use linthomp::{LinThompson, LinThompsonConfig, SampleBreadth};
//!
//! let cfg = LinThompsonConfig {
//!     dim: 2,
//!     breadth: SampleBreadth::PerAction,
//!     seed: 7,
//!     ..LinThompsonConfig::default()
//! };
//! let mut bandit = LinThompson::in_memory(vec!["small", "big"], cfg).unwrap();
//!
//! for _ in 0..10 {
//!     let (id, action) = bandit.select_action(&[1.0, 0.25]).unwrap();
//!     let reward = if action == "big" { 1.0 } else { 0.0 };
//!     bandit.submit_reward(id, reward).unwrap();
//! }
//! assert_eq!(bandit.round(), 10);
//! ```

#![forbid(unsafe_code)]

mod error;
pub use error::*;

mod config;
pub use config::*;

mod linalg;

mod params;
pub use params::*;

mod selector;
pub use selector::{exploration_scale, Selection};

mod storage;
pub use storage::*;

mod bandit;
pub use bandit::*;

mod shared;
pub use shared::*;
