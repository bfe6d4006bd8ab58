//! Linear Thompson sampling session: the select → reward cycle.
//!
//! A session owns the round counter and the id of the one selection that may
//! still be rewarded.  Selections and rewards alternate one-for-one:
//!
//! ```text
//!   select_action(ctx)      -> (id, action)      t += 1, history gets `id`
//!   submit_reward(id, r)    -> ()                B += c c^T, f += r c, muhat = B^{-1} f
//! ```
//!
//! Issuing a new selection abandons any unrewarded previous one; only the
//! latest id is accepted by `submit_reward`, and only once.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, trace, warn};

use crate::selector::{argmax_first, exploration_scale, sampled_scores};
use crate::{
    BanditError, HistoryStorage, LinThompsonConfig, MemoryHistoryStorage, MemoryModelStorage,
    ModelStorage, ParameterState, Selection, StorageError,
};

/// Seedable linear Thompson-sampling bandit over a fixed, ordered action list.
///
/// # Example
///
/// ```rust
/// use linthomp::{LinThompson, LinThompsonConfig};
///
/// let cfg = LinThompsonConfig { dim: 2, ..LinThompsonConfig::default() };
/// let mut bandit = LinThompson::in_memory(vec!["a", "b"], cfg).unwrap();
///
/// let (id, action) = bandit.select_action(&[1.0, 0.0]).unwrap();
/// assert!(action == "a" || action == "b");
/// bandit.submit_reward(id, 1.0).unwrap();
/// ```
#[derive(Debug)]
pub struct LinThompson<A, M = MemoryModelStorage, H = MemoryHistoryStorage<A>> {
    cfg: LinThompsonConfig,
    actions: Vec<A>,
    model: M,
    history: H,
    rng: StdRng,
    t: u64,
    last_id: Option<u64>,
    pending: Option<u64>,
}

impl<A: Clone> LinThompson<A> {
    /// Session backed by the in-memory stores.
    pub fn in_memory(actions: Vec<A>, cfg: LinThompsonConfig) -> Result<Self, BanditError> {
        Self::new(
            actions,
            MemoryModelStorage::new(),
            MemoryHistoryStorage::new(),
            cfg,
        )
    }
}

impl<A, M, H> LinThompson<A, M, H>
where
    A: Clone,
    M: ModelStorage,
    H: HistoryStorage<A>,
{
    /// Validate `cfg`, then save a fresh parameter state (`B = I`, `muhat = f = 0`).
    ///
    /// Nothing is written to `model` if validation fails.
    pub fn new(
        actions: Vec<A>,
        mut model: M,
        history: H,
        cfg: LinThompsonConfig,
    ) -> Result<Self, BanditError> {
        cfg.validate()?;
        if actions.is_empty() {
            return Err(BanditError::NoActions);
        }
        model.save_model(ParameterState::new(cfg.dim))?;
        Ok(Self::assemble(actions, model, history, cfg, 0, None))
    }

    /// Rebuild a session around a model store that already holds state.
    ///
    /// `round` and `last_id` come from the caller's own bookkeeping.  The last
    /// selection stays rewardable if `history` still has it unrewarded.
    ///
    /// The sampling stream is keyed on `(cfg.seed, round)`, so resuming at a
    /// later round does not replay the draws of the session it continues.
    pub fn resume(
        actions: Vec<A>,
        model: M,
        history: H,
        cfg: LinThompsonConfig,
        round: u64,
        last_id: Option<u64>,
    ) -> Result<Self, BanditError> {
        cfg.validate()?;
        if actions.is_empty() {
            return Err(BanditError::NoActions);
        }
        model.get_model()?.validate(cfg.dim)?;
        let mut s = Self::assemble(actions, model, history, cfg, round, last_id);
        s.pending = last_id.filter(|id| s.history.unrewarded(*id).is_some());
        Ok(s)
    }

    fn assemble(
        actions: Vec<A>,
        model: M,
        history: H,
        cfg: LinThompsonConfig,
        t: u64,
        last_id: Option<u64>,
    ) -> Self {
        Self {
            rng: StdRng::seed_from_u64(stream_seed(cfg.seed, t)),
            cfg,
            actions,
            model,
            history,
            t,
            last_id,
            pending: None,
        }
    }

    pub fn config(&self) -> &LinThompsonConfig {
        &self.cfg
    }

    pub fn actions(&self) -> &[A] {
        &self.actions
    }

    /// Number of selections made so far.
    pub fn round(&self) -> u64 {
        self.t
    }

    /// Id of the selection still awaiting its reward, if any.
    pub fn pending(&self) -> Option<u64> {
        self.pending
    }

    pub fn model_store(&self) -> &M {
        &self.model
    }

    pub fn history_store(&self) -> &H {
        &self.history
    }

    /// Current parameter state, freshly loaded from the model store.
    pub fn parameters(&self) -> Result<ParameterState, BanditError> {
        let state = self.model.get_model()?;
        state.validate(self.cfg.dim)?;
        Ok(state)
    }

    /// Posterior-mean reward `dot(context, muhat)`; no sampling, no state change.
    pub fn expected_reward(&self, context: &[f64]) -> Result<f64, BanditError> {
        self.check_context(context)?;
        Ok(self.parameters()?.expected_reward(context))
    }

    fn check_context(&self, context: &[f64]) -> Result<(), BanditError> {
        if context.len() != self.cfg.dim {
            return Err(BanditError::DimensionMismatch {
                expected: self.cfg.dim,
                actual: context.len(),
            });
        }
        if !context.iter().all(|v| v.is_finite()) {
            return Err(BanditError::InvalidContext("context entries must be finite"));
        }
        Ok(())
    }

    /// Choose an action for `context`, returning `(selection_id, action)`.
    pub fn select_action(&mut self, context: &[f64]) -> Result<(u64, A), BanditError> {
        let sel = self.select_action_explain(context)?;
        Ok((sel.id, sel.action))
    }

    /// Like [`select_action`][Self::select_action], with the round, exploration
    /// scale, and per-action sampled scores attached.
    pub fn select_action_explain(&mut self, context: &[f64]) -> Result<Selection<A>, BanditError> {
        self.check_context(context)?;
        let round = self.t.saturating_add(1);
        let scale = exploration_scale(&self.cfg, round)?;
        let state = self.parameters()?;

        let scores = sampled_scores(
            &state,
            context,
            scale,
            self.cfg.breadth,
            self.actions.len(),
            &mut self.rng,
        )?;
        let idx = argmax_first(&scores);
        trace!(round, ?scores, "sampled action scores");

        let action = self.actions[idx].clone();
        let id = self.last_id.map_or(0, |i| i + 1);
        self.history.add_history(id, context.to_vec(), action.clone())?;

        if let Some(abandoned) = self.pending {
            debug!(abandoned, "previous selection left unrewarded");
        }
        self.t = round;
        self.last_id = Some(id);
        self.pending = Some(id);
        debug!(id, round, action_index = idx, exploration_scale = scale, "selected action");

        Ok(Selection {
            id,
            action,
            round,
            exploration_scale: scale,
            scores,
        })
    }

    /// Fold `reward` for selection `selection_id` into the model.
    ///
    /// `selection_id` must be the most recently issued id and not yet rewarded.
    /// Rewards outside `[0, 1]` are accepted with a warning.
    pub fn submit_reward(&mut self, selection_id: u64, reward: f64) -> Result<(), BanditError> {
        if self.last_id != Some(selection_id) {
            return Err(BanditError::UnknownSelection {
                expected: self.last_id,
                got: selection_id,
            });
        }
        if self.pending != Some(selection_id) {
            return Err(BanditError::AlreadyRewarded(selection_id));
        }
        if !reward.is_finite() {
            return Err(BanditError::InvalidReward(reward));
        }
        if !(0.0..=1.0).contains(&reward) {
            warn!(
                selection_id,
                reward, "reward outside [0, 1]; the regret guarantee assumes bounded rewards"
            );
        }

        let context = self
            .history
            .unrewarded(selection_id)
            .map(|e| e.context.clone())
            .ok_or(StorageError::UnknownEntry(selection_id))?;

        let state = self.parameters()?;
        let next = state.fold_reward(&context, reward)?;
        self.model.save_model(next)?;
        if let Err(err) = self.history.add_reward(selection_id, reward) {
            if let Err(restore) = self.model.save_model(state) {
                // The reward stays folded in; a retry must not apply it again.
                warn!(
                    selection_id,
                    error = %restore,
                    "model rollback failed after history error"
                );
                self.pending = None;
            }
            return Err(err.into());
        }
        self.pending = None;

        debug!(selection_id, reward, "folded reward into model");
        Ok(())
    }
}

/// RNG seed for a session starting after `round` selections; round 0 keeps `seed`.
fn stream_seed(seed: u64, round: u64) -> u64 {
    seed ^ round.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
