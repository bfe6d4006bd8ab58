//! Shared handle for callers on several threads.
//!
//! The select → reward pairing and the load → compute → save cycle on the
//! parameter state both assume one caller at a time.  [`SharedLinThompson`]
//! puts a session behind a mutex so each operation runs to completion before
//! the next starts.  Pairing is still per session: a reward must name the id
//! of the latest selection made through the handle.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{BanditError, HistoryStorage, LinThompson, ModelStorage, ParameterState, Selection};

/// Cloneable, thread-safe handle to a [`LinThompson`] session.
#[derive(Debug)]
pub struct SharedLinThompson<A, M, H> {
    inner: Arc<Mutex<LinThompson<A, M, H>>>,
}

impl<A, M, H> Clone for SharedLinThompson<A, M, H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, M, H> SharedLinThompson<A, M, H>
where
    A: Clone,
    M: ModelStorage,
    H: HistoryStorage<A>,
{
    pub fn new(bandit: LinThompson<A, M, H>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(bandit)),
        }
    }

    pub fn select_action(&self, context: &[f64]) -> Result<(u64, A), BanditError> {
        self.inner.lock().select_action(context)
    }

    pub fn select_action_explain(&self, context: &[f64]) -> Result<Selection<A>, BanditError> {
        self.inner.lock().select_action_explain(context)
    }

    pub fn submit_reward(&self, selection_id: u64, reward: f64) -> Result<(), BanditError> {
        self.inner.lock().submit_reward(selection_id, reward)
    }

    /// Select and immediately reward under one lock acquisition, so no other
    /// caller can slip a selection in between.
    pub fn select_then_reward<F>(
        &self,
        context: &[f64],
        reward_of: F,
    ) -> Result<(u64, A), BanditError>
    where
        F: FnOnce(&A) -> f64,
    {
        let mut guard = self.inner.lock();
        let (id, action) = guard.select_action(context)?;
        guard.submit_reward(id, reward_of(&action))?;
        Ok((id, action))
    }

    pub fn round(&self) -> u64 {
        self.inner.lock().round()
    }

    pub fn parameters(&self) -> Result<ParameterState, BanditError> {
        self.inner.lock().parameters()
    }
}
