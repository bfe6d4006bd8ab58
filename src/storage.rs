//! Collaborator stores: where parameter state and selection history live.
//!
//! The bandit never keeps a working copy of [`ParameterState`]: each operation
//! loads it, computes, and saves it back wholesale.  History entries are keyed
//! by the selection id the bandit issues.
//!
//! The in-memory implementations here are enough for tests and single-process
//! callers; durable backends implement the same traits.

use std::collections::BTreeMap;

use crate::{ParameterState, StorageError};

/// Single-slot store for the bandit's parameter state.
pub trait ModelStorage {
    /// Load the current state.  Fails with [`StorageError::MissingModel`] if
    /// nothing was ever saved.
    fn get_model(&self) -> Result<ParameterState, StorageError>;

    /// Overwrite the stored state.
    fn save_model(&mut self, model: ParameterState) -> Result<(), StorageError>;
}

/// One recorded selection.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HistoryEntry<A> {
    pub id: u64,
    pub context: Vec<f64>,
    pub action: A,
    /// Unset until the selection is rewarded; set exactly once.
    pub reward: Option<f64>,
}

/// Store of selections and their eventual rewards.
pub trait HistoryStorage<A> {
    /// Record a new, unrewarded selection under `id`.
    fn add_history(&mut self, id: u64, context: Vec<f64>, action: A) -> Result<(), StorageError>;

    /// Look up a selection that has not been rewarded yet.
    fn unrewarded(&self, id: u64) -> Option<&HistoryEntry<A>>;

    /// Attach `reward` to selection `id`, finalizing it.
    fn add_reward(&mut self, id: u64, reward: f64) -> Result<(), StorageError>;
}

/// In-memory [`ModelStorage`].
#[derive(Debug, Clone, Default)]
pub struct MemoryModelStorage {
    model: Option<ParameterState>,
}

impl MemoryModelStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store already holding `model`.
    pub fn with_model(model: ParameterState) -> Self {
        Self { model: Some(model) }
    }

    pub fn is_empty(&self) -> bool {
        self.model.is_none()
    }
}

impl ModelStorage for MemoryModelStorage {
    fn get_model(&self) -> Result<ParameterState, StorageError> {
        self.model.clone().ok_or(StorageError::MissingModel)
    }

    fn save_model(&mut self, model: ParameterState) -> Result<(), StorageError> {
        self.model = Some(model);
        Ok(())
    }
}

/// In-memory [`HistoryStorage`] keeping rewarded and unrewarded entries apart.
#[derive(Debug, Clone)]
pub struct MemoryHistoryStorage<A> {
    unrewarded: BTreeMap<u64, HistoryEntry<A>>,
    rewarded: BTreeMap<u64, HistoryEntry<A>>,
}

impl<A> Default for MemoryHistoryStorage<A> {
    fn default() -> Self {
        Self {
            unrewarded: BTreeMap::new(),
            rewarded: BTreeMap::new(),
        }
    }
}

impl<A> MemoryHistoryStorage<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any entry, rewarded or not.
    pub fn get(&self, id: u64) -> Option<&HistoryEntry<A>> {
        self.unrewarded.get(&id).or_else(|| self.rewarded.get(&id))
    }

    pub fn unrewarded_len(&self) -> usize {
        self.unrewarded.len()
    }

    pub fn rewarded_len(&self) -> usize {
        self.rewarded.len()
    }

    /// Rewarded entries in id order.
    pub fn rewarded(&self) -> impl Iterator<Item = &HistoryEntry<A>> {
        self.rewarded.values()
    }
}

impl<A> HistoryStorage<A> for MemoryHistoryStorage<A> {
    fn add_history(&mut self, id: u64, context: Vec<f64>, action: A) -> Result<(), StorageError> {
        if self.unrewarded.contains_key(&id) || self.rewarded.contains_key(&id) {
            return Err(StorageError::DuplicateEntry(id));
        }
        self.unrewarded.insert(
            id,
            HistoryEntry {
                id,
                context,
                action,
                reward: None,
            },
        );
        Ok(())
    }

    fn unrewarded(&self, id: u64) -> Option<&HistoryEntry<A>> {
        self.unrewarded.get(&id)
    }

    fn add_reward(&mut self, id: u64, reward: f64) -> Result<(), StorageError> {
        if self.rewarded.contains_key(&id) {
            return Err(StorageError::AlreadyRewarded(id));
        }
        let mut entry = self
            .unrewarded
            .remove(&id)
            .ok_or(StorageError::UnknownEntry(id))?;
        entry.reward = Some(reward);
        self.rewarded.insert(id, entry);
        Ok(())
    }
}
