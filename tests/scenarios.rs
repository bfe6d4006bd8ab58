use linthomp::{
    BanditError, LinThompson, LinThompsonConfig, MemoryHistoryStorage, MemoryModelStorage,
    ModelStorage, ParameterState, StorageError,
};
use std::cell::Cell;
use std::rc::Rc;

fn cfg2() -> LinThompsonConfig {
    LinThompsonConfig {
        dim: 2,
        delta: 0.5,
        r: 0.5,
        epsilon: 0.1,
        ..LinThompsonConfig::default()
    }
}

/// Model store that counts saves, shared with the test through an `Rc`.
#[derive(Debug, Default)]
struct CountingModel {
    inner: MemoryModelStorage,
    saves: Rc<Cell<usize>>,
}

impl ModelStorage for CountingModel {
    fn get_model(&self) -> Result<ParameterState, StorageError> {
        self.inner.get_model()
    }

    fn save_model(&mut self, model: ParameterState) -> Result<(), StorageError> {
        self.saves.set(self.saves.get() + 1);
        self.inner.save_model(model)
    }
}

#[test]
fn first_round_select_then_reward() {
    let mut b = LinThompson::in_memory(vec!["A", "B"], cfg2()).unwrap();

    let (id, action) = b.select_action(&[1.0, 0.0]).unwrap();
    assert_eq!(id, 0);
    assert!(action == "A" || action == "B");

    b.submit_reward(0, 1.0).unwrap();
    let p = b.parameters().unwrap();
    assert_eq!(p.b, vec![2.0, 0.0, 0.0, 1.0]);
    assert_eq!(p.f, vec![1.0, 0.0]);
    assert!((p.muhat[0] - 0.5).abs() < 1e-12);
    assert!(p.muhat[1].abs() < 1e-12);
}

#[test]
fn second_reward_for_same_id_fails() {
    let mut b = LinThompson::in_memory(vec!["A", "B"], cfg2()).unwrap();
    let (id, _) = b.select_action(&[1.0, 0.0]).unwrap();
    b.submit_reward(id, 1.0).unwrap();
    let after_first = b.parameters().unwrap();

    assert_eq!(b.submit_reward(id, 1.0), Err(BanditError::AlreadyRewarded(id)));
    assert_eq!(b.parameters().unwrap(), after_first);

    // Once a newer selection exists the old id is simply unknown.
    let (next, _) = b.select_action(&[0.0, 1.0]).unwrap();
    assert_eq!(
        b.submit_reward(id, 1.0),
        Err(BanditError::UnknownSelection {
            expected: Some(next),
            got: id
        })
    );
    assert_eq!(b.parameters().unwrap(), after_first);
}

#[test]
fn out_of_range_epsilon_fails_before_any_state_is_saved() {
    let saves = Rc::new(Cell::new(0));
    let model = CountingModel {
        inner: MemoryModelStorage::new(),
        saves: Rc::clone(&saves),
    };
    let cfg = LinThompsonConfig {
        epsilon: 1.5,
        ..cfg2()
    };
    let err = LinThompson::new(vec!["A", "B"], model, MemoryHistoryStorage::new(), cfg)
        .unwrap_err();
    assert!(matches!(err, BanditError::InvalidConfig(_)), "{err:?}");
    assert_eq!(saves.get(), 0);
}

#[test]
fn valid_construction_saves_exactly_once() {
    let saves = Rc::new(Cell::new(0));
    let model = CountingModel {
        inner: MemoryModelStorage::new(),
        saves: Rc::clone(&saves),
    };
    let mut b =
        LinThompson::new(vec![1u8, 2], model, MemoryHistoryStorage::new(), cfg2()).unwrap();
    assert_eq!(saves.get(), 1);

    // Selection reads but never writes the model.
    let (id, _) = b.select_action(&[0.2, 0.3]).unwrap();
    assert_eq!(saves.get(), 1);
    b.submit_reward(id, 0.4).unwrap();
    assert_eq!(saves.get(), 2);
}

#[test]
fn reward_without_any_selection_is_rejected() {
    let mut b = LinThompson::in_memory(vec!["A"], cfg2()).unwrap();
    assert_eq!(
        b.submit_reward(0, 1.0),
        Err(BanditError::UnknownSelection {
            expected: None,
            got: 0
        })
    );
    assert_eq!(b.parameters().unwrap(), ParameterState::new(2));
}

#[test]
fn same_seed_same_choices() {
    let cfg = LinThompsonConfig {
        dim: 3,
        breadth: linthomp::SampleBreadth::PerAction,
        seed: 42,
        ..LinThompsonConfig::default()
    };
    let actions = vec!["x", "y", "z"];
    let mut b1 = LinThompson::in_memory(actions.clone(), cfg).unwrap();
    let mut b2 = LinThompson::in_memory(actions, cfg).unwrap();

    for t in 0..50 {
        let ctx = [1.0, (t as f64 * 0.1).sin(), 0.5];
        let s1 = b1.select_action_explain(&ctx).unwrap();
        let s2 = b2.select_action_explain(&ctx).unwrap();
        assert_eq!(s1, s2);
        let r = if s1.action == "y" { 1.0 } else { 0.0 };
        b1.submit_reward(s1.id, r).unwrap();
        b2.submit_reward(s2.id, r).unwrap();
    }
    assert_eq!(b1.parameters().unwrap(), b2.parameters().unwrap());
}

#[test]
fn posterior_mean_tracks_linear_reward_model() {
    // r = 0.8 * c0 + 0.1 * c1, noiseless.
    let mut b = LinThompson::in_memory(vec!["only"], cfg2()).unwrap();
    let contexts = [[1.0, 0.0], [0.0, 1.0], [1.0, 1.0], [0.5, 0.2]];
    for i in 0..400 {
        let c = contexts[i % contexts.len()];
        let (id, _) = b.select_action(&c).unwrap();
        b.submit_reward(id, 0.8 * c[0] + 0.1 * c[1]).unwrap();
    }
    let mu = b.parameters().unwrap().muhat;
    assert!((mu[0] - 0.8).abs() < 0.02, "mu={mu:?}");
    assert!((mu[1] - 0.1).abs() < 0.02, "mu={mu:?}");
}

#[test]
fn missing_history_entry_surfaces_as_storage_error() {
    use linthomp::{HistoryEntry, HistoryStorage};

    /// History store that forgets everything it is told.
    struct Forgetful;

    impl HistoryStorage<&'static str> for Forgetful {
        fn add_history(
            &mut self,
            _id: u64,
            _context: Vec<f64>,
            _action: &'static str,
        ) -> Result<(), StorageError> {
            Ok(())
        }

        fn unrewarded(&self, _id: u64) -> Option<&HistoryEntry<&'static str>> {
            None
        }

        fn add_reward(&mut self, id: u64, _reward: f64) -> Result<(), StorageError> {
            Err(StorageError::UnknownEntry(id))
        }
    }

    let mut b =
        LinThompson::new(vec!["A"], MemoryModelStorage::new(), Forgetful, cfg2()).unwrap();
    let (id, _) = b.select_action(&[1.0, 0.0]).unwrap();
    assert_eq!(
        b.submit_reward(id, 1.0),
        Err(BanditError::Storage(StorageError::UnknownEntry(id)))
    );
    assert_eq!(b.parameters().unwrap(), ParameterState::new(2));
}
