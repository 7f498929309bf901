//! Session registry behaviour.

use hexcave_core::{config::GameConfig, error::SimError, session::SessionRegistry};
use std::thread;

fn registry() -> SessionRegistry {
    SessionRegistry::new(GameConfig::default_test()).expect("registry")
}

#[test]
fn session_ids_are_assigned_in_order() {
    let registry = registry();
    let (a, _) = registry.create("1").expect("create");
    let (b, _) = registry.create("1").expect("create");
    assert_eq!((a, b), (1, 2));
    assert_eq!(registry.len(), 2);
}

#[test]
fn unknown_session_is_an_error() {
    let registry = registry();
    assert!(matches!(
        registry.input(99, "wait"),
        Err(SimError::SessionNotFound { id: 99 })
    ));
}

#[test]
fn sessions_do_not_share_state() {
    let registry = registry();
    let (a, _) = registry.create("5").expect("create");
    let (b, _) = registry.create("5").expect("create");

    let first_a = registry.input(a, "wait").expect("input");
    registry.input(a, "descend").expect("input");
    let first_b = registry.input(b, "wait").expect("input");

    assert_eq!(first_a, first_b, "b must not see a's descend");
}

#[test]
fn removed_session_is_gone() {
    let registry = registry();
    let (id, _) = registry.create("3").expect("create");
    assert!(registry.remove(id).is_some());
    assert!(registry.is_empty());
    assert!(registry.get(id).is_err());
}

#[test]
fn sessions_run_concurrently_and_stay_deterministic() {
    let registry = registry();
    let outputs: Vec<Vec<String>> = thread::scope(|scope| {
        let workers: Vec<_> = (0..4)
            .map(|_| {
                scope.spawn(|| {
                    let (id, _) = registry.create("77").expect("create");
                    let mut out = Vec::new();
                    for line in ["wait", "move 3", "move 5", "descend", "move 1"] {
                        out.extend(registry.input(id, line).expect("input"));
                    }
                    out
                })
            })
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().expect("worker panicked"))
            .collect()
    });

    assert_eq!(registry.len(), 4);
    for out in &outputs[1..] {
        assert_eq!(out, &outputs[0]);
    }
}

#[test]
fn registry_rejects_degenerate_config() {
    let config = GameConfig {
        height: 2,
        ..GameConfig::default_test()
    };
    assert!(SessionRegistry::new(config).is_err());
}
