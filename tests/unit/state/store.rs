use super::*;
use crate::state::params::BackgroundKind;

#[test]
fn apply_publishes_to_every_clone() {
    let store = StateStore::new();
    let other = store.clone();
    let mut rx = other.subscribe();

    let next = store.apply(&ParamsPatch {
        background: Some(BackgroundKind::Checker),
        ..ParamsPatch::default()
    });

    assert_eq!(next.background, BackgroundKind::Checker);
    assert_eq!(other.snapshot().background, BackgroundKind::Checker);
    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().background, BackgroundKind::Checker);
}

#[test]
fn subscribers_observe_only_the_latest_version() {
    let store = StateStore::new();
    let mut rx = store.subscribe();

    for w in [100, 200, 300] {
        store.apply(&ParamsPatch {
            width: Some(w),
            ..ParamsPatch::default()
        });
    }

    assert!(rx.has_changed().unwrap());
    assert_eq!(rx.borrow_and_update().width, 300);
    assert!(!rx.has_changed().unwrap());
}

#[test]
fn published_values_are_never_mutated() {
    let store = StateStore::new();
    let before = store.snapshot();
    store.apply(&ParamsPatch {
        product_scale: Some(0.5),
        ..ParamsPatch::default()
    });
    assert_eq!(before.product_scale, 1.0);
    assert_eq!(store.snapshot().product_scale, 0.5);
}

#[test]
fn replace_swaps_the_whole_value() {
    let store = StateStore::new();
    let params = CompositionParams {
        width: 10,
        height: 20,
        ..CompositionParams::default()
    };
    store.replace(params.clone());
    assert_eq!(*store.snapshot(), params);
}
