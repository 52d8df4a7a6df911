use varbase::{Expression, VarError, VarStore, Vec3};

fn populated_store() -> VarStore {
    let mut store = VarStore::new();
    store.add("pressYStep", 1.85);
    store.add("pressMat", "Stainless304");
    store.add("nSegments", 8u64);
    store.add("beamAxis", Vec3::new(0.0, 1.0, 0.0));
    store.parse("pressLength", "41.85 - pressYStep").unwrap();
    store
}

#[test]
fn typed_roundtrip_across_the_full_type_set() {
    let store = populated_store();

    assert_eq!(store.eval::<f64>("pressYStep").unwrap(), 1.85);
    assert_eq!(store.eval::<String>("pressMat").unwrap(), "Stainless304");
    assert_eq!(store.eval::<u64>("nSegments").unwrap(), 8);
    assert_eq!(
        store.eval::<Vec3>("beamAxis").unwrap(),
        Vec3::new(0.0, 1.0, 0.0)
    );
    assert_eq!(store.eval::<f64>("pressLength").unwrap(), 40.0);
    assert_eq!(
        store.eval::<Expression>("pressLength").unwrap().source(),
        "41.85 - pressYStep"
    );
}

#[test]
fn type_replacing_overwrite_keeps_the_index_stable() {
    let mut store = VarStore::new();
    let idx = store.add("x", 1.0);
    store.add("other", 2.0);

    // Redefine "x" as a string; the index must not move.
    store.add("x", "hello");
    assert_eq!(store.eval::<String>("x").unwrap(), "hello");
    assert_eq!(store.index_of("x"), Some(idx));

    // And back to a double again.
    store.add("x", 7.5);
    assert_eq!(store.eval::<f64>("x").unwrap(), 7.5);
    assert_eq!(store.index_of("x"), Some(idx));
}

#[test]
fn cloned_stores_never_alias() {
    let store_a = populated_store();
    let mut store_b = store_a.clone();

    store_b.add("extra", 5.0);
    store_b.add("pressYStep", 100.0);

    assert!(!store_a.has("extra"));
    assert_eq!(store_a.eval::<f64>("pressYStep").unwrap(), 1.85);

    // Expression cells in the clone track the clone's values.
    assert!((store_b.eval::<f64>("pressLength").unwrap() - -58.15).abs() < 1e-9);
    assert_eq!(store_a.eval::<f64>("pressLength").unwrap(), 40.0);
}

#[test]
fn expressions_follow_dependency_updates() {
    let mut store = VarStore::new();
    store.add("a", 2.0);
    store.parse("b", "a * 2").unwrap();
    assert_eq!(store.eval::<f64>("b").unwrap(), 4.0);

    store.add("a", 5.0);
    assert_eq!(store.eval::<f64>("b").unwrap(), 10.0);

    // Strict set keeps the dependency fresh too.
    store.set("a", 6.0).unwrap();
    assert_eq!(store.eval::<f64>("b").unwrap(), 12.0);
}

#[test]
fn expressions_can_be_stored_before_their_dependencies() {
    let mut store = VarStore::new();
    store.parse("derived", "base + offset").unwrap();

    // Dependencies absent: reading fails fast, naming the missing one.
    let err = store.eval::<f64>("derived").unwrap_err();
    assert_eq!(err, VarError::not_found("base"));

    store.add("base", 10.0);
    store.add("offset", 0.5);
    assert_eq!(store.eval::<f64>("derived").unwrap(), 10.5);
}

#[test]
fn defaults_apply_only_to_absence() {
    let store = populated_store();

    assert_eq!(store.eval_def::<f64>("missing", 3.14).unwrap(), 3.14);
    assert!(store.eval::<f64>("missing").unwrap_err().is_not_found());

    // A present variable of the wrong type is an error, not a default.
    let err = store.eval_def::<f64>("pressMat", 0.0).unwrap_err();
    assert!(err.is_type_mismatch());
}

#[test]
fn widening_is_one_directional() {
    let mut store = VarStore::new();
    store.add("count", 12i64);
    store.add("width", 4.5f64);

    assert_eq!(store.eval::<f64>("count").unwrap(), 12.0);
    let err = store.eval::<i64>("width").unwrap_err();
    assert_eq!(err, VarError::type_mismatch("width", "int", "double"));
}

#[test]
fn serde_snapshot_preserves_semantics() {
    let store = populated_store();
    let json = serde_json::to_string(&store).unwrap();
    let restored: VarStore = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.len(), store.len());
    assert_eq!(restored.eval::<f64>("pressLength").unwrap(), 40.0);
    assert_eq!(restored.index_of("pressMat"), store.index_of("pressMat"));
}
