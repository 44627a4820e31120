//! Behavioral Scenario Tests (Tier 2)
//!
//! Preference workflows as an application would drive them: a settings
//! screen bound to several keys, a standard-store counter, prior/initial
//! observers feeding a UI model.

use crate::test_utils::*;
use std::sync::Arc;
use stowage::{
    Accessor, ChangeKind, Defaulted, KeyValueStore, MemoryStore, ObservedChange,
    ObservingOptions, Optional, StoreValue,
};

// =============================================================================
// Settings screen
// =============================================================================

struct Settings {
    username: Optional<String>,
    gender: Defaulted<Gender>,
    favourites: Defaulted<Vec<StringEnum>>,
    window: Optional<WindowState>,
}

impl Settings {
    fn bind(store: &Arc<MemoryStore>) -> Self {
        Settings {
            username: Optional::with_store("settings.username", store.clone()),
            gender: Defaulted::with_store("settings.gender", Gender::Female, store.clone()),
            favourites: Defaulted::with_store("settings.favourites", vec![], store.clone()),
            window: Optional::with_store("settings.window", store.clone()),
        }
    }
}

#[test]
fn test_settings_screen_round() {
    let store = store();
    let settings = Settings::bind(&store);

    assert_eq!(settings.username.get(), None);
    assert_eq!(settings.gender.get(), Gender::Female);
    assert!(settings.favourites.get().is_empty());

    settings.username.set(Some("far".into()));
    settings.gender.set(Gender::Male);
    settings.favourites.update(|f| f.push(StringEnum::Boo));
    settings.window.set(Some(WindowState {
        width: 1024,
        height: 768,
        maximized: true,
    }));

    // A second binding sees the same values
    let again = Settings::bind(&store);
    assert_eq!(again.username.get().as_deref(), Some("far"));
    assert_eq!(again.gender.get(), Gender::Male);
    assert_eq!(again.favourites.get(), vec![StringEnum::Boo]);
    assert_eq!(again.window.get().map(|w| w.width), Some(1024));

    assert_eq!(store.get("settings.gender"), Some(StoreValue::Int(0)));
    assert_eq!(
        store.get("settings.favourites"),
        Some(StoreValue::Array(vec!["boo".into()]))
    );

    store.reset();
    assert_eq!(again.gender.get(), Gender::Female);
    assert_eq!(again.window.get(), None);
}

#[test]
fn test_store_reset_notifies_observers() {
    let store = store();
    let settings = Settings::bind(&store);
    settings.username.set(Some("far".into()));

    let recorder = Recorder::<Option<String>>::new();
    let _observation = settings.username.observe(recorder.sink());
    store.reset();

    assert_eq!(recorder.items(), vec![None]);
}

// =============================================================================
// Standard store
// =============================================================================

#[test]
fn test_launch_counter_on_standard_store() {
    let key = unique_key("launches");
    let launches = Defaulted::new(key.clone(), 0_i64);
    for _ in 0..3 {
        launches.update(|n| *n += 1);
    }
    assert_eq!(launches.get(), 3);
    assert_eq!(
        MemoryStore::standard().get(&key),
        Some(StoreValue::Int(3))
    );
    launches.reset();
}

// =============================================================================
// Observers feeding a model
// =============================================================================

#[test]
fn test_prior_then_post_for_each_write() {
    let store = store();
    let gender = Defaulted::with_store("gender", Gender::Male, store.clone());

    let recorder = Recorder::<ObservedChange<Gender>>::new();
    let _observation = gender.observe_with(
        ObservingOptions::PRIOR | ObservingOptions::OLD | ObservingOptions::NEW,
        recorder.sink(),
    );

    gender.set(Gender::Female);
    gender.reset();

    let changes = recorder.items();
    assert_eq!(changes.len(), 4);
    assert!(changes.iter().all(|c| c.kind == ChangeKind::Setting));
    assert_eq!(
        changes.iter().map(|c| c.is_prior).collect::<Vec<_>>(),
        vec![true, false, true, false]
    );
    assert_eq!(changes[1].old_value, None);
    assert_eq!(changes[1].new_value, Some(Gender::Female));
    assert_eq!(changes[3].old_value, Some(Gender::Female));
    assert_eq!(changes[3].new_value, None);
}

#[test]
fn test_initial_seeds_model_with_current_value() {
    let store = store();
    let person = Optional::<Person>::with_store("person", store.clone());
    person.set(Some(jason()));

    let recorder = Recorder::<Option<Person>>::new();
    let sink = recorder.sink();
    let _observation = person.observe_with(
        ObservingOptions::INITIAL | ObservingOptions::NEW,
        move |change| sink(change.new_value),
    );
    assert_eq!(recorder.items(), vec![Some(jason())]);

    person.set(None);
    assert_eq!(recorder.items(), vec![Some(jason()), None]);
}

#[test]
fn test_observer_survives_foreign_writes_of_other_shapes() {
    let store = store();
    let level = Defaulted::with_store("level", 1_i64, store.clone());

    let recorder = Recorder::<i64>::new();
    let _observation = level.observe(recorder.sink());

    store.set("level", Some(StoreValue::String("high".into())));
    store.set("level", Some(StoreValue::Int(4)));

    assert_eq!(recorder.items(), vec![4]);
}

#[test]
fn test_observations_outlive_accessor() {
    let store = store();
    let recorder = Recorder::<Option<String>>::new();
    let observation = {
        let name = Optional::<String>::with_store("name", store.clone());
        name.observe(recorder.sink())
    };

    store.set("name", Some("still here".into()));
    assert_eq!(recorder.items(), vec![Some("still here".to_string())]);
    assert!(observation.is_active());
}
