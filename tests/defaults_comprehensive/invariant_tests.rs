//! Core Invariant Tests (Tier 1)
//!
//! - Round-trip: deserialize(serialize(v)) == v for every built-in shape
//! - Default fallback: absent or undecodable data reads as the default
//! - Clear equivalence: writing None leaves no key behind
//! - Raw-value precedence: a serde enum with a raw value stores the raw value
//! - Delivery: one write, one notification; none after cancel

use crate::test_utils::*;
use proptest::prelude::*;
use std::collections::HashMap;
use stowage::{
    Accessor, Bridge, ByteBuffer, Defaulted, KeyValueStore, ObservingOptions, Optional, Storable,
    StoreValue, Timestamp,
};

fn round_trip<T: Storable>(value: &T) -> Option<T> {
    let bridge = T::bridge();
    bridge.deserialize(bridge.serialize(Some(value)).as_ref())
}

// =============================================================================
// Round-trip
// =============================================================================

mod round_trips {
    use super::*;

    #[test]
    fn test_primitive_shapes() {
        assert_eq!(round_trip(&true), Some(true));
        assert_eq!(round_trip(&12_i64), Some(12));
        assert_eq!(round_trip(&12.5_f32), Some(12.5));
        assert_eq!(round_trip(&12.5_f64), Some(12.5));
        assert_eq!(round_trip(&"Hello".to_string()), Some("Hello".to_string()));
        assert_eq!(
            round_trip(&ByteBuffer::from(&b"Hello"[..])),
            Some(ByteBuffer::from(&b"Hello"[..]))
        );
        assert_eq!(
            round_trip(&Timestamp::from_secs(1_573_344_000)),
            Some(Timestamp::from_secs(1_573_344_000))
        );
    }

    #[test]
    fn test_derived_shapes() {
        assert_eq!(round_trip(&StringEnum::Far), Some(StringEnum::Far));
        assert_eq!(round_trip(&Gender::Female), Some(Gender::Female));
        assert_eq!(round_trip(&jason()), Some(jason()));

        let window = WindowState {
            width: 800,
            height: 600,
            maximized: false,
        };
        assert_eq!(round_trip(&window), Some(window));
    }

    #[test]
    fn test_collection_shapes() {
        assert_eq!(round_trip(&vec![1_i64, 2, 3]), Some(vec![1, 2, 3]));
        assert_eq!(
            round_trip(&vec![jason(), jason()]),
            Some(vec![jason(), jason()])
        );

        let mut map = HashMap::new();
        map.insert("a".to_string(), vec![StringEnum::Boo]);
        map.insert("b".to_string(), vec![]);
        assert_eq!(round_trip(&map), Some(map));
    }

    proptest! {
        #[test]
        fn prop_string_sequence_round_trip(v in proptest::collection::vec(".{0,12}", 0..16)) {
            prop_assert_eq!(round_trip(&v), Some(v));
        }

        #[test]
        fn prop_accessor_reads_back_what_it_wrote(v in any::<i64>()) {
            let store = store();
            let accessor = Defaulted::with_store("value", 0_i64, store);
            accessor.set(v);
            prop_assert_eq!(accessor.get(), v);
        }
    }
}

// =============================================================================
// Default fallback
// =============================================================================

mod default_fallback {
    use super::*;

    #[test]
    fn test_absent_key_reads_default() {
        let store = store();
        let person = Defaulted::with_store("person", jason(), store.clone());
        assert_eq!(person.get(), jason());
        assert!(store.is_empty());
    }

    #[test]
    fn test_undecodable_value_reads_default() {
        let store = store();
        store.set("gender", Some(StoreValue::Int(99)));
        store.set("person", Some(StoreValue::String("Jason".into())));

        assert_eq!(
            Defaulted::with_store("gender", Gender::Male, store.clone()).get(),
            Gender::Male
        );
        assert_eq!(
            Defaulted::with_store("person", jason(), store.clone()).get(),
            jason()
        );
    }

    #[test]
    fn test_no_coercion_between_shapes() {
        let store = store();
        store.set("ratio", Some(StoreValue::Double(0.25)));
        let ratio = Defaulted::with_store("ratio", 1.0_f32, store.clone());
        assert_eq!(ratio.get(), 1.0);
    }
}

// =============================================================================
// Clear equivalence
// =============================================================================

mod clear_equivalence {
    use super::*;

    #[test]
    fn test_cleared_optional_leaves_no_key() {
        let store = store();
        let person = Optional::<Person>::with_store("person", store.clone());
        person.set(Some(jason()));
        assert!(store.contains("person"));

        person.set(None);
        assert!(!store.contains("person"));
        assert_eq!(store.get("person"), None);
        assert_eq!(person.get(), None);
    }

    #[test]
    fn test_defaulted_reset_matches_fresh_accessor() {
        let store = store();
        let used = Defaulted::with_store("used", 3_i64, store.clone());
        let fresh = Defaulted::with_store("fresh", 3_i64, store.clone());
        used.set(9);
        used.reset();
        assert_eq!(used.get(), fresh.get());
        assert_eq!(used.is_set(), fresh.is_set());
    }
}

// =============================================================================
// Raw-value precedence
// =============================================================================

mod precedence {
    use super::*;

    #[test]
    fn test_combined_enum_serializes_like_raw_only_enum() {
        for (raw_only, combined) in [
            (StringEnum::Boo, CodableStringEnum::Boo),
            (StringEnum::Far, CodableStringEnum::Far),
        ] {
            assert_eq!(
                StringEnum::bridge().serialize(Some(&raw_only)),
                CodableStringEnum::bridge().serialize(Some(&combined))
            );
        }
    }

    #[test]
    fn test_combined_enum_in_store_is_the_raw_string() {
        let store = store();
        let value = Defaulted::with_store("enum", CodableStringEnum::Boo, store.clone());
        value.set(CodableStringEnum::Far);
        assert_eq!(store.get("enum"), Some(StoreValue::String("far".into())));
        assert_ne!(
            store.get("enum"),
            Bridge::<CodableStringEnum>::encoded().serialize(Some(&CodableStringEnum::Far))
        );
    }
}

// =============================================================================
// Sequence bridging
// =============================================================================

mod sequence {
    use super::*;

    #[test]
    fn test_append_one_then_many() {
        let store = store();
        let array = Defaulted::with_store("array", Vec::<i64>::new(), store);
        assert!(array.get().is_empty());

        array.update(|a| a.push(1));
        array.update(|a| a.extend([2, 3, 4]));

        assert_eq!(array.get(), vec![1, 2, 3, 4]);
    }
}

// =============================================================================
// Delivery
// =============================================================================

mod delivery {
    use super::*;

    #[test]
    fn test_old_a_new_b_exactly_once() {
        let store = store();
        let name = Defaulted::with_store("name", String::new(), store.clone());
        name.set("A".into());

        let recorder = Recorder::<(Option<String>, Option<String>)>::new();
        let sink = recorder.sink();
        let observation = name.observe_with(
            ObservingOptions::OLD | ObservingOptions::NEW,
            move |change| sink((change.old_value, change.new_value)),
        );

        name.set("B".into());
        assert_eq!(
            recorder.items(),
            vec![(Some("A".to_string()), Some("B".to_string()))]
        );

        observation.cancel();
        name.set("C".into());
        assert_eq!(recorder.len(), 1);
    }

    #[test]
    fn test_new_value_observer_sees_none_on_clear() {
        let store = store();
        let token = Optional::<String>::with_store("token", store.clone());
        token.set(Some("t".into()));

        let recorder = Recorder::<Option<String>>::new();
        let _observation = token.observe(recorder.sink());
        token.set(None);

        assert_eq!(recorder.items(), vec![None]);
    }
}
