//! Stress Tests (Tier 3)
//!
//! These tests are NOT run by default (marked with #[ignore]).
//! Run with: cargo test --test defaults_comprehensive stress -- --ignored

use crate::test_utils::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use stowage::{Accessor, Defaulted, KeyValueStore, Optional};

#[test]
#[ignore]
fn stress_writers_each_notify_exactly_once() {
    let store = store();
    let num_threads = 16;
    let writes_per_thread = 500;
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&calls);
    let value = Defaulted::with_store("value", 0_i64, store.clone());
    let _observation = value.observe(move |_| {
        counter.fetch_add(1, Ordering::Relaxed);
    });

    let barrier = Arc::new(Barrier::new(num_threads));
    let handles: Vec<_> = (0..num_threads)
        .map(|i| {
            let value = value.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for j in 0..writes_per_thread {
                    value.set((i * writes_per_thread + j) as i64);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(calls.load(Ordering::Relaxed), num_threads * writes_per_thread);
}

#[test]
#[ignore]
fn stress_observe_cancel_churn() {
    let store = store();
    let name = Optional::<String>::with_store("name", store.clone());
    let stop = Arc::new(std::sync::atomic::AtomicBool::new(false));

    let writer = {
        let name = name.clone();
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let mut n = 0_u64;
            while !stop.load(Ordering::Relaxed) {
                name.set(Some(format!("v{}", n)));
                n += 1;
            }
        })
    };

    let churners: Vec<_> = (0..8)
        .map(|_| {
            let name = name.clone();
            thread::spawn(move || {
                for _ in 0..500 {
                    let after_cancel = Arc::new(AtomicUsize::new(0));
                    let cancelled = Arc::new(std::sync::atomic::AtomicBool::new(false));
                    let (flag, late) = (Arc::clone(&cancelled), Arc::clone(&after_cancel));
                    let observation = name.observe(move |_| {
                        if flag.load(Ordering::SeqCst) {
                            late.fetch_add(1, Ordering::SeqCst);
                        }
                    });
                    observation.cancel();
                    cancelled.store(true, Ordering::SeqCst);
                    assert_eq!(after_cancel.load(Ordering::SeqCst), 0);
                }
            })
        })
        .collect();

    for handle in churners {
        handle.join().unwrap();
    }
    stop.store(true, Ordering::Relaxed);
    writer.join().unwrap();

    assert_eq!(store.observer_count("name"), 0);
    assert!(name.is_set());
}

#[test]
#[ignore]
fn stress_many_keys_many_accessors() {
    let store = store();
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let store = store.clone();
            thread::spawn(move || {
                for k in 0..200 {
                    let key = format!("t{}.k{}", t, k);
                    let list = Defaulted::with_store(key.clone(), Vec::<i64>::new(), store.clone());
                    list.update(|l| l.push(k));
                    list.update(|l| l.push(k + 1));
                    assert_eq!(list.get(), vec![k, k + 1]);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(store.keys().len(), 8 * 200);
}
