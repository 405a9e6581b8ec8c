//! Store Tests
//!
//! Tests verify:
//! - KeyValueStore semantics through the shared store
//! - Error kinds for missing keys and a full store
//! - Concurrent access from many threads

use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread;

use bytes::Bytes;
use hashbase::{HashbaseError, KeyValueStore, Store};

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_put_get() {
    let store = Store::new(16);
    store.put(b"name", Bytes::from("John Smith")).unwrap();
    assert_eq!(store.get(b"name").unwrap(), Bytes::from("John Smith"));
}

#[test]
fn test_get_missing_is_key_not_found() {
    let store = Store::new(16);
    assert!(matches!(store.get(b"missing"), Err(HashbaseError::KeyNotFound)));
}

#[test]
fn test_remove_missing_is_key_not_found() {
    let store = Store::new(16);
    assert!(matches!(store.remove(b"missing"), Err(HashbaseError::KeyNotFound)));
}

#[test]
fn test_remove_then_get() {
    let store = Store::new(16);
    store.put(b"k", Bytes::from("v")).unwrap();
    store.remove(b"k").unwrap();

    assert!(!store.contains(b"k"));
    assert!(store.get(b"k").is_err());
    assert!(store.is_empty());
}

#[test]
fn test_len_counts_distinct_keys() {
    let store = Store::new(16);
    store.put(b"a", Bytes::from("1")).unwrap();
    store.put(b"b", Bytes::from("2")).unwrap();
    store.put(b"a", Bytes::from("3")).unwrap();
    assert_eq!(store.len(), 2);
}

#[test]
fn test_full_store() {
    let store = Store::new(2);
    store.put(b"a", Bytes::from("1")).unwrap();
    store.put(b"b", Bytes::from("2")).unwrap();

    let err = store.put(b"c", Bytes::from("3")).unwrap_err();
    assert!(matches!(err, HashbaseError::StoreFull { capacity: 2 }));

    // Existing key can still be updated
    store.put(b"a", Bytes::from("updated")).unwrap();
    assert_eq!(store.get(b"a").unwrap(), Bytes::from("updated"));
}

#[test]
fn test_clear() {
    let store = Store::new(16);
    for i in 0..10 {
        store.put(format!("k{}", i).as_bytes(), Bytes::from("v")).unwrap();
    }
    store.clear();
    assert_eq!(store.len(), 0);
    assert_eq!(store.capacity(), 16);
}

#[test]
fn test_default_capacity() {
    assert_eq!(Store::default().capacity(), 512);
}

#[test]
fn test_iterate_sums_values() {
    let store = Store::new(16);
    for i in 1..=4 {
        store
            .put(format!("k{}", i).as_bytes(), Bytes::from(i.to_string()))
            .unwrap();
    }

    let mut total = 0;
    let flow = store.iterate(|_, value| {
        total += std::str::from_utf8(value).unwrap().parse::<i32>().unwrap();
        ControlFlow::Continue(())
    });

    assert_eq!(flow, ControlFlow::Continue(()));
    assert_eq!(total, 10);
}

#[test]
fn test_take_any() {
    let store = Store::new(4);
    store.put(b"only", Bytes::from("one")).unwrap();

    let (key, value) = store.take_any().unwrap();
    assert_eq!(key, b"only");
    assert_eq!(value, Bytes::from("one"));
    assert!(store.take_any().is_none());
}

#[test]
fn test_store_as_trait_object() {
    let store: Box<dyn KeyValueStore> = Box::new(Store::new(4));
    store.put(b"x", Bytes::from("y")).unwrap();
    assert_eq!(store.len(), 1);
    assert!(!store.is_empty());
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_writers_disjoint_keys() {
    let store = Arc::new(Store::new(1024));
    let mut handles = vec![];

    for t in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..100 {
                let key = format!("t{}-k{}", t, i);
                store.put(key.as_bytes(), Bytes::from(key.clone())).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 800);
    for t in 0..8 {
        for i in 0..100 {
            let key = format!("t{}-k{}", t, i);
            assert_eq!(store.get(key.as_bytes()).unwrap(), Bytes::from(key));
        }
    }
}

#[test]
fn test_concurrent_readers_and_writers() {
    let store = Arc::new(Store::new(64));
    store.put(b"shared", Bytes::from("initial")).unwrap();

    let mut handles = vec![];

    for _ in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..500 {
                let value = store.get(b"shared").unwrap();
                assert!(value == "initial" || value.starts_with(b"writer"));
            }
        }));
    }

    for w in 0..2 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for i in 0..500 {
                let value = format!("writer{}-{}", w, i);
                store.put(b"shared", Bytes::from(value)).unwrap();
            }
        }));
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 1);
}

#[test]
fn test_concurrent_fill_never_exceeds_capacity() {
    let store = Arc::new(Store::new(50));
    let mut handles = vec![];

    for t in 0..4 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            let mut stored = 0;
            for i in 0..50 {
                let key = format!("t{}-{}", t, i);
                if store.put(key.as_bytes(), Bytes::from("v")).is_ok() {
                    stored += 1;
                }
            }
            stored
        }));
    }

    let stored: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(stored, 50);
    assert_eq!(store.len(), 50);
}
