//! Integration Tests for the Session Store
//!
//! Exercises the session lifecycle end to end against the in-memory store.

mod common;

use std::sync::Arc;

use kv_cache::clock::ManualClock;
use kv_cache::{CacheError, KeyValueStore, MemoryStore, SessionData, SessionStore, StoreError};
use serde_json::{json, Value};

use common::init_tracing;

fn data(value: Value) -> SessionData {
    value.as_object().cloned().unwrap_or_default()
}

#[test]
fn test_create_get_update_scenario() {
    init_tracing();
    let sessions = SessionStore::new(MemoryStore::new(), 3600);

    let id = sessions.create_session("u1", None).unwrap();
    let record = sessions.get_session(&id).unwrap().unwrap();
    assert_eq!(record.user_id, "u1");
    assert!(record.data.is_empty());

    assert!(sessions.update_session(&id, data(json!({"a": 1}))).unwrap());

    let record = sessions.get_session(&id).unwrap().unwrap();
    assert_eq!(Value::Object(record.data), json!({"a": 1}));
}

#[test]
fn test_session_lifecycle() {
    init_tracing();
    let clock = ManualClock::default();
    let sessions = SessionStore::new(MemoryStore::new(), 10).with_clock(clock.clone());

    let first = sessions
        .create_session("user:100", Some(data(json!({"ip": "192.168.1.1"}))))
        .unwrap();
    sessions
        .create_session("user:101", Some(data(json!({"ip": "192.168.1.2"}))))
        .unwrap();
    sessions
        .create_session("user:100", Some(data(json!({"ip": "10.0.0.5"}))))
        .unwrap();

    assert!(sessions
        .update_session(&first, data(json!({"login_count": 5, "last_page": "/dashboard"})))
        .unwrap());
    let updated = sessions.get_session(&first).unwrap().unwrap();
    assert_eq!(updated.data["ip"], "192.168.1.1");
    assert_eq!(updated.data["login_count"], 5);

    assert_eq!(sessions.get_user_sessions("user:100").unwrap().len(), 2);

    clock.advance_secs(11);
    assert!(sessions.get_session(&first).unwrap().is_none());

    sessions.create_session("user:102", None).unwrap();
    assert_eq!(sessions.cleanup_expired_sessions().unwrap(), 2);
    assert_eq!(sessions.get_stats().unwrap().total_sessions, 1);
}

#[test]
fn test_sliding_window_keeps_session_alive() {
    init_tracing();
    let clock = ManualClock::default();
    let sessions = SessionStore::new(MemoryStore::new(), 10).with_clock(clock.clone());
    let id = sessions.create_session("u1", None).unwrap();

    let mut last_seen = sessions.get_session(&id).unwrap().unwrap().last_accessed;
    for _ in 0..20 {
        clock.advance_secs(9);
        let record = sessions.get_session(&id).unwrap().unwrap();
        assert!(record.last_accessed >= last_seen);
        last_seen = record.last_accessed;
    }

    clock.advance_secs(11);
    assert!(sessions.get_session(&id).unwrap().is_none());
}

#[test]
fn test_update_on_expired_session_writes_nothing() {
    init_tracing();
    let clock = ManualClock::default();
    let store = Arc::new(MemoryStore::new());
    let sessions = SessionStore::new(store.clone(), 10).with_clock(clock.clone());
    let id = sessions.create_session("u1", None).unwrap();

    clock.advance_secs(11);

    assert!(!sessions.update_session(&id, data(json!({"a": 1}))).unwrap());
    assert!(store.get(format!("session:{id}").as_bytes()).unwrap().is_none());
}

#[test]
fn test_sessions_survive_store_sharing() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let writer = SessionStore::new(store.clone(), 3600);
    let reader = SessionStore::new(store.clone(), 3600);

    let id = writer.create_session("u1", Some(data(json!({"theme": "dark"})))).unwrap();

    let record = reader.get_session(&id).unwrap().unwrap();
    assert_eq!(record.data["theme"], "dark");
}

#[test]
fn test_closed_store_surfaces_error() {
    init_tracing();
    let store = Arc::new(MemoryStore::new());
    let sessions = SessionStore::new(store.clone(), 3600);
    store.close().unwrap();

    assert!(matches!(
        sessions.create_session("u1", None),
        Err(CacheError::Store(StoreError::Closed))
    ));
}
