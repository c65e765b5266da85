//! Integration tests for the event ledger writer.

use std::sync::Arc;
use std::time::Duration;

use paycode_core::{NotificationRegistry, RegistryEvent};
use paycode_db::repositories::EventRepo;
use paycode_db::PgRegistryStore;
use paycode_events::{EventBus, EventPersistence};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_every_transition_gets_a_ledger_row(pool: PgPool) {
    let bus = Arc::new(EventBus::default());
    let handle = tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));

    let registry = NotificationRegistry::new(Arc::new(PgRegistryStore::new(pool.clone())))
        .with_sink(bus.clone());

    registry.register("alice-code").await.unwrap();
    registry.register("alice-code").await.unwrap();
    registry.notify("alice-code", "bob-code").await.unwrap();
    registry.notify("alice-code", "bob-code").await.unwrap_err();
    registry.notify("carol-code", "bob-code").await.unwrap_err();

    // Closing the bus lets the persistence loop drain and exit.
    drop(registry);
    drop(bus);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("persistence should stop when the bus closes")
        .unwrap();

    let events = EventRepo::list(&pool, 10, 0).await.unwrap();
    let names: Vec<_> = events.iter().map(|e| e.event_name.as_str()).collect();
    assert_eq!(names, vec!["Registered", "NotificationSent"]);
    assert_eq!(events[0].sequence, 1);
    assert_eq!(events[1].sequence, 2);
    assert_eq!(events[1].payload.0["sender"], "alice-code");
    assert_eq!(events[1].payload.0["recipient"], "bob-code");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_lagged_events_leave_a_detectable_sequence_gap(pool: PgPool) {
    // Capacity 2: the writer can only catch the last two of five events.
    let bus = EventBus::new(2);
    let receiver = bus.subscribe();
    for i in 1..=5 {
        bus.broadcast(RegistryEvent::registered(format!("code-{i}")));
    }
    drop(bus);

    EventPersistence::run(pool.clone(), receiver).await;

    let events = EventRepo::list(&pool, 10, 0).await.unwrap();
    let sequences: Vec<i64> = events.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![4, 5]);

    let last = *sequences.last().unwrap();
    let missing: Vec<i64> = (1..=last).filter(|s| !sequences.contains(s)).collect();
    assert_eq!(missing, vec![1, 2, 3]);
    assert_eq!(events[0].payload.0["payment_code"], "code-4");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_ledger_keeps_identifiers_with_nul(pool: PgPool) {
    let bus = Arc::new(EventBus::default());
    let handle = tokio::spawn(EventPersistence::run(pool.clone(), bus.subscribe()));

    let registry = NotificationRegistry::new(Arc::new(PgRegistryStore::new(pool.clone())))
        .with_sink(bus.clone());
    registry.register("a\0b").await.unwrap();

    drop(registry);
    drop(bus);
    tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("persistence should stop when the bus closes")
        .unwrap();

    let events = EventRepo::list(&pool, 10, 0).await.unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].payload.0["payment_code"], "a\0b");
}
