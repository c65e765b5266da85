//! Integration tests for `PgRegistryStore` driven through the registry.

use std::sync::Arc;

use assert_matches::assert_matches;
use paycode_core::{CoreError, NotificationRegistry, RegistryStats};
use paycode_db::PgRegistryStore;
use sqlx::PgPool;

fn registry(pool: PgPool) -> NotificationRegistry {
    NotificationRegistry::new(Arc::new(PgRegistryStore::new(pool)))
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_notification_flow(pool: PgPool) {
    paycode_db::health_check(&pool).await.unwrap();
    let registry = registry(pool);

    registry.register("alice-code").await.unwrap();
    registry.register("bob-code").await.unwrap();
    registry.register("eve-code").await.unwrap();
    registry.notify("alice-code", "bob-code").await.unwrap();

    let err = registry.notify("carol-code", "bob-code").await.unwrap_err();
    assert_matches!(err, CoreError::SenderNotRegistered { .. });

    let err = registry.notify("alice-code", "bob-code").await.unwrap_err();
    assert_matches!(err, CoreError::DuplicateNotification { .. });

    registry.notify("alice-code", "dave-code").await.unwrap();
    registry.notify("eve-code", "bob-code").await.unwrap();

    assert_eq!(
        registry.get_notifications("bob-code").await.unwrap(),
        vec!["alice-code", "eve-code"]
    );
    assert_eq!(
        registry.get_notifications("dave-code").await.unwrap(),
        vec!["alice-code"]
    );
    assert!(registry
        .get_notifications("never-notified-code")
        .await
        .unwrap()
        .is_empty());

    assert_eq!(
        registry.stats().await.unwrap(),
        RegistryStats {
            registered_codes: 3,
            notifications: 3,
        }
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_two_registries_share_edge_uniqueness(pool: PgPool) {
    // Two instances over one database behave like two server processes.
    let first = registry(pool.clone());
    let second = registry(pool);

    first.register("alice-code").await.unwrap();
    assert!(second.is_registered("alice-code").await.unwrap());

    first.notify("alice-code", "bob-code").await.unwrap();
    let err = second.notify("alice-code", "bob-code").await.unwrap_err();
    assert_matches!(err, CoreError::DuplicateNotification { .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_identifiers_with_nul_match_memory_backend(pool: PgPool) {
    let postgres = registry(pool);
    let memory = NotificationRegistry::in_memory();

    for registry in [&postgres, &memory] {
        registry.register("a\0b").await.unwrap();
        registry.notify("a\0b", "\0").await.unwrap();

        let err = registry.notify("a\0b", "\0").await.unwrap_err();
        assert_matches!(err, CoreError::DuplicateNotification { .. });
        let err = registry.notify("a", "\0").await.unwrap_err();
        assert_matches!(err, CoreError::SenderNotRegistered { .. });

        assert!(registry.is_registered("a\0b").await.unwrap());
        assert_eq!(registry.get_notifications("\0").await.unwrap(), vec!["a\0b"]);
    }

    assert_eq!(postgres.stats().await.unwrap(), memory.stats().await.unwrap());
}
