//! PostgreSQL-backed store tests.
//!
//! Run with a real database:
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/connectors_test \
//!     cargo test --features postgres_tests --test postgres_store
//! ```
#![cfg(feature = "postgres_tests")]

use connector_registry::config::DatabaseConfig;
use connector_registry::errors::RegistryError;
use connector_registry::storage::{
    create_pool, ConnectorStore, ConnectorTx, NewConnector, SqlxConnectorStore,
};

async fn test_store() -> SqlxConnectorStore {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for postgres_tests");
    let config = DatabaseConfig { url, ..Default::default() };
    let pool = create_pool(&config).await.expect("failed to create test pool");
    SqlxConnectorStore::new(pool)
}

#[tokio::test]
async fn insert_select_delete_roundtrip() {
    let store = test_store().await;
    let workspace_id = format!("ws-{}", uuid::Uuid::new_v4());

    let mut tx = store.begin().await.unwrap();
    let row = tx
        .insert_connector(&NewConnector {
            workspace_id: workspace_id.clone(),
            default_channel_id: "ch-general".to_string(),
        })
        .await
        .unwrap();
    tx.commit().await.unwrap();

    assert!(!row.id.is_empty());
    assert_eq!(row.workspace_id, workspace_id);

    let fetched = store.select_by_id(&row.id).await.unwrap();
    assert_eq!(fetched, row);

    let all = store.select_all().await.unwrap();
    assert!(all.iter().any(|r| r.id == row.id));

    let mut tx = store.begin().await.unwrap();
    let affected = tx.delete_connector(&row.id).await.unwrap();
    tx.commit().await.unwrap();
    assert_eq!(affected, 1);

    assert!(matches!(
        store.select_by_id(&row.id).await,
        Err(RegistryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn rollback_discards_insert() {
    let store = test_store().await;
    let workspace_id = format!("ws-{}", uuid::Uuid::new_v4());

    let mut tx = store.begin().await.unwrap();
    let row = tx
        .insert_connector(&NewConnector {
            workspace_id,
            default_channel_id: "ch-general".to_string(),
        })
        .await
        .unwrap();
    tx.rollback().await.unwrap();

    assert!(matches!(
        store.select_by_id(&row.id).await,
        Err(RegistryError::NotFound { .. })
    ));
}

#[tokio::test]
async fn delete_missing_row_affects_zero() {
    let store = test_store().await;

    let mut tx = store.begin().await.unwrap();
    let affected = tx.delete_connector("00000000-0000-0000-0000-000000000000").await.unwrap();
    tx.rollback().await.unwrap();

    assert_eq!(affected, 0);
}
