//! Live database tests.
//!
//! These tests need reachable servers and read their targets from the same
//! variables the notebooks use (`MSSQL_*`, `MARIADB_*`). Run them with
//! `cargo test -- --ignored` inside the compose environment.

use datalab::app::resolver;
use datalab::domain::DatabaseHandle;
use datalab::infra::{MariaDbHandle, MssqlHandle, ProcessEnv};

#[tokio::test]
#[ignore = "requires a running SQL Server"]
async fn test_mssql_round_trip() {
    let profile = resolver::resolve_mssql(&ProcessEnv);
    let mut handle = MssqlHandle::connect(&profile)
        .await
        .expect("Failed to connect to SQL Server");

    let row = handle
        .client_mut()
        .simple_query("SELECT 42 AS answer")
        .await
        .expect("query failed")
        .into_row()
        .await
        .expect("no result")
        .expect("empty result");
    assert_eq!(row.get::<i32, _>("answer"), Some(42));

    Box::new(handle).close().await.expect("close failed");
}

#[tokio::test]
#[ignore = "requires a running MariaDB"]
async fn test_mariadb_round_trip() {
    let profile = resolver::resolve_mariadb(&ProcessEnv).expect("invalid MARIADB_PORT");
    let mut handle = MariaDbHandle::connect(&profile)
        .await
        .expect("Failed to connect to MariaDB");

    let (charset,): (String,) = sqlx::query_as("SELECT @@character_set_client")
        .fetch_one(handle.connection_mut())
        .await
        .expect("query failed");
    assert_eq!(charset, "utf8mb4");

    handle.ping().await.expect("ping failed");
    Box::new(handle).close().await.expect("close failed");
}

#[tokio::test]
async fn test_unreachable_host_fails_immediately() {
    let env = std::collections::HashMap::from([
        ("MARIADB_HOST", "127.0.0.1"),
        ("MARIADB_PORT", "1"),
    ]);
    let profile = resolver::resolve_mariadb(&env).unwrap();
    assert!(MariaDbHandle::connect(&profile).await.is_err());
}
