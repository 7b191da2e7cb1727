//! Connection lifecycle against a real in-memory sqlite database

use suno_core::domain::{ConnectionState, LogLevel, SqlValue, TransactionMode};
use suno_core::port::FileWriteMode;
use suno_core::{AppError, ConnectionManager};
use suno_integration_tests::{file_sink, sqlx_manager};

async fn count_rows(manager: &ConnectionManager) -> i64 {
    let rows = manager
        .create_statement()
        .await
        .unwrap()
        .fetch_all("SELECT COUNT(*) FROM homes")
        .await
        .unwrap();
    match rows[0][0] {
        SqlValue::Int(n) => n,
        ref other => panic!("unexpected count value: {:?}", other),
    }
}

async fn memory_manager(dir: &std::path::Path) -> ConnectionManager {
    let (sink, _) = file_sink(dir, FileWriteMode::Append);
    let manager = sqlx_manager(sink);
    manager
        .configure("sqlite::memory:", "suno", Some(""))
        .unwrap();
    manager
        .create_statement()
        .await
        .unwrap()
        .execute("CREATE TABLE homes (owner TEXT NOT NULL, world TEXT NOT NULL)")
        .await
        .unwrap();
    manager
}

#[tokio::test]
async fn test_begin_insert_rollback_then_healthy() {
    let tmp = tempfile::tempdir().unwrap();
    let manager = memory_manager(tmp.path()).await;

    manager.begin_transaction().await.unwrap();
    let mut insert = manager
        .prepare_statement("INSERT INTO homes (owner, world) VALUES (?, ?)")
        .await
        .unwrap();
    insert.bind("steve".into());
    insert.bind("overworld".into());
    assert_eq!(insert.execute().await.unwrap(), 1);
    manager.rollback_transaction().await.unwrap();

    assert_eq!(
        manager.transaction_mode().await,
        Some(TransactionMode::AutoCommit)
    );
    assert_eq!(count_rows(&manager).await, 0);
    assert!(manager.is_healthy().await.unwrap());
}

#[tokio::test]
async fn test_commit_persists_work() {
    let tmp = tempfile::tempdir().unwrap();
    let manager = memory_manager(tmp.path()).await;

    manager.begin_transaction().await.unwrap();
    for owner in ["alex", "steve"] {
        let mut insert = manager
            .prepare_statement("INSERT INTO homes (owner, world) VALUES (?, 'nether')")
            .await
            .unwrap();
        insert.bind(owner.into());
        insert.execute().await.unwrap();
    }
    manager.commit_transaction().await.unwrap();

    assert_eq!(count_rows(&manager).await, 2);
}

#[tokio::test]
async fn test_invalid_sql_is_statement_error() {
    let tmp = tempfile::tempdir().unwrap();
    let manager = memory_manager(tmp.path()).await;

    let err = manager
        .prepare_statement("INSERT INTO nowhere VALUES (?)")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, AppError::StatementError(_)));
}

#[tokio::test]
async fn test_commit_without_begin_is_rejected_by_driver() {
    let tmp = tempfile::tempdir().unwrap();
    let manager = memory_manager(tmp.path()).await;

    let err = manager.commit_transaction().await.unwrap_err();
    assert!(matches!(err, AppError::TransactionError(_)));
}

#[tokio::test]
async fn test_close_and_reopen_gets_fresh_database() {
    let tmp = tempfile::tempdir().unwrap();
    let manager = memory_manager(tmp.path()).await;

    manager.close_connection().await;
    assert_eq!(manager.state().await, ConnectionState::Absent);
    // closing twice is a no-op
    manager.close_connection().await;

    // a new in-memory database has no tables
    let err = manager
        .create_statement()
        .await
        .unwrap()
        .fetch_all("SELECT COUNT(*) FROM homes")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("homes"));
    assert_eq!(manager.state().await, ConnectionState::Established);
}

#[tokio::test]
async fn test_unreachable_database_reports_and_logs() {
    let tmp = tempfile::tempdir().unwrap();
    let (sink, console) = file_sink(tmp.path(), FileWriteMode::Append);
    let manager = sqlx_manager(sink.clone());
    // sqlite refuses to open a file inside a missing directory in read-write mode
    manager
        .configure("sqlite:///nonexistent-dir/suno/none.db?mode=rw", "suno", Some(""))
        .unwrap();

    let err = manager.acquire_connection().await.err().unwrap();
    assert!(matches!(err, AppError::ConnectionFailed(_)));
    assert_eq!(manager.state().await, ConnectionState::Absent);

    let last = sink.history().pop().unwrap();
    assert_eq!(last.level(), LogLevel::Error);
    assert!(last.text().starts_with("Connection to the database failed"));
    assert!(console.last().unwrap().contains("[ERROR]"));
}

#[tokio::test]
async fn test_configure_blank_address_never_touches_driver() {
    let tmp = tempfile::tempdir().unwrap();
    let (sink, console) = file_sink(tmp.path(), FileWriteMode::Append);
    let manager = sqlx_manager(sink.clone());

    let err = manager.configure("", "u", Some("p")).unwrap_err();
    assert!(matches!(err, AppError::InvalidCredentials(_)));
    assert!(matches!(
        manager.acquire_connection().await.err().unwrap(),
        AppError::NotConfigured
    ));
    // configuration errors are the caller's to report
    assert!(sink.history().is_empty());
    assert!(console.lines().is_empty());
}
