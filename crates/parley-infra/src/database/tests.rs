use parley_core::StoreError;
use parley_core::ports::{Direction, Document, DocumentStore};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Transaction};
use serde_json::json;

use crate::database::PostgresDocumentStore;
use crate::database::entity::document;
use crate::database::postgres_store::{ARRAY_REMOVE_SQL, ARRAY_UNION_SQL};

fn row(id: &str, body: serde_json::Value, version: i64) -> document::Model {
    document::Model {
        collection: "posts".to_owned(),
        id: id.to_owned(),
        body,
        version,
    }
}

fn affected(rows: u64) -> MockExecResult {
    MockExecResult {
        last_insert_id: 0,
        rows_affected: rows,
    }
}

#[tokio::test]
async fn test_get_document() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row("p1", json!({ "content": "hello" }), 3)]])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let snapshot = store.get("posts", "p1").await.unwrap().unwrap();

    assert_eq!(snapshot.id, "p1");
    assert_eq!(snapshot.data["content"], "hello");
    assert_eq!(snapshot.version, 3);
}

#[tokio::test]
async fn test_get_rejects_non_object_body() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![row("p1", json!([1, 2]), 1)]])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let result = store.get("posts", "p1").await;

    assert!(matches!(result, Err(StoreError::Malformed(_))));
}

#[tokio::test]
async fn test_array_union_on_missing_row_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([affected(0)])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let result = store
        .array_union("posts", "gone", "comments", json!({ "id": "c1" }))
        .await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

fn single_statement(sql: &str, values: Vec<sea_orm::Value>) -> Vec<Transaction> {
    vec![Transaction::from_sql_and_values(
        DatabaseBackend::Postgres,
        sql,
        values,
    )]
}

#[tokio::test]
async fn test_array_union_is_one_statement() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([affected(1)])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let element = json!({ "id": "c1" });
    store
        .array_union("posts", "p1", "comments", element.clone())
        .await
        .unwrap();

    assert!(ARRAY_UNION_SQL.contains("SET body = jsonb_set("));
    assert_eq!(
        store.db.into_transaction_log(),
        single_statement(
            ARRAY_UNION_SQL,
            vec!["comments".into(), element.into(), "posts".into(), "p1".into()],
        )
    );
}

#[tokio::test]
async fn test_array_remove_is_one_statement() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([affected(1)])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let element = json!({ "id": "c1" });
    store
        .array_remove("posts", "p1", "comments", element.clone())
        .await
        .unwrap();

    assert!(ARRAY_REMOVE_SQL.contains("jsonb_set("));
    assert_eq!(
        store.db.into_transaction_log(),
        single_statement(
            ARRAY_REMOVE_SQL,
            vec!["comments".into(), element.into(), "posts".into(), "p1".into()],
        )
    );
}

#[tokio::test]
async fn test_update_if_version_reports_mismatch() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([affected(0)])
        .append_query_results([vec![row("p1", json!({}), 7)]])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let result = store
        .update_if_version("posts", "p1", Document::new(), 3)
        .await;

    assert!(matches!(
        result,
        Err(StoreError::VersionMismatch {
            expected: 3,
            found: 7
        })
    ));
}

#[tokio::test]
async fn test_update_if_version_on_missing_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([affected(0)])
        .append_query_results([Vec::<document::Model>::new()])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let result = store
        .update_if_version("posts", "p1", Document::new(), 3)
        .await;

    assert!(matches!(result, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_query_ordered_returns_rows_in_database_order() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            row("new", json!({ "createdAt": "2024-06-01T00:00:00.000Z" }), 1),
            row("old", json!({ "createdAt": "2024-01-01T00:00:00.000Z" }), 1),
        ]])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    let ids: Vec<_> = store
        .query_ordered("posts", "createdAt", Direction::Descending)
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();

    assert_eq!(ids, vec!["new", "old"]);
}

#[tokio::test]
async fn test_delete_missing_row() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([affected(0)])
        .into_connection();

    let store = PostgresDocumentStore::new(db);
    assert!(matches!(
        store.delete("posts", "nope").await,
        Err(StoreError::NotFound)
    ));
}
