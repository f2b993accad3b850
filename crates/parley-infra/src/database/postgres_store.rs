//! PostgreSQL document store: one JSONB row per document.
//!
//! Array union and removal are single `UPDATE` statements evaluated by the
//! server, so concurrent appends serialize on the row lock and each one sees
//! the array the previous one produced.

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, NullOrdering, Order};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbConn, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, Statement,
};
use serde_json::Value;

use parley_core::StoreError;
use parley_core::ports::{Direction, Document, DocumentSnapshot, DocumentStore};

use super::entity::document::{self, Entity as DocumentEntity};
use crate::store::generate_document_id;

const UPDATE_SQL: &str = r#"
UPDATE documents
SET body = body || $1::jsonb,
    version = version + 1
WHERE collection = $2 AND id = $3
"#;

const UPDATE_IF_VERSION_SQL: &str = r#"
UPDATE documents
SET body = body || $1::jsonb,
    version = version + 1
WHERE collection = $2 AND id = $3 AND version = $4
"#;

pub(super) const ARRAY_UNION_SQL: &str = r#"
UPDATE documents
SET body = jsonb_set(
        body,
        ARRAY[$1::text],
        CASE
            WHEN jsonb_typeof(body -> $1::text) <> 'array' OR body -> $1::text IS NULL
                THEN jsonb_build_array($2::jsonb)
            WHEN EXISTS (
                SELECT 1 FROM jsonb_array_elements(body -> $1::text) AS existing(e)
                WHERE existing.e = $2::jsonb
            )
                THEN body -> $1::text
            ELSE (body -> $1::text) || jsonb_build_array($2::jsonb)
        END,
        true),
    version = version + 1
WHERE collection = $3 AND id = $4
"#;

pub(super) const ARRAY_REMOVE_SQL: &str = r#"
UPDATE documents
SET body = CASE
        WHEN jsonb_typeof(body -> $1::text) = 'array' THEN jsonb_set(
            body,
            ARRAY[$1::text],
            COALESCE(
                (SELECT jsonb_agg(kept.e ORDER BY kept.ord)
                 FROM jsonb_array_elements(body -> $1::text) WITH ORDINALITY AS kept(e, ord)
                 WHERE kept.e <> $2::jsonb),
                '[]'::jsonb),
            true)
        ELSE body
    END,
    version = version + 1
WHERE collection = $3 AND id = $4
"#;

fn query_error(e: DbErr) -> StoreError {
    match e {
        DbErr::Conn(inner) => StoreError::Connection(inner.to_string()),
        DbErr::ConnectionAcquire(inner) => StoreError::Connection(inner.to_string()),
        other => StoreError::Query(other.to_string()),
    }
}

/// Document store over a `documents (collection, id, body, version)` table.
pub struct PostgresDocumentStore {
    pub(super) db: DbConn,
}

impl PostgresDocumentStore {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    async fn execute(&self, sql: &str, values: Vec<sea_orm::Value>) -> Result<u64, StoreError> {
        let result = self
            .db
            .execute(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
            .await
            .map_err(query_error)?;
        Ok(result.rows_affected())
    }

    async fn find(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<document::Model>, StoreError> {
        DocumentEntity::find_by_id((collection.to_string(), id.to_string()))
            .one(&self.db)
            .await
            .map_err(query_error)
    }
}

/// Field names are interpolated into SQL, so only plain identifiers pass.
fn checked_field(field: &str) -> Result<&str, StoreError> {
    let valid = !field.is_empty() && field.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(field)
    } else {
        Err(StoreError::Query(format!("invalid field name: {field:?}")))
    }
}

#[async_trait]
impl DocumentStore for PostgresDocumentStore {
    fn new_id(&self) -> String {
        generate_document_id()
    }

    async fn add(&self, collection: &str, data: Document) -> Result<String, StoreError> {
        let id = self.new_id();
        let row = document::ActiveModel {
            collection: Set(collection.to_string()),
            id: Set(id.clone()),
            body: Set(Value::Object(data)),
            version: Set(1),
        };
        row.insert(&self.db).await.map_err(query_error)?;
        Ok(id)
    }

    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<DocumentSnapshot>, StoreError> {
        self.find(collection, id)
            .await?
            .map(DocumentSnapshot::try_from)
            .transpose()
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<(), StoreError> {
        let affected = self
            .execute(
                UPDATE_SQL,
                vec![Value::Object(patch).into(), collection.into(), id.into()],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn update_if_version(
        &self,
        collection: &str,
        id: &str,
        patch: Document,
        expected_version: u64,
    ) -> Result<(), StoreError> {
        let expected = i64::try_from(expected_version)
            .map_err(|_| StoreError::Query(format!("version out of range: {expected_version}")))?;
        let affected = self
            .execute(
                UPDATE_IF_VERSION_SQL,
                vec![
                    Value::Object(patch).into(),
                    collection.into(),
                    id.into(),
                    expected.into(),
                ],
            )
            .await?;
        if affected > 0 {
            return Ok(());
        }

        // Nothing matched: either the row is gone or someone wrote first.
        match self.find(collection, id).await? {
            None => Err(StoreError::NotFound),
            Some(current) => Err(StoreError::VersionMismatch {
                expected: expected_version,
                found: u64::try_from(current.version).unwrap_or_default(),
            }),
        }
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let result = DocumentEntity::delete_by_id((collection.to_string(), id.to_string()))
            .exec(&self.db)
            .await
            .map_err(query_error)?;

        if result.rows_affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn array_union(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
    ) -> Result<(), StoreError> {
        let affected = self
            .execute(
                ARRAY_UNION_SQL,
                vec![field.into(), element.into(), collection.into(), id.into()],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn array_remove(
        &self,
        collection: &str,
        id: &str,
        field: &str,
        element: Value,
    ) -> Result<(), StoreError> {
        let affected = self
            .execute(
                ARRAY_REMOVE_SQL,
                vec![field.into(), element.into(), collection.into(), id.into()],
            )
            .await?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn query_ordered(
        &self,
        collection: &str,
        field: &str,
        direction: Direction,
    ) -> Result<Vec<DocumentSnapshot>, StoreError> {
        let field = checked_field(field)?;
        let (order, nulls) = match direction {
            Direction::Ascending => (Order::Asc, NullOrdering::First),
            Direction::Descending => (Order::Desc, NullOrdering::Last),
        };

        let rows = DocumentEntity::find()
            .filter(document::Column::Collection.eq(collection))
            .order_by_with_nulls(Expr::cust(format!("body ->> '{field}'")), order, nulls)
            .order_by_asc(document::Column::Id)
            .all(&self.db)
            .await
            .map_err(query_error)?;

        rows.into_iter().map(DocumentSnapshot::try_from).collect()
    }
}
