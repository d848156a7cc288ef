//! PostgreSQL Backend
//!
//! Implements the hierarchy [`Backend`] on a sqlx pool. Rows travel as JSONB
//! in both directions; see [`sql`](super::sql) for the statement shapes.

use async_trait::async_trait;
use pipedeck_store::{Backend, BackendError, Filter, Record, Result, Table};
use serde_json::Value;
use sqlx::PgPool;

use super::sql;

pub struct PgBackend {
    pool: PgPool,
}

impl PgBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Backend for PgBackend {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Record>> {
        let query = sql::select(table, filter)?;

        let rows: Vec<Value> = sqlx::query_scalar(&query)
            .bind(Value::Object(filter.to_record()))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(|row| into_record(table, row)).collect()
    }

    async fn insert(&self, table: Table, record: Record) -> Result<Record> {
        let query = sql::insert(table);

        let row: Value = sqlx::query_scalar(&query)
            .bind(Value::Object(record))
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        into_record(table, row)
    }

    async fn update(&self, table: Table, filter: &Filter, patch: Record) -> Result<Vec<Record>> {
        let query = sql::update(table, filter, &patch)?;

        let rows: Vec<Value> = sqlx::query_scalar(&query)
            .bind(Value::Object(filter.to_record()))
            .bind(Value::Object(patch))
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(|row| into_record(table, row)).collect()
    }

    async fn delete(&self, table: Table, filter: &Filter) -> Result<u64> {
        let query = sql::delete(table, filter)?;

        let result = sqlx::query(&query)
            .bind(Value::Object(filter.to_record()))
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}

fn into_record(table: Table, row: Value) -> Result<Record> {
    match row {
        Value::Object(record) => Ok(record),
        other => Err(BackendError::malformed(format!(
            "{} returned a non-object row: {}",
            table, other
        ))),
    }
}

/// Maps a sqlx error onto the backend error taxonomy
///
/// SQLSTATE class 23 (integrity constraint violation) becomes `Constraint`,
/// class 22 (data exception, e.g. an invalid UUID) becomes `Malformed`.
pub fn map_sqlx_error(err: sqlx::Error) -> BackendError {
    match &err {
        sqlx::Error::RowNotFound => BackendError::not_found(err.to_string()),
        sqlx::Error::Database(db) => match db.code().as_deref() {
            Some(code) if code.starts_with("23") => BackendError::constraint(db.message()),
            Some(code) if code.starts_with("22") => BackendError::malformed(db.message()),
            _ => {
                tracing::error!("Database error: {:?}", err);
                BackendError::transport(db.message())
            }
        },
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            BackendError::malformed(err.to_string())
        }
        _ => {
            tracing::error!("Database error: {:?}", err);
            BackendError::transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipedeck_store::BackendErrorKind;
    use serde_json::json;

    #[test]
    fn test_map_row_not_found() {
        let err = map_sqlx_error(sqlx::Error::RowNotFound);
        assert_eq!(err.kind, BackendErrorKind::NotFound);
    }

    #[test]
    fn test_map_pool_errors_to_transport() {
        assert_eq!(
            map_sqlx_error(sqlx::Error::PoolTimedOut).kind,
            BackendErrorKind::Transport
        );
        assert_eq!(
            map_sqlx_error(sqlx::Error::PoolClosed).kind,
            BackendErrorKind::Transport
        );
    }

    #[test]
    fn test_into_record_requires_object() {
        assert!(into_record(Table::Pipelines, json!({ "pipeline_id": "x" })).is_ok());

        let err = into_record(Table::Pipelines, json!([1, 2])).unwrap_err();
        assert_eq!(err.kind, BackendErrorKind::Malformed);
    }
}
