//! Store Module
//!
//! One store per level of the hierarchy. Stores are stateless handles over a
//! shared [`Backend`](crate::backend::Backend); they translate typed calls
//! into table requests and decode rows back into domain types.

pub mod field;
pub mod pipeline;
pub mod stage;

pub use field::FieldStore;
pub use pipeline::PipelineStore;
pub use stage::StageStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::Record;
use crate::error::{BackendError, Result};
use crate::schema::Table;

/// Serializes a row type into a backend record
fn to_record<T: Serialize>(table: Table, row: &T) -> Result<Record> {
    match serde_json::to_value(row) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(BackendError::malformed(format!(
            "{} row serialized to non-object {}",
            table, other
        ))),
        Err(e) => Err(BackendError::malformed(format!(
            "failed to encode {} row: {}",
            table, e
        ))),
    }
}

/// Decodes a backend record into a row type
fn from_record<T: DeserializeOwned>(table: Table, record: Record) -> Result<T> {
    serde_json::from_value(Value::Object(record))
        .map_err(|e| BackendError::malformed(format!("failed to decode {} row: {}", table, e)))
}

/// Decodes the single row an update by key returned
fn expect_one<T: DeserializeOwned>(table: Table, id: uuid::Uuid, rows: Vec<Record>) -> Result<T> {
    match rows.into_iter().next() {
        Some(record) => from_record(table, record),
        None => Err(BackendError::not_found(format!(
            "{} row {} does not exist",
            table, id
        ))),
    }
}
