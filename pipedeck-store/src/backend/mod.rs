//! Backend abstraction
//!
//! The stores talk to a relational backend through four table-level
//! operations. Records are JSON objects keyed by column name, the same shape
//! a REST query client hands back, so any relational store can sit behind
//! the trait.
//!
//! All backends are trait-based to enable testing and swapping the storage.

pub mod memory;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{BackendError, Result};
use crate::schema::Table;

/// One table row, keyed by column name
pub type Record = serde_json::Map<String, Value>;

/// Conjunction of column-equality conditions
///
/// An empty filter matches every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Matches every row
    pub fn all() -> Self {
        Self::default()
    }

    /// Matches rows whose `column` equals `value`
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Self::all().and_eq(column, value)
    }

    /// Adds another equality condition
    pub fn and_eq(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.conditions.push((column.to_string(), value.into()));
        self
    }

    pub fn conditions(&self) -> &[(String, Value)] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Whether `record` satisfies every condition
    pub fn matches(&self, record: &Record) -> bool {
        self.conditions
            .iter()
            .all(|(column, value)| record.get(column) == Some(value))
    }

    /// Rejects conditions on columns the table does not have
    pub fn check_columns(&self, table: Table) -> Result<()> {
        for (column, _) in &self.conditions {
            if !table.has_column(column) {
                return Err(BackendError::malformed(format!(
                    "column '{}' does not exist on {}",
                    column, table
                )));
            }
        }
        Ok(())
    }

    /// Conditions as a single JSON object
    pub fn to_record(&self) -> Record {
        self.conditions.iter().cloned().collect()
    }
}

/// Table-level operations offered by a relational backend
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the rows matching `filter`, in creation order
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Record>>;

    /// Inserts a complete row and returns it as stored
    async fn insert(&self, table: Table, record: Record) -> Result<Record>;

    /// Applies `patch` to every row matching `filter` and returns the updated rows
    async fn update(&self, table: Table, filter: &Filter, patch: Record) -> Result<Vec<Record>>;

    /// Deletes every row matching `filter` and returns how many were removed
    async fn delete(&self, table: Table, filter: &Filter) -> Result<u64>;
}
