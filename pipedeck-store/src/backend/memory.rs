//! In-memory backend
//!
//! Keeps every table as a vector of records guarded by a mutex. It enforces
//! the same rules a relational database would for this schema: unique
//! non-null keys, immutable keys, foreign keys checked on insert/update and
//! RESTRICT on delete. Each statement is atomic: a rejected update or delete
//! leaves the table untouched.
//!
//! Failures can be injected per (operation, table) to exercise error paths.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::backend::{Backend, Filter, Record};
use crate::error::{BackendError, Result};
use crate::schema::Table;

/// Backend operation, used to target injected failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

#[derive(Debug)]
struct InjectedFailure {
    /// Calls that still succeed before the failure kicks in
    passes: usize,
    error: BackendError,
}

#[derive(Debug, Default)]
struct MemoryState {
    tables: HashMap<Table, Vec<Record>>,
    failures: HashMap<(Operation, Table), InjectedFailure>,
}

impl MemoryState {
    fn rows(&self, table: Table) -> &[Record] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or(&[])
    }

    fn rows_mut(&mut self, table: Table) -> &mut Vec<Record> {
        self.tables.entry(table).or_default()
    }

    fn injected(&mut self, operation: Operation, table: Table) -> Result<()> {
        match self.failures.get_mut(&(operation, table)) {
            Some(failure) if failure.passes > 0 => {
                failure.passes -= 1;
                Ok(())
            }
            Some(failure) => Err(failure.error.clone()),
            None => Ok(()),
        }
    }

    fn key_exists(&self, table: Table, key: &Value) -> bool {
        self.rows(table)
            .iter()
            .any(|row| row.get(table.key()) == Some(key))
    }

    /// Verifies the row's parent reference, if the table has one
    fn check_parent(&self, table: Table, record: &Record) -> Result<()> {
        let Some(fk) = table.foreign_key() else {
            return Ok(());
        };

        match record.get(fk.column) {
            None | Some(Value::Null) => Err(BackendError::constraint(format!(
                "null value in column '{}' of {}",
                fk.column, table
            ))),
            Some(value) if !self.key_exists(fk.references, value) => {
                Err(BackendError::constraint(format!(
                    "insert or update on {} violates foreign key '{}': {} {} does not exist",
                    table, fk.column, fk.references, value
                )))
            }
            Some(_) => Ok(()),
        }
    }

    /// Verifies no child row still references `record`
    fn check_no_children(&self, table: Table, record: &Record) -> Result<()> {
        let Some(key) = record.get(table.key()) else {
            return Ok(());
        };

        for (child, fk) in table.children() {
            if self.rows(child).iter().any(|row| row.get(fk.column) == Some(key)) {
                return Err(BackendError::constraint(format!(
                    "delete on {} violates foreign key '{}' on {}: {} is still referenced",
                    table, fk.column, child, key
                )));
            }
        }

        Ok(())
    }
}

fn check_record_columns(table: Table, record: &Record) -> Result<()> {
    for column in record.keys() {
        if !table.has_column(column) {
            return Err(BackendError::malformed(format!(
                "column '{}' does not exist on {}",
                column, table
            )));
        }
    }
    Ok(())
}

/// In-process implementation of [`Backend`]
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Creates an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every `operation` on `table` fail with `error` until cleared
    pub fn fail_on(&self, operation: Operation, table: Table, error: BackendError) {
        self.fail_after(operation, table, 0, error);
    }

    /// Lets `passes` calls of `operation` on `table` succeed, then fails
    /// every following one with `error` until cleared
    pub fn fail_after(
        &self,
        operation: Operation,
        table: Table,
        passes: usize,
        error: BackendError,
    ) {
        if let Ok(mut state) = self.state.lock() {
            state
                .failures
                .insert((operation, table), InjectedFailure { passes, error });
        }
    }

    /// Removes all injected failures
    pub fn clear_failures(&self) {
        if let Ok(mut state) = self.state.lock() {
            state.failures.clear();
        }
    }

    /// Number of rows currently stored in `table`
    pub fn row_count(&self, table: Table) -> usize {
        self.state
            .lock()
            .map(|state| state.rows(table).len())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| BackendError::transport("memory backend state is poisoned"))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn select(&self, table: Table, filter: &Filter) -> Result<Vec<Record>> {
        let mut state = self.lock()?;
        state.injected(Operation::Select, table)?;
        filter.check_columns(table)?;

        Ok(state
            .rows(table)
            .iter()
            .filter(|row| filter.matches(row))
            .cloned()
            .collect())
    }

    async fn insert(&self, table: Table, record: Record) -> Result<Record> {
        let mut state = self.lock()?;
        state.injected(Operation::Insert, table)?;
        check_record_columns(table, &record)?;

        let key = match record.get(table.key()) {
            None | Some(Value::Null) => {
                return Err(BackendError::constraint(format!(
                    "null value in column '{}' of {}",
                    table.key(),
                    table
                )));
            }
            Some(key) => key,
        };

        if state.key_exists(table, key) {
            return Err(BackendError::constraint(format!(
                "duplicate key value {} violates primary key of {}",
                key, table
            )));
        }

        state.check_parent(table, &record)?;
        state.rows_mut(table).push(record.clone());

        Ok(record)
    }

    async fn update(&self, table: Table, filter: &Filter, patch: Record) -> Result<Vec<Record>> {
        let mut state = self.lock()?;
        state.injected(Operation::Update, table)?;
        filter.check_columns(table)?;
        check_record_columns(table, &patch)?;

        let mut updated = Vec::new();
        for row in state.rows(table).iter().filter(|row| filter.matches(row)) {
            let mut next = row.clone();
            for (column, value) in &patch {
                if column == table.key() && row.get(column) != Some(value) {
                    return Err(BackendError::constraint(format!(
                        "column '{}' of {} is immutable",
                        column, table
                    )));
                }
                next.insert(column.clone(), value.clone());
            }
            state.check_parent(table, &next)?;
            updated.push(next);
        }

        for next in &updated {
            let key = next.get(table.key());
            if let Some(row) = state
                .rows_mut(table)
                .iter_mut()
                .find(|row| row.get(table.key()) == key)
            {
                *row = next.clone();
            }
        }

        Ok(updated)
    }

    async fn delete(&self, table: Table, filter: &Filter) -> Result<u64> {
        let mut state = self.lock()?;
        state.injected(Operation::Delete, table)?;
        filter.check_columns(table)?;

        for row in state.rows(table).iter().filter(|row| filter.matches(row)) {
            state.check_no_children(table, row)?;
        }

        let rows = state.rows_mut(table);
        let before = rows.len();
        rows.retain(|row| !filter.matches(row));

        Ok((before - rows.len()) as u64)
    }
}
