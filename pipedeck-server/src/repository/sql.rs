//! SQL statement builders
//!
//! Statements are generated per table from the column whitelist in
//! [`Table`]. Values never appear in the SQL text: the filter and the
//! record/patch are bound as JSONB and expanded with
//! `jsonb_populate_record`, which gives every value its column's type so
//! comparisons stay typed and indexes on key columns apply.
//!
//! Bind order: `$1` is the filter object (select, update, delete) or the
//! record (insert); `$2` is the patch (update).

use pipedeck_store::schema::CREATED_AT;
use pipedeck_store::{BackendError, Filter, Record, Result, Table};

/// `SELECT` returning each row as one JSONB value, oldest first
pub fn select(table: Table, filter: &Filter) -> Result<String> {
    Ok(format!(
        "SELECT to_jsonb(t) FROM {name} AS t, jsonb_populate_record(NULL::{name}, $1) AS f \
         WHERE {predicate} ORDER BY t.{created_at}, t.{key}",
        name = table.name(),
        predicate = predicate(table, filter)?,
        created_at = CREATED_AT,
        key = table.key(),
    ))
}

/// `INSERT` of one complete row, returning it
pub fn insert(table: Table) -> String {
    format!(
        "INSERT INTO {name} AS t SELECT * FROM jsonb_populate_record(NULL::{name}, $1) \
         RETURNING to_jsonb(t)",
        name = table.name(),
    )
}

/// `UPDATE` of the columns present in `patch`, returning the updated rows
pub fn update(table: Table, filter: &Filter, patch: &Record) -> Result<String> {
    if patch.is_empty() {
        return Err(BackendError::malformed(format!(
            "update on {} has nothing to set",
            table
        )));
    }

    let mut assignments = Vec::with_capacity(patch.len());
    for column in patch.keys() {
        if !table.has_column(column) {
            return Err(BackendError::malformed(format!(
                "column '{}' does not exist on {}",
                column, table
            )));
        }
        if column == table.key() {
            return Err(BackendError::constraint(format!(
                "column '{}' of {} is immutable",
                column, table
            )));
        }
        assignments.push(format!("{column} = p.{column}"));
    }

    Ok(format!(
        "UPDATE {name} AS t SET {assignments} \
         FROM jsonb_populate_record(NULL::{name}, $1) AS f, \
         jsonb_populate_record(NULL::{name}, $2) AS p \
         WHERE {predicate} RETURNING to_jsonb(t)",
        name = table.name(),
        assignments = assignments.join(", "),
        predicate = predicate(table, filter)?,
    ))
}

/// `DELETE` of the rows matching `filter`
pub fn delete(table: Table, filter: &Filter) -> Result<String> {
    Ok(format!(
        "DELETE FROM {name} AS t USING jsonb_populate_record(NULL::{name}, $1) AS f \
         WHERE {predicate}",
        name = table.name(),
        predicate = predicate(table, filter)?,
    ))
}

/// `t.a = f.a AND t.b = f.b`, or `TRUE` for an empty filter
fn predicate(table: Table, filter: &Filter) -> Result<String> {
    filter.check_columns(table)?;

    if filter.is_empty() {
        return Ok("TRUE".to_string());
    }

    Ok(filter
        .conditions()
        .iter()
        .map(|(column, _)| format!("t.{column} = f.{column}"))
        .collect::<Vec<_>>()
        .join(" AND "))
}
