//! Repository Module
//!
//! Data access layer for the server: the PostgreSQL implementation of the
//! hierarchy [`Backend`](pipedeck_store::Backend).

pub mod postgres;
pub mod sql;

pub use postgres::PgBackend;
