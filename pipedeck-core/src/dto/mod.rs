//! Data Transfer Objects
//!
//! Request bodies accepted by the server and the nested hierarchy view it
//! returns. DTOs carry only what the caller controls; identifiers and
//! timestamps are assigned by the store.

pub mod field;
pub mod pipeline;
pub mod stage;
pub mod tree;
