//! Core domain types
//!
//! The sales-pipeline configuration is a three-level hierarchy:
//! a [`Pipeline`](pipeline::Pipeline) owns [`Stage`](stage::Stage)s, and each
//! stage owns [`Field`](field::Field)s. Children always reference an existing
//! parent; the store layer keeps it that way when deleting.

pub mod field;
pub mod pipeline;
pub mod stage;
