//! Pipedeck Core
//!
//! Core types shared by every Pipedeck crate.
//!
//! This crate contains:
//! - Domain types: the pipeline hierarchy entities (Pipeline, Stage, Field)
//! - DTOs: request bodies and the nested hierarchy view exchanged over HTTP

pub mod domain;
pub mod dto;
