//! Pipedeck Store
//!
//! The pipeline hierarchy manager. Keeps the Pipeline → Stage → Field
//! hierarchy consistent on top of an abstract relational [`Backend`]:
//!
//! - [`store`]: per-level stores ([`PipelineStore`], [`StageStore`], [`FieldStore`])
//! - [`plan`]: cascading deletes as explicit, ordered [`DeletePlan`]s
//! - [`coordinator`]: cross-level actions and the caller-owned [`Selection`]
//! - [`backend`]: the backend trait and the in-process [`MemoryBackend`]
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pipedeck_store::{Coordinator, MemoryBackend, Selection};
//!
//! # async fn example() -> pipedeck_store::Result<()> {
//! let coordinator = Coordinator::new(Arc::new(MemoryBackend::new()));
//! let mut selection = Selection::default();
//!
//! let sales = coordinator.add_pipeline(&mut selection, "Sales").await?;
//! coordinator.select_pipeline(&mut selection, Some(sales.id)).await?;
//! coordinator.add_stage(&mut selection, sales.id, "Lead").await?;
//! assert_eq!(selection.stages().len(), 1);
//!
//! coordinator.delete_pipeline(&mut selection, sales.id).await?;
//! assert!(selection.pipelines().is_empty());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod coordinator;
pub mod error;
pub mod plan;
pub mod schema;
pub mod store;

pub use backend::memory::{MemoryBackend, Operation};
pub use backend::{Backend, Filter, Record};
pub use coordinator::{Coordinator, Selection};
pub use error::{BackendError, BackendErrorKind, Result};
pub use plan::{DeletePlan, DeleteStep};
pub use schema::Table;
pub use store::{FieldStore, PipelineStore, StageStore};
