//! Repository layer: host collaborator contracts and their SQLite backend.
//!
//! # Responsibility
//! - Define the document store and notifier contracts used by the pipeline.
//! - Isolate SQLite query details from the wallboard service.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod document_store;
pub mod sqlite_store;
