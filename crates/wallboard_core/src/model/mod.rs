//! Domain model for wallboard rendering.
//!
//! # Responsibility
//! - Define the stored document shape used by the document store.
//! - Define the immutable values flowing through the wallboard pipeline.
//!
//! # Invariants
//! - Every stored document is identified by a stable `AtomId`.
//! - Pipeline values are derived with struct update syntax, never mutated
//!   in place once handed to the sorter or renderers.

pub mod atom;
pub mod note;
pub mod settings;
