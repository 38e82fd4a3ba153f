//! Wallboard pipeline stages.
//!
//! # Responsibility
//! - Extract inline fields and images from document text (`fields`).
//! - Aggregate, sort and compute per-note data (`aggregate`, `sort`, `computed`).
//! - Render groups as gallery or table markdown (`render`).

pub mod aggregate;
pub mod computed;
pub mod fields;
pub mod render;
pub mod sort;
