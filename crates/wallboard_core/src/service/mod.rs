//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls and pipeline stages into one wallboard run.
//! - Keep the CLI host decoupled from storage and rendering details.

pub mod wallboard_service;
