//! Core domain logic for wallboard rendering.
//! This crate is the single source of truth for settings, aggregation and
//! layout invariants; hosts only supply a document store and a notifier.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod settings;
pub mod wallboard;

pub use config::{ConfigError, WallboardDefaults};
pub use logging::{default_log_level, init_logging, LogLevel, LoggingError};
pub use model::atom::{Atom, AtomId, AtomType, AtomValidationError, TaskStatus};
pub use model::note::{Groups, Image, InlineField, Note};
pub use model::settings::{DisplayAs, Settings, SortOrder};
pub use repo::document_store::{
    DocumentHandle, DocumentStore, Notifier, StoreError, StoreResult, TagFilter, TaskRecord,
};
pub use repo::sqlite_store::SqliteDocumentStore;
pub use service::wallboard_service::{RunOutcome, WallboardError, WallboardService};
pub use settings::{parse_settings, serialize_settings};
