//! Self-describing settings table stored inside a wallboard document.
//!
//! # Responsibility
//! - Parse the `|<Label>|<value>|` directives into typed [`Settings`].
//! - Serialize settings back so the regenerated document stays minimal.
//!
//! [`Settings`]: crate::model::settings::Settings

pub mod parser;
pub mod serializer;

pub use parser::parse_settings;
pub use serializer::serialize_settings;
