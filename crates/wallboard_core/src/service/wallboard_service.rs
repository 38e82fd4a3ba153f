//! Wallboard run use-case.
//!
//! # Responsibility
//! - Regenerate one wallboard document from its own settings table.
//! - Enforce the required-settings precondition before any aggregation.
//! - Write the rendered groups plus the minimal settings table back once.
//!
//! # Invariants
//! - A missing `Query Tag` or `Group By Tags` raises exactly one user alert
//!   and issues no tag query, task fetch or replacement.
//! - `replace_content` is called at most once per run.
//! - Any store failure during aggregation fails the run and writes nothing.

use crate::config::WallboardDefaults;
use crate::model::atom::AtomId;
use crate::repo::document_store::{DocumentStore, Notifier, StoreError};
use crate::settings::{parse_settings, serialize_settings};
use crate::wallboard::aggregate::aggregate;
use crate::wallboard::render::render_groups;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Separator between the rendered groups and the settings table.
pub const SETTINGS_RULE: &str = "\n\n---\n\n";

/// Service error for wallboard runs.
#[derive(Debug)]
pub enum WallboardError {
    /// Reading the wallboard, aggregating or writing back failed.
    Store(StoreError),
}

impl Display for WallboardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "wallboard run failed: {err}"),
        }
    }
}

impl Error for WallboardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for WallboardError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Result of one run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The document was overwritten with `content`.
    Replaced { content: String },
    /// `content` was rendered but not written.
    Rendered { content: String },
    /// A required directive was missing; the user was alerted with `reason`.
    Aborted { reason: String },
}

/// Wallboard service facade over a document store and a notifier.
pub struct WallboardService<S: DocumentStore, N: Notifier> {
    store: S,
    notifier: N,
    defaults: WallboardDefaults,
}

impl<S: DocumentStore, N: Notifier> WallboardService<S, N> {
    /// Creates a service using the provided collaborators.
    pub fn new(store: S, notifier: N, defaults: WallboardDefaults) -> Self {
        Self {
            store,
            notifier,
            defaults,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Regenerates `note_id` from its current content and writes it back.
    pub async fn run(&self, note_id: AtomId) -> Result<RunOutcome, WallboardError> {
        let text = self.store.fetch_content(note_id).await?;
        self.run_with_content(note_id, &text).await
    }

    /// Same as [`Self::run`] for a host that already holds the document text.
    pub async fn run_with_content(
        &self,
        note_id: AtomId,
        text: &str,
    ) -> Result<RunOutcome, WallboardError> {
        self.execute(note_id, text, true).await
    }

    /// Renders `note_id` without writing anything back.
    pub async fn preview(&self, note_id: AtomId) -> Result<RunOutcome, WallboardError> {
        let text = self.store.fetch_content(note_id).await?;
        self.execute(note_id, &text, false).await
    }

    async fn execute(
        &self,
        note_id: AtomId,
        text: &str,
        write_back: bool,
    ) -> Result<RunOutcome, WallboardError> {
        let started_at = Instant::now();
        info!(
            "event=wallboard_run module=wallboard status=start note={} write_back={}",
            note_id, write_back
        );

        let settings = parse_settings(text, &self.defaults);
        let required = match settings.required() {
            Ok(required) => required,
            Err(missing_label) => {
                let reason = format!("{missing_label} setting must exist");
                self.notifier.notify_user(&reason);
                info!(
                    "event=wallboard_run module=wallboard status=aborted note={} missing={} duration_ms={}",
                    note_id,
                    missing_label,
                    started_at.elapsed().as_millis()
                );
                return Ok(RunOutcome::Aborted { reason });
            }
        };

        let result = async {
            let groups = aggregate(
                &self.store,
                required.query_tag,
                required.group_tags,
                &settings,
            )
            .await?;
            let content = compose_document(
                &render_groups(&settings, &groups),
                &serialize_settings(&settings, &self.defaults),
            );
            if write_back {
                self.store.replace_content(note_id, &content).await?;
            }
            Ok::<_, StoreError>((groups.len(), content))
        }
        .await;

        match result {
            Ok((group_count, content)) => {
                info!(
                    "event=wallboard_run module=wallboard status=ok note={} groups={} bytes={} duration_ms={}",
                    note_id,
                    group_count,
                    content.len(),
                    started_at.elapsed().as_millis()
                );
                if write_back {
                    Ok(RunOutcome::Replaced { content })
                } else {
                    Ok(RunOutcome::Rendered { content })
                }
            }
            Err(err) => {
                error!(
                    "event=wallboard_run module=wallboard status=error note={} duration_ms={} error={}",
                    note_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err.into())
            }
        }
    }
}

/// Joins the rendered body and the settings table around a horizontal rule.
pub fn compose_document(body: &str, settings_table: &str) -> String {
    format!("{body}{SETTINGS_RULE}{settings_table}")
}
