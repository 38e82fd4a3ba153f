//! Note aggregation: the only wallboard stage that talks to the store.
//!
//! # Responsibility
//! - Fetch every group's matching documents and build one `Note` per match.
//! - Fetch task counters only when `+progress` was requested.
//! - Hand each group to the sorter before it lands in `Groups`.
//!
//! # Invariants
//! - Groups are fetched concurrently and keyed in declaration order.
//! - Notes inside a group keep fetch-result order until sorted.
//! - The first failing fetch fails the whole aggregation.

use crate::model::atom::AtomId;
use crate::model::note::{Groups, Note};
use crate::model::settings::Settings;
use crate::repo::document_store::{DocumentHandle, DocumentStore, StoreResult, TagFilter};
use crate::wallboard::fields::{extract_image, extract_inline_fields};
use crate::wallboard::sort::sort_notes;
use futures_util::future::try_join_all;
use log::{debug, error};
use std::time::Instant;

/// Builds the sorted notes of every group tag under `query_tag`.
///
/// # Errors
/// - Propagates the first store failure of any group or note.
pub async fn aggregate<S>(
    store: &S,
    query_tag: &str,
    group_tags: &[String],
    settings: &Settings,
) -> StoreResult<Groups>
where
    S: DocumentStore + ?Sized,
{
    let with_progress = settings.requests_progress();
    let fetches = group_tags
        .iter()
        .map(|group_tag| fetch_group(store, query_tag, group_tag, settings, with_progress));
    let fetched = try_join_all(fetches).await?;

    let mut groups = Groups::with_capacity(fetched.len());
    for (group_tag, notes) in group_tags.iter().zip(fetched) {
        groups.insert(group_tag.clone(), notes);
    }
    Ok(groups)
}

async fn fetch_group<S>(
    store: &S,
    query_tag: &str,
    group_tag: &str,
    settings: &Settings,
    with_progress: bool,
) -> StoreResult<Vec<Note>>
where
    S: DocumentStore + ?Sized,
{
    let started_at = Instant::now();
    let filter = TagFilter::for_group(query_tag, group_tag);

    let result = async {
        let handles = store.filter_by_tags(&filter).await?;
        try_join_all(
            handles
                .into_iter()
                .map(|handle| build_note(store, handle, with_progress)),
        )
        .await
    }
    .await;

    match result {
        Ok(notes) => {
            debug!(
                "event=group_fetch module=wallboard status=ok group={} notes={} duration_ms={}",
                group_tag,
                notes.len(),
                started_at.elapsed().as_millis()
            );
            Ok(sort_notes(
                notes,
                settings.sort_by.as_deref(),
                settings.sort_order,
            ))
        }
        Err(err) => {
            error!(
                "event=group_fetch module=wallboard status=error group={} duration_ms={} error={}",
                group_tag,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

async fn build_note<S>(store: &S, handle: DocumentHandle, with_progress: bool) -> StoreResult<Note>
where
    S: DocumentStore + ?Sized,
{
    let content = store.fetch_content(handle.id).await?;
    let mut note = Note::new(handle.id, handle.name);
    note.inline_fields = extract_inline_fields(&content);
    note.image = extract_image(&content);

    if with_progress {
        let (total, completed) = task_counts(store, handle.id).await?;
        note.total_tasks = total;
        note.completed_tasks = completed;
    }
    Ok(note)
}

async fn task_counts<S>(store: &S, id: AtomId) -> StoreResult<(usize, usize)>
where
    S: DocumentStore + ?Sized,
{
    let tasks = store.fetch_tasks(id, true).await?;
    let completed = tasks.iter().filter(|task| task.is_completed()).count();
    Ok((tasks.len(), completed))
}
