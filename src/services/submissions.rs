//! The create-or-revise submission workflow.
//!
//! A submission either opens a fresh row in the form's table or, when the
//! caller has a row sent back as "Needs revision", updates that row in
//! place and returns it to review. The attached file's lifecycle is managed
//! alongside: new bytes are committed to the store before any row is
//! written, and superseded bytes are deleted only after the row points at
//! the replacement. A crash between those steps can orphan a file; there is
//! no transaction spanning disk and database.

use std::path::PathBuf;

use chrono::Utc;
use tracing::info;

use crate::db::{file_info, submissions, users, DbPool};
use crate::error::AppResult;
use crate::forms::FormKind;
use crate::models::SubmissionFields;
use crate::services::FileStore;

/// An upload staged to a temp path by the multipart handler, not yet
/// committed under a file id.
#[derive(Debug)]
pub struct StagedUpload {
    pub staged_path: PathBuf,
    pub original_name: String,
}

/// Submit a form: create a new row, or revise the caller's open draft.
/// Returns the id of the row that was written.
pub async fn create_or_revise(
    pool: &DbPool,
    store: &FileStore,
    kind: FormKind,
    user_id: &str,
    fields: &SubmissionFields,
    upload: Option<StagedUpload>,
) -> AppResult<i64> {
    // Commit the upload first so the row's file reference is always valid
    // once the row exists.
    let committed = match upload {
        Some(staged) => {
            let file_id = match store.commit(&staged.staged_path, &staged.original_name).await {
                Ok(id) => id,
                Err(e) => {
                    store.discard(&staged.staged_path).await;
                    return Err(e);
                }
            };
            Some((file_id, staged.original_name))
        }
        None => None,
    };

    let file_ref = committed
        .as_ref()
        .map(|(id, name)| (id.as_str(), name.as_str()));
    let now = Utc::now().to_rfc3339();

    // Row + file_info writes under one connection guard; the superseded
    // file (if any) is deleted after the guard is released.
    let (row_id, superseded) = {
        let conn = pool.connection();
        let username = users::get_username(&conn, user_id)?;

        match submissions::find_needs_revision(&conn, kind, user_id)? {
            Some(draft) => {
                submissions::update_revision(
                    &conn, kind, draft.id, fields, file_ref, &username, &now,
                )?;

                let superseded = if let Some((file_id, file_name)) = file_ref {
                    file_info::replace_for_submission(
                        &conn, file_id, file_name, user_id, kind, draft.id,
                    )?;
                    draft.file_id.zip(draft.file_name)
                } else {
                    None
                };

                info!(
                    form = kind.name(),
                    row_id = draft.id,
                    "Revised submission returned to review"
                );
                (draft.id, superseded)
            }
            None => {
                let row_id = submissions::insert_submission(
                    &conn, kind, user_id, &username, fields, file_ref, &now,
                )?;

                if let Some((file_id, file_name)) = file_ref {
                    file_info::insert(&conn, file_id, file_name, user_id, kind, row_id)?;
                }

                info!(form = kind.name(), row_id, "New submission created");
                (row_id, None)
            }
        }
    };

    // Old bytes go only after the new ones are confirmed written and the
    // row points at them.
    if let Some((old_id, old_name)) = superseded {
        store.delete(&old_id, &old_name).await;
    }

    Ok(row_id)
}
