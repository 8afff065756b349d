//! Database operations for form submissions.
//!
//! Every function takes a [`FormKind`] and targets that form's table. Table
//! names come from the static registry, never from request input, so the
//! formatted SQL below cannot carry user-controlled identifiers.

use rusqlite::{params, Connection, Row};

use crate::error::{AppError, AppResult};
use crate::forms::FormKind;
use crate::models::{ReviewStatus, ReviewUpdateRequest, Submission, SubmissionFields, SubmissionSummary};

/// Column list shared by every full-row SELECT.
const SUBMISSION_COLUMNS: &str = "id, policy_title, review_date, upload_date, reviewed_by, \
     review_status, comments, user_id, uploaded_by, submission_time, modified_on, modified_by, \
     file_name, file_id";

/// Raw row as stored; review_status is validated during conversion.
struct SubmissionRow {
    id: i64,
    policy_title: Option<String>,
    review_date: Option<String>,
    upload_date: Option<String>,
    reviewed_by: Option<String>,
    review_status: String,
    comments: Option<String>,
    user_id: String,
    uploaded_by: Option<String>,
    submission_time: Option<String>,
    modified_on: Option<String>,
    modified_by: Option<String>,
    file_name: Option<String>,
    file_id: Option<String>,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<SubmissionRow> {
    Ok(SubmissionRow {
        id: row.get(0)?,
        policy_title: row.get(1)?,
        review_date: row.get(2)?,
        upload_date: row.get(3)?,
        reviewed_by: row.get(4)?,
        review_status: row.get(5)?,
        comments: row.get(6)?,
        user_id: row.get(7)?,
        uploaded_by: row.get(8)?,
        submission_time: row.get(9)?,
        modified_on: row.get(10)?,
        modified_by: row.get(11)?,
        file_name: row.get(12)?,
        file_id: row.get(13)?,
    })
}

fn row_to_submission(row: SubmissionRow) -> AppResult<Submission> {
    let review_status = ReviewStatus::parse(&row.review_status).ok_or_else(|| {
        AppError::Database(format!(
            "Row {} has unrecognized review status '{}'",
            row.id, row.review_status
        ))
    })?;

    Ok(Submission {
        id: row.id,
        policy_title: row.policy_title,
        review_date: row.review_date,
        upload_date: row.upload_date,
        reviewed_by: row.reviewed_by,
        review_status,
        comments: row.comments,
        user_id: row.user_id,
        uploaded_by: row.uploaded_by,
        submission_time: row.submission_time,
        modified_on: row.modified_on,
        modified_by: row.modified_by,
        file_name: row.file_name,
        file_id: row.file_id,
    })
}

fn query_optional(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Option<Submission>> {
    let result = conn.query_row(sql, params, read_row);
    match result {
        Ok(row) => Ok(Some(row_to_submission(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}

/// Insert a fresh submission row with status "review". Returns the row id.
pub fn insert_submission(
    conn: &Connection,
    kind: FormKind,
    user_id: &str,
    username: &str,
    fields: &SubmissionFields,
    file: Option<(&str, &str)>,
    now: &str,
) -> AppResult<i64> {
    let (file_id, file_name) = match file {
        Some((id, name)) => (Some(id), Some(name)),
        None => (None, None),
    };

    let sql = format!(
        "INSERT INTO {}
         (policy_title, review_date, upload_date, reviewed_by, review_status, comments, user_id,
          uploaded_by, submission_time, modified_on, modified_by, file_id, file_name)
         VALUES (?1, NULL, ?2, '', ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        kind.table()
    );

    conn.execute(
        &sql,
        params![
            fields.policy_title,
            now,
            ReviewStatus::UnderReview.as_str(),
            fields.comments,
            user_id,
            username,
            now,
            now,
            username,
            file_id,
            file_name,
        ],
    )
    .map_err(|e| AppError::Database(format!("Failed to insert submission: {}", e)))?;

    Ok(conn.last_insert_rowid())
}

/// Find the caller's open "Needs revision" row, if any.
pub fn find_needs_revision(
    conn: &Connection,
    kind: FormKind,
    user_id: &str,
) -> AppResult<Option<Submission>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE user_id = ?1 AND review_status = ?2",
        SUBMISSION_COLUMNS,
        kind.table()
    );
    query_optional(conn, &sql, params![user_id, ReviewStatus::NeedsRevision.as_str()])
}

/// Update an open draft in place, returning it to "review".
///
/// When `file` is None the existing file reference is left untouched.
pub fn update_revision(
    conn: &Connection,
    kind: FormKind,
    row_id: i64,
    fields: &SubmissionFields,
    file: Option<(&str, &str)>,
    username: &str,
    now: &str,
) -> AppResult<()> {
    let rows = match file {
        Some((file_id, file_name)) => {
            let sql = format!(
                "UPDATE {}
                 SET policy_title = ?1, comments = ?2, review_status = ?3, file_id = ?4,
                     file_name = ?5, modified_on = ?6, modified_by = ?7
                 WHERE id = ?8",
                kind.table()
            );
            conn.execute(
                &sql,
                params![
                    fields.policy_title,
                    fields.comments,
                    ReviewStatus::UnderReview.as_str(),
                    file_id,
                    file_name,
                    now,
                    username,
                    row_id,
                ],
            )
        }
        None => {
            let sql = format!(
                "UPDATE {}
                 SET policy_title = ?1, comments = ?2, review_status = ?3, modified_on = ?4,
                     modified_by = ?5
                 WHERE id = ?6",
                kind.table()
            );
            conn.execute(
                &sql,
                params![
                    fields.policy_title,
                    fields.comments,
                    ReviewStatus::UnderReview.as_str(),
                    now,
                    username,
                    row_id,
                ],
            )
        }
    }
    .map_err(|e| AppError::Database(format!("Failed to update submission: {}", e)))?;

    if rows == 0 {
        return Err(AppError::NotFound("Submission".to_string()));
    }
    Ok(())
}

/// List the caller's submissions as summaries, in storage order.
pub fn list_for_user(
    conn: &Connection,
    kind: FormKind,
    user_id: &str,
) -> AppResult<Vec<SubmissionSummary>> {
    let sql = format!(
        "SELECT id, policy_title, submission_time FROM {} WHERE user_id = ?1",
        kind.table()
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| AppError::Database(e.to_string()))?;

    let summaries = stmt
        .query_map([user_id], |row| {
            Ok(SubmissionSummary {
                id: row.get(0)?,
                policy_title: row.get(1)?,
                submission_time: row.get(2)?,
            })
        })
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(summaries)
}

/// Get one submission by id, owner-checked.
pub fn get_by_id_for_user(
    conn: &Connection,
    kind: FormKind,
    id: i64,
    user_id: &str,
) -> AppResult<Option<Submission>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1 AND user_id = ?2",
        SUBMISSION_COLUMNS,
        kind.table()
    );
    query_optional(conn, &sql, params![id, user_id])
}

/// Latest submission by submission_time, scoped to the caller.
pub fn last_for_user(
    conn: &Connection,
    kind: FormKind,
    user_id: &str,
) -> AppResult<Option<Submission>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE user_id = ?1 ORDER BY submission_time DESC LIMIT 1",
        SUBMISSION_COLUMNS,
        kind.table()
    );
    query_optional(conn, &sql, params![user_id])
}

/// Full-table dump for the extract endpoint. Not ownership-scoped.
pub fn extract_all(conn: &Connection, kind: FormKind) -> AppResult<Vec<Submission>> {
    let sql = format!("SELECT {} FROM {}", SUBMISSION_COLUMNS, kind.table());
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| AppError::Database(e.to_string()))?;

    let rows = stmt
        .query_map([], read_row)
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    rows.into_iter().map(row_to_submission).collect()
}

/// Reviewer update of the review fields by id. No ownership check; callers
/// are expected to have already validated the status string.
pub fn review_update(
    conn: &Connection,
    kind: FormKind,
    id: i64,
    update: &ReviewUpdateRequest,
    status: ReviewStatus,
) -> AppResult<()> {
    let sql = format!(
        "UPDATE {}
         SET policy_title = ?1, review_date = ?2, review_status = ?3, comments = ?4,
             reviewed_by = ?5
         WHERE id = ?6",
        kind.table()
    );

    let rows = conn
        .execute(
            &sql,
            params![
                update.policy_title,
                update.review_date,
                status.as_str(),
                update.comments,
                update.reviewed_by,
                id,
            ],
        )
        .map_err(|e| AppError::Database(format!("Failed to update submission: {}", e)))?;

    if rows == 0 {
        return Err(AppError::NotFound("Submission".to_string()));
    }
    Ok(())
}
