//! Database operations for the `file_info` attachment side table.
//!
//! Each row binds a generated file id to its original filename, owning user,
//! and the submission row it belongs to. Downloads are resolved through this
//! table, which is what enforces ownership.

use rusqlite::{params, Connection};

use crate::error::{AppError, AppResult};
use crate::forms::FormKind;
use crate::models::FileInfo;

/// Record a freshly uploaded file against its submission row.
pub fn insert(
    conn: &Connection,
    file_id: &str,
    original_filename: &str,
    user_id: &str,
    kind: FormKind,
    form_id: i64,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO file_info (file_id, original_filename, user_id, form_id, form_type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![file_id, original_filename, user_id, form_id, kind.table()],
    )
    .map_err(|e| AppError::Database(format!("Failed to insert file info: {}", e)))?;

    Ok(())
}

/// Point a submission's file_info row at a replacement file.
///
/// Falls back to an insert when the row had no attachment before, so a
/// revise that adds a first file still ends up tracked.
pub fn replace_for_submission(
    conn: &Connection,
    file_id: &str,
    original_filename: &str,
    user_id: &str,
    kind: FormKind,
    form_id: i64,
) -> AppResult<()> {
    let rows = conn
        .execute(
            "UPDATE file_info SET file_id = ?1, original_filename = ?2
             WHERE form_id = ?3 AND form_type = ?4",
            params![file_id, original_filename, form_id, kind.table()],
        )
        .map_err(|e| AppError::Database(format!("Failed to update file info: {}", e)))?;

    if rows == 0 {
        insert(conn, file_id, original_filename, user_id, kind, form_id)?;
    }
    Ok(())
}

/// Look up a file by (file_id, user_id). `None` covers both an unknown id
/// and an id owned by someone else; callers cannot tell them apart.
pub fn find_owned(
    conn: &Connection,
    file_id: &str,
    user_id: &str,
) -> AppResult<Option<FileInfo>> {
    let result = conn.query_row(
        "SELECT file_id, original_filename, user_id, form_id, form_type
         FROM file_info WHERE file_id = ?1 AND user_id = ?2",
        params![file_id, user_id],
        |row| {
            Ok(FileInfo {
                file_id: row.get(0)?,
                original_filename: row.get(1)?,
                user_id: row.get(2)?,
                form_id: row.get(3)?,
                form_type: row.get(4)?,
            })
        },
    );

    match result {
        Ok(info) => Ok(Some(info)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}
