//! Database operations for the seeded reference roles.

use rusqlite::Connection;

use crate::error::{AppError, AppResult};
use crate::models::Role;

/// List all reference roles. The list is seeded by migrations and
/// read-only to the application.
pub fn list_roles(conn: &Connection) -> AppResult<Vec<Role>> {
    let mut stmt = conn
        .prepare("SELECT role_name FROM roles")
        .map_err(|e| AppError::Database(e.to_string()))?;

    let roles = stmt
        .query_map([], |row| {
            Ok(Role {
                role_name: row.get(0)?,
            })
        })
        .map_err(|e| AppError::Database(e.to_string()))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(roles)
}
