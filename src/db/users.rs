//! Database operations for users.

use chrono::Utc;
use rusqlite::{params, Connection};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{User, UserCredentials};

/// Insert a new user with an already-hashed password. Returns the new id.
pub fn insert_user(
    conn: &Connection,
    email: &str,
    username: &str,
    password_hash: &str,
    usertype: Option<&str>,
) -> AppResult<String> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO users (id, email, username, password, usertype, modified_on, modified_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![id, email, username, password_hash, usertype, now, username],
    )
    .map_err(|e| AppError::Database(format!("Failed to insert user: {}", e)))?;

    Ok(id)
}

/// Check whether a user exists with the given email.
pub fn email_exists(conn: &Connection, email: &str) -> AppResult<bool> {
    exists(conn, "SELECT 1 FROM users WHERE email = ?1", email)
}

/// Check whether a user exists with the given username.
pub fn username_exists(conn: &Connection, username: &str) -> AppResult<bool> {
    exists(conn, "SELECT 1 FROM users WHERE username = ?1", username)
}

fn exists(conn: &Connection, sql: &str, value: &str) -> AppResult<bool> {
    match conn.query_row(sql, [value], |_| Ok(())) {
        Ok(()) => Ok(true),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(false),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}

/// Find a user by ID.
pub fn find_by_id(conn: &Connection, id: &str) -> AppResult<Option<User>> {
    let result = conn.query_row(
        "SELECT id, email, username, usertype FROM users WHERE id = ?1",
        [id],
        |row| {
            Ok(User {
                id: row.get(0)?,
                email: row.get(1)?,
                username: row.get(2)?,
                usertype: row.get(3)?,
            })
        },
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}

/// Find login credentials by email.
pub fn find_credentials_by_email(
    conn: &Connection,
    email: &str,
) -> AppResult<Option<UserCredentials>> {
    let result = conn.query_row(
        "SELECT id, username, password FROM users WHERE email = ?1",
        [email],
        |row| {
            Ok(UserCredentials {
                id: row.get(0)?,
                username: row.get(1)?,
                password_hash: row.get(2)?,
            })
        },
    );

    match result {
        Ok(creds) => Ok(Some(creds)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(AppError::Database(e.to_string())),
    }
}

/// Get a user's username, failing if the user disappeared mid-request.
pub fn get_username(conn: &Connection, id: &str) -> AppResult<String> {
    conn.query_row("SELECT username FROM users WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("User".to_string()),
        e => AppError::Database(e.to_string()),
    })
}

/// Get a user's usertype tag.
pub fn get_usertype(conn: &Connection, id: &str) -> AppResult<Option<String>> {
    conn.query_row("SELECT usertype FROM users WHERE id = ?1", [id], |row| {
        row.get(0)
    })
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => AppError::NotFound("User".to_string()),
        e => AppError::Database(e.to_string()),
    })
}
