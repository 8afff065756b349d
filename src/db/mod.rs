//! Database module providing connection management, migrations, and queries.

pub mod file_info;
pub mod migrations;
pub mod roles;
pub mod submissions;
pub mod users;

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::error::{AppError, AppResult};

/// Database connection pool wrapper.
/// Uses a Mutex since rusqlite Connection is not thread-safe.
#[derive(Clone)]
pub struct DbPool {
    conn: Arc<Mutex<Connection>>,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub fn new(config: &Config) -> AppResult<Self> {
        let path = config.database_path().map_err(|e| {
            AppError::Database(format!("Invalid DATABASE_URL: {}", e))
        })?;

        // Ensure parent directory exists
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::Database(format!("Failed to create database directory: {}", e))
            })?;
        }

        let conn = Connection::open(path)
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_connection(conn)
    }

    /// Wrap an already-open connection, applying the standard pragmas.
    /// Used by tests with in-memory or tempdir databases.
    pub fn from_connection(conn: Connection) -> AppResult<Self> {
        conn.execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| AppError::Database(format!("Failed to set pragma: {}", e)))?;

        // Force synchronous writes
        conn.execute("PRAGMA synchronous = FULL", [])
            .map_err(|e| AppError::Database(format!("Failed to set synchronous pragma: {}", e)))?;

        // Use WAL mode for better concurrency (pragma returns current mode, so use query_row)
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(|e| AppError::Database(format!("Failed to set journal_mode pragma: {}", e)))?;

        Ok(DbPool {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Get access to the connection for executing queries.
    /// Returns a MutexGuard that must be held while using the connection.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("Database mutex poisoned")
    }
}
