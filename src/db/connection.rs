use std::fs;
use std::path::Path;

use rusqlite::Connection;

use crate::error::StoreError;

/// Open (or create) the board database at `path`.
///
/// Creates parent directories as needed and ensures the key-value schema
/// exists.
pub fn open(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let conn = Connection::open(path)?;
    configure_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

/// In-memory variant for tests and ephemeral sessions.
pub fn open_in_memory() -> Result<Connection, StoreError> {
    let conn = Connection::open_in_memory()?;
    configure_connection(&conn)?;
    init_schema(&conn)?;
    Ok(conn)
}

fn configure_connection(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;",
    )?;
    Ok(())
}

fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS kv (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )?;
    Ok(())
}
