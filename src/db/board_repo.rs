use log::warn;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;
use crate::models::Board;

/// Fixed key the whole board is stored under. There is no versioning or
/// migration scheme; an unparseable stored value falls back to the caller's
/// default on load.
pub const BOARD_KEY: &str = "taskflow-board";

/// Write `board` under `key`.
///
/// Failures are logged and swallowed. The in-memory board stays the source
/// of truth for the session even when durability fails.
pub fn save(conn: &Connection, key: &str, board: &Board) {
    if let Err(e) = try_save(conn, key, board) {
        warn!("failed to persist board under '{key}': {e}");
    }
}

pub fn try_save(conn: &Connection, key: &str, board: &Board) -> Result<(), StoreError> {
    let value = serde_json::to_string(board)?;
    conn.execute(
        "INSERT INTO kv (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Read the board stored under `key`.
///
/// Returns `default` when the key is absent or the stored text does not
/// parse; a parse failure is logged, never raised.
pub fn load(conn: &Connection, key: &str, default: Board) -> Board {
    match try_load(conn, key) {
        Ok(Some(board)) => board,
        Ok(None) => default,
        Err(e) => {
            warn!("failed to load board under '{key}', using default: {e}");
            default
        }
    }
}

pub fn try_load(conn: &Connection, key: &str) -> Result<Option<Board>, StoreError> {
    let stored: Option<String> = conn
        .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
            row.get(0)
        })
        .optional()?;
    match stored {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection;
    use crate::models::Board;

    #[test]
    fn save_then_load_round_trips() {
        let conn = connection::open_in_memory().expect("open");
        let board = Board::sample();
        save(&conn, BOARD_KEY, &board);
        let loaded = load(&conn, BOARD_KEY, Board::empty());
        assert_eq!(loaded, board);
    }

    #[test]
    fn load_of_absent_key_returns_default() {
        let conn = connection::open_in_memory().expect("open");
        let loaded = load(&conn, BOARD_KEY, Board::empty());
        assert_eq!(loaded, Board::empty());
    }

    #[test]
    fn load_of_corrupt_value_returns_default() {
        let conn = connection::open_in_memory().expect("open");
        conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)",
            params![BOARD_KEY, "{ not json"],
        )
        .expect("insert garbage");
        let loaded = load(&conn, BOARD_KEY, Board::empty());
        assert_eq!(loaded, Board::empty());
    }

    #[test]
    fn try_load_surfaces_storage_errors() {
        let conn = connection::open_in_memory().expect("open");
        conn.execute_batch("DROP TABLE kv").expect("drop kv");
        assert!(try_load(&conn, BOARD_KEY).is_err());
        assert!(try_save(&conn, BOARD_KEY, &Board::empty()).is_err());
    }

    #[test]
    fn save_overwrites_previous_value() {
        let conn = connection::open_in_memory().expect("open");
        save(&conn, BOARD_KEY, &Board::sample());
        save(&conn, BOARD_KEY, &Board::empty());
        let loaded = load(&conn, BOARD_KEY, Board::sample());
        assert_eq!(loaded, Board::empty());
    }
}
