use thiserror::Error;

/// Failures at the persistence seam.
///
/// Board mutations never surface these: the adapter catches them, logs, and
/// keeps the in-memory board authoritative for the session. The `try_`
/// variants of the adapter expose them for callers that need to observe
/// durability failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
