use crate::schema::SCHEMA;
use rusqlite::Connection;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("failed to read legacy cache: {0}")]
    Read(std::io::Error),
    #[error("failed to close database: {0}")]
    Close(rusqlite::Error),
}

/// Opens (creating if absent) the on-disk cache. The returned handle is the
/// single writer for the process; callers own it and pass it into every store
/// operation.
pub fn open_cache(path: &Path) -> Result<Connection, CacheError> {
    init_connection(Connection::open(path)?)
}

/// Isolated in-memory cache, used by tests in place of the shared handle.
pub fn open_cache_in_memory() -> Result<Connection, CacheError> {
    init_connection(Connection::open_in_memory()?)
}

fn init_connection(conn: Connection) -> Result<Connection, CacheError> {
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.execute_batch(SCHEMA)?;
    Ok(conn)
}

/// Checkpoints the write-ahead log and closes the handle. Called once on
/// clean shutdown.
pub fn close_cache(conn: Connection) -> Result<(), CacheError> {
    conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
    conn.close().map_err(|(_, err)| CacheError::Close(err))
}
