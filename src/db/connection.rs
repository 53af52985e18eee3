use anyhow::Context;
use rusqlite::Connection;
use std::path::Path;

/// Open the key/value database in WAL mode. A second app instance waits up to
/// five seconds for the write lock instead of failing at once.
pub fn open_connection(path: &Path) -> anyhow::Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA busy_timeout=5000;
         PRAGMA synchronous=NORMAL;",
    )?;
    tracing::debug!("open_connection: {}", path.display());
    Ok(conn)
}
