//! Pooled SQLite store.
//!
//! Every request checks a connection out of the pool and hands it back when
//! the `DbConn` guard drops, whichever way the handler exits.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use std::path::Path;
use std::time::Duration;

use crate::config::DbConfig;
use crate::error::{NoteError, NoteOp, NoteResult};

pub type DbConn = PooledConnection<SqliteConnectionManager>;

const MAX_OPEN_ATTEMPTS: u32 = 3;
const INITIAL_BACKOFF_SECS: u64 = 1;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

const CREATE_NOTES_TABLE: &str = "CREATE TABLE IF NOT EXISTS notes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    note_name VARCHAR(255) NOT NULL,
    note_description VARCHAR(255)
)";

pub struct Database {
    pool: Pool<SqliteConnectionManager>,
}

impl Database {
    /// Build the connection pool, retrying transient failures with backoff.
    pub fn open(config: &DbConfig) -> NoteResult<Self> {
        if let Some(parent) = Path::new(&config.database).parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("[DB] Could not create {}: {}", parent.display(), e);
                }
            }
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            match Self::build_pool(config) {
                Ok(pool) => {
                    log::info!(
                        "[DB] Opened {} (pool size {})",
                        config.database,
                        config.pool_size
                    );
                    return Ok(Self { pool });
                }
                Err(e) if attempt < MAX_OPEN_ATTEMPTS => {
                    let backoff = INITIAL_BACKOFF_SECS * (1 << (attempt - 1)); // 1s, 2s
                    log::warn!(
                        "[DB] Open attempt {} of {} failed: {}. Retrying in {}s...",
                        attempt,
                        MAX_OPEN_ATTEMPTS,
                        e,
                        backoff
                    );
                    std::thread::sleep(Duration::from_secs(backoff));
                }
                Err(e) => return Err(NoteError::StorageUnavailable(e)),
            }
        }
    }

    fn build_pool(config: &DbConfig) -> Result<Pool<SqliteConnectionManager>, r2d2::Error> {
        let manager = SqliteConnectionManager::file(&config.database).with_init(|conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            let _: String =
                conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
            Ok(())
        });

        Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(config.connect_timeout)
            .build(manager)
    }

    /// Check a connection out of the pool
    pub fn conn(&self) -> NoteResult<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Whether the pool holds any open connection. Never waits on the pool.
    pub fn is_available(&self) -> bool {
        self.pool.state().connections > 0
    }

    /// Create the notes table if it is missing. Safe to call repeatedly.
    pub fn ensure_schema(&self) -> NoteResult<()> {
        let conn = self.conn()?;
        conn.execute_batch(CREATE_NOTES_TABLE)
            .map_err(NoteError::storage(NoteOp::Schema))?;
        log::info!("[DB] Notes table ready");
        Ok(())
    }
}
