//! Wallet database handle
//!
//! SQLite-backed persistent store for the bootstrap subsystem. Creation
//! refuses to touch a path where a database file already exists; that
//! refusal is the primary guard against clobbering a wallet, with the
//! bootstrapper's compensating cleanup as the second net.

use std::path::{Path, PathBuf};

use rusqlite::Connection;
use tracing::warn;

use crate::errors::{BootstrapError, BootstrapResult};

/// Fixed wallet database file name within a network directory
pub const WALLET_DB_NAME: &str = "wallet.db";

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS metadata (
        key   TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS keystore (
        id       INTEGER PRIMARY KEY AUTOINCREMENT,
        purpose  TEXT UNIQUE NOT NULL,
        salt     TEXT,
        nonce    TEXT,
        material TEXT NOT NULL
    );
"#;

/// Opaque handle to the on-disk wallet store
///
/// Created exactly once per bootstrap call. Dropping the handle releases the
/// underlying connection, so the unwind path can never leak it; success
/// paths call [`WalletDb::close`] to surface flush failures.
#[derive(Debug)]
pub struct WalletDb {
    conn: Connection,
    path: PathBuf,
}

impl WalletDb {
    /// Create a new wallet database at `path`
    ///
    /// Fails with [`BootstrapError::WalletExists`] if any file is already
    /// present at the path. A failure after the database file has been
    /// created removes the file again, so a retry never trips over debris
    /// from this call.
    pub fn create(path: &Path) -> BootstrapResult<Self> {
        Self::create_with_schema(path, SCHEMA)
    }

    fn create_with_schema(path: &Path, schema: &str) -> BootstrapResult<Self> {
        if path.exists() {
            return Err(BootstrapError::WalletExists(path.to_path_buf()));
        }
        let conn = Connection::open(path)?;
        if let Err(e) = conn.execute_batch(schema) {
            // The path was verified empty above, so the file is ours to
            // remove. Cleanup is best-effort; the schema error explains the
            // failure.
            drop(conn);
            if let Err(rm) = std::fs::remove_file(path) {
                warn!(
                    path = %path.display(),
                    error = %rm,
                    "failed to remove partially created wallet database"
                );
            }
            return Err(BootstrapError::Store(e));
        }
        Ok(WalletDb {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Open an existing wallet database
    pub fn open(path: &Path) -> BootstrapResult<Self> {
        if !path.exists() {
            return Err(BootstrapError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no wallet database at {}", path.display()),
            )));
        }
        let conn = Connection::open(path)?;
        Ok(WalletDb {
            conn,
            path: path.to_path_buf(),
        })
    }

    /// Path of the backing database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Insert or replace a metadata entry
    pub fn put_metadata(&self, key: &str, value: &str) -> BootstrapResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    /// Read a metadata entry, if present
    pub fn get_metadata(&self, key: &str) -> BootstrapResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM metadata WHERE key = ?1")?;
        let mut rows = stmt.query(rusqlite::params![key])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Release the handle, surfacing any failure to flush state
    pub fn close(self) -> BootstrapResult<()> {
        self.conn.close().map_err(|(_, e)| BootstrapError::Store(e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WALLET_DB_NAME);

        let db = WalletDb::create(&path).unwrap();
        db.close().unwrap();

        let err = WalletDb::create(&path).unwrap_err();
        assert!(matches!(err, BootstrapError::WalletExists(p) if p == path));
    }

    #[test]
    fn failed_schema_creation_leaves_no_file_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WALLET_DB_NAME);

        let err = WalletDb::create_with_schema(&path, "THIS IS NOT SQL;").unwrap_err();
        assert!(matches!(err, BootstrapError::Store(_)));
        assert!(!path.exists());

        // A retry is not blocked by debris from the failed attempt.
        WalletDb::create(&path).unwrap().close().unwrap();
    }

    #[test]
    fn open_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(WALLET_DB_NAME);
        assert!(WalletDb::open(&path).is_err());

        WalletDb::create(&path).unwrap().close().unwrap();
        let db = WalletDb::open(&path).unwrap();
        assert_eq!(db.path(), path);
    }
}
