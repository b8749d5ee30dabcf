//! Read-only connections for status queries and derivation reads.
//!
//! Readers see the last committed WAL snapshot, so a heatmap swap in
//! progress on the writer is invisible to them until it commits.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, TryLockError};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};
use urbanflux_core::errors::StorageError;

use super::pragmas::apply_read_pragmas;

const MAX_READERS: usize = 8;

pub struct ReadPool {
    readers: Vec<Mutex<Connection>>,
    cursor: AtomicUsize,
}

impl ReadPool {
    /// Open `size` readers (clamped to `1..=8`). The database must already
    /// exist and be migrated.
    pub fn open(path: &Path, size: usize, busy_timeout: Duration) -> Result<Self, StorageError> {
        let size = size.clamp(1, MAX_READERS);
        let flags = OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        let readers = (0..size)
            .map(|_| {
                let conn = Connection::open_with_flags(path, flags).map_err(StorageError::sqlite)?;
                apply_read_pragmas(&conn, busy_timeout)?;
                Ok(Mutex::new(conn))
            })
            .collect::<Result<Vec<_>, StorageError>>()?;
        tracing::debug!(readers = readers.len(), "read pool opened");
        Ok(Self {
            readers,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Run `f` on an idle reader if there is one, else wait on the next in turn.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, StorageError>
    where
        F: FnOnce(&Connection) -> Result<T, StorageError>,
    {
        let start = self.cursor.fetch_add(1, Ordering::Relaxed);
        let n = self.readers.len();
        for i in 0..n {
            match self.readers[(start + i) % n].try_lock() {
                Ok(conn) => return f(&conn),
                Err(TryLockError::WouldBlock) => continue,
                Err(TryLockError::Poisoned(_)) => return Err(poisoned()),
            }
        }
        let conn = self.readers[start % n].lock().map_err(|_| poisoned())?;
        f(&conn)
    }

    pub fn size(&self) -> usize {
        self.readers.len()
    }
}

fn poisoned() -> StorageError {
    StorageError::SqliteError {
        message: "reader lock poisoned".to_string(),
    }
}
