//! Single-instance guard backed by an exclusive advisory lock on a pid file.

use crate::error::{ArchiverError, ArchiverResult};
use std::fs::{File, OpenOptions, TryLockError};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Held for the lifetime of the process. The kernel drops the lock when the
/// file descriptor closes, including on abnormal termination. The file is
/// left in place: unlinking it would let a waiting instance lock a stale inode.
#[derive(Debug)]
pub struct InstanceLock {
    _file: File,
}

impl InstanceLock {
    pub fn acquire(path: &Path) -> ArchiverResult<Self> {
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| ArchiverError::IoError(format!("{}: {}", path.display(), e)))?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                return Err(ArchiverError::AlreadyRunning(path.to_path_buf()))
            }
            Err(TryLockError::Error(e)) => {
                return Err(ArchiverError::IoError(format!("{}: {}", path.display(), e)))
            }
        }

        file.set_len(0)?;
        writeln!(file, "{}", std::process::id())?;
        debug!(path = %path.display(), "Acquired instance lock");

        Ok(Self { _file: file })
    }
}
