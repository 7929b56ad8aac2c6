//! Per-record filesystem work: archive (move), sync (copy) and
//! delete-from-archive.
//!
//! Records are processed strictly one after another. A missing source, an
//! unusable name or (for sync) an existing destination skips the record and
//! the batch carries on; anything coming back from the torrent client or a
//! failed filesystem call ends the batch with an error.

use crate::api::TorrentClient;
use crate::cancel::StopFlag;
use crate::config::PathsConfig;
use crate::error::{ArchiverError, ArchiverResult};
use crate::types::TorrentRecord;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum BatchKind {
    Archive,
    Sync,
    DeleteFromArchive,
}

/// Outcome of one batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub kind: BatchKind,
    pub total: usize,
    pub completed: usize,
    pub skipped: usize,
    /// A stop request ended the batch before every record was visited.
    pub interrupted: bool,
}

impl BatchReport {
    fn new(kind: BatchKind, total: usize) -> Self {
        Self {
            kind,
            total,
            completed: 0,
            skipped: 0,
            interrupted: false,
        }
    }

    /// Records never visited because of a stop request.
    pub fn not_started(&self) -> usize {
        self.total - self.completed - self.skipped
    }

    pub fn log_summary(&self) {
        info!(
            op = %self.kind,
            total = self.total,
            completed = self.completed,
            skipped = self.skipped,
            not_started = self.not_started(),
            interrupted = self.interrupted,
            "Batch finished"
        );
    }
}

enum Step {
    Done,
    Skipped,
}

pub struct Archiver<'a, C: TorrentClient + ?Sized> {
    client: &'a C,
    download_dir: PathBuf,
    archive_dir: PathBuf,
    stop: StopFlag,
}

impl<'a, C: TorrentClient + ?Sized> Archiver<'a, C> {
    pub fn new(client: &'a C, paths: &PathsConfig, stop: StopFlag) -> Self {
        Self {
            client,
            download_dir: paths.download_dir.clone(),
            archive_dir: paths.archive_dir.clone(),
            stop,
        }
    }

    /// Stops and removes each torrent from the client and moves its data
    /// into the archive. When the archive copy already exists the download
    /// copy is deleted instead.
    pub fn archive(&self, records: &[TorrentRecord]) -> ArchiverResult<BatchReport> {
        self.run_batch(BatchKind::Archive, records, |record| {
            let Some((source, dest)) = self.locate(record) else {
                return Ok(Step::Skipped);
            };
            if !source.is_dir() {
                info!(path = %source.display(), "Torrent source dir does not exist, skipping");
                return Ok(Step::Skipped);
            }

            if dest.is_dir() {
                self.stop_and_remove(record)?;
                info!(
                    path = %dest.display(),
                    "Torrent archive dir already exists, deleting source files"
                );
                fs::remove_dir_all(&source).map_err(|e| io_error(&source, e))?;
                return Ok(Step::Done);
            }

            self.stop_and_remove(record)?;
            move_dir(&source, &dest)?;
            Ok(Step::Done)
        })
    }

    /// Copies each download into the archive, leaving the source and the
    /// client untouched. Existing archive copies are never overwritten.
    pub fn sync(&self, records: &[TorrentRecord]) -> ArchiverResult<BatchReport> {
        self.run_batch(BatchKind::Sync, records, |record| {
            let Some((source, dest)) = self.locate(record) else {
                return Ok(Step::Skipped);
            };
            if !source.is_dir() {
                info!(path = %source.display(), "Torrent source dir does not exist, skipping");
                return Ok(Step::Skipped);
            }
            if dest.is_dir() {
                info!(path = %dest.display(), "Torrent archive dir already exists, skipping");
                return Ok(Step::Skipped);
            }

            copy_tree(&source, &dest)?;
            Ok(Step::Done)
        })
    }

    /// Removes each record's archive directory, which must already be empty.
    pub fn delete_from_archive(&self, records: &[TorrentRecord]) -> ArchiverResult<BatchReport> {
        self.run_batch(BatchKind::DeleteFromArchive, records, |record| {
            let Some((_, dest)) = self.locate(record) else {
                return Ok(Step::Skipped);
            };
            if !dest.is_dir() {
                info!(path = %dest.display(), "Torrent archive dir does not exist, skipping");
                return Ok(Step::Skipped);
            }

            remove_empty_dir(&dest)?;
            Ok(Step::Done)
        })
    }

    /// Whether the record already has a directory in the archive.
    pub fn is_archived(&self, record: &TorrentRecord) -> bool {
        record
            .path_segment()
            .is_some_and(|segment| self.archive_dir.join(segment).is_dir())
    }

    fn run_batch<F>(
        &self,
        kind: BatchKind,
        records: &[TorrentRecord],
        mut step: F,
    ) -> ArchiverResult<BatchReport>
    where
        F: FnMut(&TorrentRecord) -> ArchiverResult<Step>,
    {
        let mut report = BatchReport::new(kind, records.len());

        for (i, record) in records.iter().enumerate() {
            if self.stop.is_stop_requested() {
                info!(op = %kind, "Stop requested, exiting");
                report.interrupted = true;
                break;
            }

            info!(
                op = %kind,
                torrent_id = record.id,
                "{} {} ({} of {})...",
                progress_verb(kind),
                record.name,
                i + 1,
                records.len()
            );

            match step(record)? {
                Step::Done => report.completed += 1,
                Step::Skipped => report.skipped += 1,
            }
        }

        report.log_summary();
        Ok(report)
    }

    /// Source and archive paths for the record, or `None` when its name
    /// cannot be used as a directory name.
    fn locate(&self, record: &TorrentRecord) -> Option<(PathBuf, PathBuf)> {
        match record.path_segment() {
            Some(segment) => Some((
                self.download_dir.join(segment),
                self.archive_dir.join(segment),
            )),
            None => {
                warn!(
                    torrent_id = record.id,
                    name = %record.name,
                    "Torrent name is not a single path segment, skipping"
                );
                None
            }
        }
    }

    fn stop_and_remove(&self, record: &TorrentRecord) -> ArchiverResult<()> {
        self.client.stop(record.id)?;
        self.client.remove(record.id)?;
        debug!(torrent_id = record.id, "Stopped and removed from client");
        Ok(())
    }
}

fn progress_verb(kind: BatchKind) -> &'static str {
    match kind {
        BatchKind::Archive => "Archiving",
        BatchKind::Sync => "Syncing",
        BatchKind::DeleteFromArchive => "Deleting",
    }
}

fn io_error(path: &Path, err: io::Error) -> ArchiverError {
    let mapped: ArchiverError = err.into();
    match mapped {
        ArchiverError::NotFound(m) => ArchiverError::NotFound(format!("{}: {}", path.display(), m)),
        ArchiverError::PermissionDenied(m) => {
            ArchiverError::PermissionDenied(format!("{}: {}", path.display(), m))
        }
        ArchiverError::IoError(m) => ArchiverError::IoError(format!("{}: {}", path.display(), m)),
        other => other,
    }
}

/// Renames `source` to `dest`, falling back to copy-then-delete when the two
/// live on different filesystems.
pub fn move_dir(source: &Path, dest: &Path) -> ArchiverResult<()> {
    match fs::rename(source, dest) {
        Ok(()) => Ok(()),
        Err(e) if e.raw_os_error() == Some(libc::EXDEV) => {
            debug!(
                source = %source.display(),
                dest = %dest.display(),
                "Cross-device move, copying instead"
            );
            copy_then_remove(source, dest)
        }
        Err(e) => Err(io_error(source, e)),
    }
}

/// The cross-device half of [`move_dir`]: the source is only deleted once the
/// whole tree has been copied.
pub fn copy_then_remove(source: &Path, dest: &Path) -> ArchiverResult<()> {
    copy_tree(source, dest)?;
    fs::remove_dir_all(source).map_err(|e| io_error(source, e))
}

/// Recursively copies a directory, recreating symlinks rather than following
/// them. `dest` must not exist yet.
pub fn copy_tree(source: &Path, dest: &Path) -> ArchiverResult<()> {
    for entry in WalkDir::new(source).follow_links(false) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| ArchiverError::IoError(e.to_string()))?;
        let target = dest.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if relative.as_os_str().is_empty() {
                fs::create_dir(&target).map_err(|e| io_error(&target, e))?;
            } else {
                fs::create_dir_all(&target).map_err(|e| io_error(&target, e))?;
            }
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path()).map_err(|e| io_error(entry.path(), e))?;
            std::os::unix::fs::symlink(&link, &target).map_err(|e| io_error(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| io_error(entry.path(), e))?;
        }
    }
    Ok(())
}

/// Non-recursive removal; a directory with any content is refused.
pub fn remove_empty_dir(dir: &Path) -> ArchiverResult<()> {
    if fs::read_dir(dir)
        .map_err(|e| io_error(dir, e))?
        .next()
        .is_some()
    {
        return Err(ArchiverError::ArchiveNotEmpty(dir.to_path_buf()));
    }
    fs::remove_dir(dir).map_err(|e| io_error(dir, e))
}
