use crate::config::MountConfig;
use crate::error::ArchiverResult;
use crate::process::run_shell;
use tracing::{debug, error, info};

/// Optional shell commands run around a batch, typically to bring removable
/// archive storage online and take it offline again.
#[derive(Debug, Clone, Default)]
pub struct MountGuard {
    mount_command: Option<String>,
    unmount_command: Option<String>,
}

impl MountGuard {
    pub fn new(mount_command: Option<String>, unmount_command: Option<String>) -> Self {
        Self {
            mount_command,
            unmount_command,
        }
    }

    pub fn from_config(config: &MountConfig) -> Self {
        Self::new(config.mount_command.clone(), config.unmount_command.clone())
    }

    pub fn mount(&self) -> ArchiverResult<()> {
        match &self.mount_command {
            Some(command) => {
                info!(command = %command, "Mounting archive storage");
                run_shell(command, "mount command")
            }
            None => {
                debug!("No mount command configured");
                Ok(())
            }
        }
    }

    pub fn unmount(&self) -> ArchiverResult<()> {
        match &self.unmount_command {
            Some(command) => {
                info!(command = %command, "Unmounting archive storage");
                run_shell(command, "unmount command")
            }
            None => {
                debug!("No unmount command configured");
                Ok(())
            }
        }
    }

    /// Mounts, runs `batch`, then unmounts whatever the batch returned.
    ///
    /// A failed mount means the batch never runs. When the batch fails its
    /// error wins over an unmount failure, which is only logged.
    pub fn run<T, F>(&self, batch: F) -> ArchiverResult<T>
    where
        F: FnOnce() -> ArchiverResult<T>,
    {
        self.mount()?;

        match batch() {
            Ok(value) => {
                self.unmount()?;
                Ok(value)
            }
            Err(batch_err) => {
                if let Err(unmount_err) = self.unmount() {
                    error!(error = %unmount_err, "Unmount after failed batch also failed");
                }
                Err(batch_err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArchiverError;
    use std::path::Path;
    use tempfile::TempDir;

    fn marker(dir: &Path, name: &str) -> String {
        format!("echo {} >> {}", name, dir.join("log").display())
    }

    fn events(dir: &Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_unconfigured_guard_just_runs_batch() {
        let guard = MountGuard::default();
        assert_eq!(guard.run(|| Ok(7)).unwrap(), 7);
        assert!(guard.mount().is_ok());
        assert!(guard.unmount().is_ok());
    }

    #[test]
    fn test_mount_batch_unmount_order() {
        let dir = TempDir::new().unwrap();
        let guard = MountGuard::new(
            Some(marker(dir.path(), "mount")),
            Some(marker(dir.path(), "unmount")),
        );

        let log = dir.path().to_path_buf();
        guard
            .run(|| {
                std::fs::OpenOptions::new()
                    .append(true)
                    .open(log.join("log"))
                    .and_then(|mut f| std::io::Write::write_all(&mut f, b"batch\n"))?;
                Ok(())
            })
            .unwrap();

        assert_eq!(events(dir.path()), ["mount", "batch", "unmount"]);
    }

    #[test]
    fn test_failed_mount_skips_batch_and_unmount() {
        let dir = TempDir::new().unwrap();
        let guard = MountGuard::new(Some("exit 2".to_string()), Some(marker(dir.path(), "unmount")));

        let mut ran = false;
        let result = guard.run(|| {
            ran = true;
            Ok(())
        });

        assert!(matches!(result, Err(ArchiverError::CommandFailed { .. })));
        assert!(!ran);
        assert!(events(dir.path()).is_empty());
    }

    #[test]
    fn test_unmount_runs_after_failed_batch() {
        let dir = TempDir::new().unwrap();
        let guard = MountGuard::new(None, Some(marker(dir.path(), "unmount")));

        let result: ArchiverResult<()> =
            guard.run(|| Err(ArchiverError::ArchiveNotEmpty("/archive/x".into())));

        assert!(matches!(result, Err(ArchiverError::ArchiveNotEmpty(_))));
        assert_eq!(events(dir.path()), ["unmount"]);
    }

    #[test]
    fn test_batch_error_wins_over_unmount_error() {
        let guard = MountGuard::new(None, Some("exit 1".to_string()));
        let result: ArchiverResult<()> =
            guard.run(|| Err(ArchiverError::NotFound("x".to_string())));
        assert!(matches!(result, Err(ArchiverError::NotFound(_))));
    }

    #[test]
    fn test_unmount_failure_after_success_is_fatal() {
        let guard = MountGuard::new(None, Some("exit 1".to_string()));
        let result = guard.run(|| Ok(()));
        assert!(matches!(result, Err(ArchiverError::CommandFailed { .. })));
    }
}
