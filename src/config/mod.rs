//! Configuration management for CLI, environment variables, and config files.

use crate::error::{ArchiverError, ValidationIssue};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const LOCK_FILE_NAME: &str = "torrent-archiver.pid";

/// Main configuration for torrent-archiver.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub mount: MountConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Locations of the two directory trees and the instance lock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub archive_dir: PathBuf,
    pub download_dir: PathBuf,
    pub lock_file: Option<PathBuf>,
}

/// How to reach the torrent daemon through its control tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub program: String,
    pub host: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Shell commands bracketing every batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub mount_command: Option<String>,
    pub unmount_command: Option<String>,
}

/// Configuration for logging output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            archive_dir: PathBuf::from("~/archive"),
            download_dir: PathBuf::from("/home/debian-transmission/downloads"),
            lock_file: None,
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            program: "transmission-remote".to_string(),
            host: None,
            username: None,
            password: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl PathsConfig {
    /// Lock file location, falling back to the user's runtime directory.
    pub fn lock_file(&self) -> PathBuf {
        self.lock_file.clone().unwrap_or_else(|| {
            dirs::runtime_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(LOCK_FILE_NAME)
        })
    }

    fn expand_home(mut self) -> Self {
        self.archive_dir = expand_tilde(&self.archive_dir);
        self.download_dir = expand_tilde(&self.download_dir);
        self.lock_file = self.lock_file.as_deref().map(expand_tilde);
        self
    }
}

impl RemoteConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(username), Some(password)) => Some((username, password)),
            _ => None,
        }
    }
}

/// Replaces a leading `~` component with the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ArchiverError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ArchiverError::IoError(format!("{}: {}", path.display(), e))
        })?;

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Ok(toml::from_str(&content)?),
        }
    }

    pub fn from_default_locations() -> Result<Self, ArchiverError> {
        let config_paths = [
            dirs::config_dir().map(|d| d.join("torrent-archiver/config.toml")),
            Some(PathBuf::from("/etc/torrent-archiver/config.toml")),
            Some(PathBuf::from("./torrent-archiver.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    pub fn merge_from_env(mut self) -> Result<Self, ArchiverError> {
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_ARCHIVE_DIR") {
            self.paths.archive_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_DOWNLOAD_DIR") {
            self.paths.download_dir = PathBuf::from(val);
        }
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_LOCK_FILE") {
            self.paths.lock_file = Some(PathBuf::from(val));
        }
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_REMOTE_PROGRAM") {
            self.remote.program = val;
        }
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_REMOTE_HOST") {
            self.remote.host = Some(val);
        }
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_MOUNT_COMMAND") {
            self.mount.mount_command = Some(val);
        }
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_UNMOUNT_COMMAND") {
            self.mount.unmount_command = Some(val);
        }
        if let Ok(val) = std::env::var("TORRENT_ARCHIVER_LOG_LEVEL") {
            self.logging.level = val;
        }

        // Auth credentials - support both individual fields and combined format
        if let Ok(auth_str) = std::env::var("TORRENT_ARCHIVER_AUTH_USERPASS") {
            let (username, password) = auth_str.split_once(':').ok_or_else(|| {
                ArchiverError::InvalidArgument(
                    "TORRENT_ARCHIVER_AUTH_USERPASS must be in user:password format".into(),
                )
            })?;
            self.remote.username = Some(username.to_string());
            self.remote.password = Some(password.to_string());
        } else {
            if let Ok(val) = std::env::var("TORRENT_ARCHIVER_AUTH_USERNAME") {
                self.remote.username = Some(val);
            }
            if let Ok(val) = std::env::var("TORRENT_ARCHIVER_AUTH_PASSWORD") {
                self.remote.password = Some(val);
            }
        }

        Ok(self)
    }

    pub fn merge_from_cli(mut self, cli: &CliArgs) -> Self {
        if let Some(ref archive_dir) = cli.archive_dir {
            self.paths.archive_dir = archive_dir.clone();
        }

        if let Some(ref download_dir) = cli.download_dir {
            self.paths.download_dir = download_dir.clone();
        }

        self
    }

    pub fn load_with_cli(cli: &CliArgs) -> Result<Self, ArchiverError> {
        let base = match cli.config_file {
            Some(ref path) => Self::from_file(path)?,
            None => Self::from_default_locations()?,
        };
        Ok(base.merge_from_env()?.merge_from_cli(cli).finish())
    }

    fn finish(mut self) -> Self {
        self.paths = self.paths.expand_home();
        self
    }

    pub fn validate(&self) -> Result<(), ArchiverError> {
        let mut issues = Vec::new();
        let mut issue = |field: &str, message: String| {
            issues.push(ValidationIssue {
                field: field.to_string(),
                message,
            })
        };

        for (field, dir) in [
            ("paths.archive_dir", &self.paths.archive_dir),
            ("paths.download_dir", &self.paths.download_dir),
        ] {
            if !dir.is_absolute() {
                issue(
                    field,
                    format!("{} must be an absolute path", dir.display()),
                );
            }
        }

        if self.paths.archive_dir == self.paths.download_dir {
            issue(
                "paths.archive_dir",
                "archive and download directories must differ".to_string(),
            );
        }

        if self.remote.program.trim().is_empty() {
            issue("remote.program", "program cannot be empty".to_string());
        }

        if matches!(self.remote.host.as_deref(), Some(host) if host.trim().is_empty()) {
            issue("remote.host", "host cannot be empty when set".to_string());
        }

        if self.remote.username.is_some() != self.remote.password.is_some() {
            issue(
                "remote.username",
                "username and password must be set together".to_string(),
            );
        }

        for (field, command) in [
            ("mount.mount_command", &self.mount.mount_command),
            ("mount.unmount_command", &self.mount.unmount_command),
        ] {
            if matches!(command.as_deref(), Some(c) if c.trim().is_empty()) {
                issue(field, "command cannot be blank when set".to_string());
            }
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            issue(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Valid levels: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            );
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ArchiverError::ValidationError(issues))
        }
    }
}

/// Command-line arguments that override configuration values.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    pub config_file: Option<PathBuf>,
    pub archive_dir: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
}
