use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// A single problem found while validating configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Unified error type for torrent-archiver.
#[derive(Error, Debug, Clone)]
pub enum ArchiverError {
    /// Path or entity not found (ENOENT)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Permission denied (EACCES)
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Invalid argument (EINVAL)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration validation failed
    #[error("Validation error: {}", join_issues(.0))]
    ValidationError(Vec<ValidationIssue>),

    /// Config file could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// An external command could not be spawned or exited non-zero
    #[error("{context} failed ({status}): {stderr}")]
    CommandFailed {
        context: String,
        status: String,
        stderr: String,
    },

    /// Another instance holds the lock file
    #[error("Already running (lock held on {})", .0.display())]
    AlreadyRunning(PathBuf),

    /// Refused to remove an archive directory that still has content
    #[error("Archive directory is not empty: {}", .0.display())]
    ArchiveNotEmpty(PathBuf),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// === Conversion Implementations ===

macro_rules! impl_from_error {
    ($err_type:ty, $arm:pat => $body:expr) => {
        impl From<$err_type> for ArchiverError {
            fn from(err: $err_type) -> Self {
                match err {
                    $arm => $body,
                }
            }
        }
    };
}

impl_from_error!(std::io::Error, e => match e.kind() {
    std::io::ErrorKind::NotFound => ArchiverError::NotFound(e.to_string()),
    std::io::ErrorKind::PermissionDenied => ArchiverError::PermissionDenied(e.to_string()),
    std::io::ErrorKind::InvalidInput => ArchiverError::InvalidArgument(e.to_string()),
    _ => ArchiverError::IoError(e.to_string()),
});

impl_from_error!(walkdir::Error, e => match e.into_io_error() {
    Some(io) => io.into(),
    None => ArchiverError::IoError("filesystem loop while walking directory".to_string()),
});

impl_from_error!(serde_json::Error, e => ArchiverError::ParseError(e.to_string()));
impl_from_error!(toml::de::Error, e => ArchiverError::ParseError(e.to_string()));

/// Result type alias for operations that can fail with ArchiverError.
pub type ArchiverResult<T> = Result<T, ArchiverError>;
