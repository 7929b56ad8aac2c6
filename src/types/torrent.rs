use std::path::{Component, Path};

/// One row of the torrent client's listing.
///
/// Records are never persisted: they are re-read from the client on every
/// invocation and ids are only meaningful for the client's current session.
#[derive(Debug, Clone, PartialEq)]
pub struct TorrentRecord {
    pub id: u64,
    pub done_percent: u8,
    pub have_mb: f64,
    pub uploaded_mb: f64,
    pub downloaded_mb: f64,
    pub ratio: f64,
    pub status: String,
    /// Display name, also the directory name under both the download and
    /// archive roots.
    pub name: String,
}

impl TorrentRecord {
    /// Returns the name if it is usable as exactly one normal path component.
    pub fn path_segment(&self) -> Option<&str> {
        is_single_segment(&self.name).then_some(self.name.as_str())
    }
}

/// Whether `name` resolves to exactly one normal component when joined onto a
/// directory, so it can never point outside that directory.
pub fn is_single_segment(name: &str) -> bool {
    if name.is_empty() || name.contains('\0') || name.contains('/') {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}
