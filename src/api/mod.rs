pub mod client;
pub mod listing;

use crate::error::ArchiverResult;
use crate::types::TorrentRecord;

pub use client::{create_client, TorrentAction, TransmissionRemote};
pub use listing::{parse_line, parse_listing};

/// Narrow view of the torrent daemon: everything the archiver needs and
/// nothing more.
#[cfg_attr(test, mockall::automock)]
pub trait TorrentClient {
    /// Fetches a fresh listing of finished torrents.
    fn list(&self) -> ArchiverResult<Vec<TorrentRecord>>;

    /// Stops seeding/downloading the torrent.
    fn stop(&self, id: u64) -> ArchiverResult<()>;

    /// Removes the torrent from the client, keeping its data on disk.
    fn remove(&self, id: u64) -> ArchiverResult<()>;
}

impl<T: TorrentClient + ?Sized> TorrentClient for &T {
    fn list(&self) -> ArchiverResult<Vec<TorrentRecord>> {
        (**self).list()
    }

    fn stop(&self, id: u64) -> ArchiverResult<()> {
        (**self).stop(id)
    }

    fn remove(&self, id: u64) -> ArchiverResult<()> {
        (**self).remove(id)
    }
}
