//! Core data types shared by the client adapter, selector and archiver.

pub mod torrent;

pub use torrent::{is_single_segment, TorrentRecord};
