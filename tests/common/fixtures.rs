//! Test fixtures for torrent data

use torrent_archiver::TorrentRecord;

/// A listing as printed by `transmission-remote -l`, with the header, an
/// unfinished download and the summary footer.
pub const LISTING: &str = "\
    ID   Done       Have  ETA           Up    Down  Ratio  Status       Name
     3   100%   702.50 MB  Done         0.0     0.0    2.50  Seeding      ExampleTorrent
     5    12%    80.00 MB  2 hrs        0.0   120.0    0.00  Downloading  Still Coming
     9   100%  1500.25 MB  Done        12.0     0.0    0.75  Stopped      Low Ratio Album
Sum:           2282.75 MB              12.0   120.0
";

/// Finished record with the given id, name and ratio.
pub fn record(id: u64, name: &str, ratio: f64) -> TorrentRecord {
    TorrentRecord {
        id,
        done_percent: 100,
        have_mb: 100.0,
        uploaded_mb: 100.0 * ratio,
        downloaded_mb: 0.0,
        ratio,
        status: "Seeding".to_string(),
        name: name.to_string(),
    }
}

/// A finished, seeded torrent: id 3, `ExampleTorrent`, ratio 2.50.
pub fn example_torrent() -> TorrentRecord {
    record(3, "ExampleTorrent", 2.50)
}

/// Five torrents named `Torrent 1` .. `Torrent 5`.
pub fn five_torrents() -> Vec<TorrentRecord> {
    (1..=5)
        .map(|id| record(id, &format!("Torrent {}", id), 1.0))
        .collect()
}
