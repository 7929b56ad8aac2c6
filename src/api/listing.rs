//! Parser for the `transmission-remote -l` table.
//!
//! A listing looks like:
//!
//! ```text
//!     ID   Done       Have  ETA           Up    Down  Ratio  Status       Name
//!      3   100%   702.5 MB  Done         0.0     0.0    2.5  Seeding      Example Torrent
//! Sum:            702.5 MB               0.0     0.0
//! ```
//!
//! Only finished rows (ETA column `Done`, size in MB) become records. Header,
//! footer and anything else that does not fit the row shape is dropped
//! without a warning.

use crate::types::TorrentRecord;
use regex::Regex;
use std::sync::OnceLock;

const ROW_PATTERN: &str = r"^\s*(?P<id>\d+)\s+(?P<done>\d+)%\s+(?P<have>\d+\.\d+)\s+MB\s+Done\s+(?P<up>\d+\.\d+)\s+(?P<down>\d+\.\d+)\s+(?P<ratio>\d+\.\d+)\s+(?P<status>\w+)\s+(?P<name>.*)$";

fn row_regex() -> &'static Regex {
    static ROW: OnceLock<Regex> = OnceLock::new();
    ROW.get_or_init(|| Regex::new(ROW_PATTERN).expect("listing row pattern is valid"))
}

/// Parses a single listing line.
pub fn parse_line(line: &str) -> Option<TorrentRecord> {
    let caps = row_regex().captures(line.trim_end())?;

    let done_percent: u8 = caps["done"].parse().ok()?;
    if done_percent > 100 {
        return None;
    }

    Some(TorrentRecord {
        id: caps["id"].parse().ok()?,
        done_percent,
        have_mb: caps["have"].parse().ok()?,
        uploaded_mb: caps["up"].parse().ok()?,
        downloaded_mb: caps["down"].parse().ok()?,
        ratio: caps["ratio"].parse().ok()?,
        status: caps["status"].to_string(),
        name: caps["name"].to_string(),
    })
}

/// Lazily parses every record out of a full listing.
pub fn parse_listing(output: &str) -> impl Iterator<Item = TorrentRecord> + '_ {
    output.lines().filter_map(parse_line)
}
