use crate::config::CliArgs;
use crate::select::Selection;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "torrent-archiver")]
#[command(about = "Archive, sync and clean up finished transmission torrents")]
pub struct Cli {
    /// Config file (TOML, or JSON by extension)
    #[arg(short, long, global = true, env = "TORRENT_ARCHIVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the archive root
    #[arg(long, global = true)]
    pub archive_dir: Option<PathBuf>,

    /// Override the download root
    #[arg(long, global = true)]
    pub download_dir: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity")]
    pub verbose: u8,

    #[arg(short, long, global = true, help = "Only log errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Commands {
    /// List finished torrents and whether each is in the archive
    Info,
    /// Run the configured mount command
    Mount,
    /// Run the configured unmount command
    Unmount,
    /// Archive the given torrents
    ArchiveById {
        #[arg(required = true)]
        torrent_ids: Vec<u64>,
    },
    /// Offer every torrent below the seed ratio for archiving
    ArchiveByRatio { archive_ratio: f64 },
    /// Archive every finished torrent
    ArchiveAll,
    /// Copy the given torrents into the archive, keeping them seeding
    SyncById {
        #[arg(required = true)]
        torrent_ids: Vec<u64>,
    },
    /// Copy every finished torrent into the archive
    SyncAll,
    /// Remove a torrent's empty archive directory
    DeleteFromArchive { torrent_id: u64 },
}

impl Cli {
    pub fn config_overrides(&self) -> CliArgs {
        CliArgs {
            config_file: self.config.clone(),
            archive_dir: self.archive_dir.clone(),
            download_dir: self.download_dir.clone(),
        }
    }
}

impl Commands {
    /// The records a batch subcommand works on, or `None` for commands that
    /// run no batch.
    pub fn selection(&self) -> Option<Selection> {
        match self {
            Commands::ArchiveById { torrent_ids } | Commands::SyncById { torrent_ids } => {
                Selection::from_flags(false, Some(torrent_ids.clone()), None)
            }
            Commands::ArchiveByRatio { archive_ratio } => {
                Selection::from_flags(false, None, Some(*archive_ratio))
            }
            Commands::ArchiveAll | Commands::SyncAll => Selection::from_flags(true, None, None),
            Commands::DeleteFromArchive { torrent_id } => {
                Selection::from_flags(false, Some(vec![*torrent_id]), None)
            }
            Commands::Info | Commands::Mount | Commands::Unmount => None,
        }
    }
}
