pub mod api;
pub mod app;
pub mod archive;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod logging;
pub mod mount;
pub mod process;
pub mod prompt;
pub mod select;
pub mod types;

pub use api::{create_client, TorrentClient, TransmissionRemote};
pub use app::{App, StatusLine};
pub use archive::{Archiver, BatchKind, BatchReport};
pub use cancel::StopFlag;
pub use cli::{Cli, Commands};
pub use config::{CliArgs, Config};
pub use error::{ArchiverError, ArchiverResult};
pub use lock::InstanceLock;
pub use mount::MountGuard;
pub use prompt::{Prompt, TerminalPrompt};
pub use select::Selection;
pub use types::TorrentRecord;

use anyhow::{Context, Result};

/// Runs one subcommand to completion.
pub fn run<C: TorrentClient, P: Prompt>(app: &mut App<C, P>, command: &Commands) -> Result<()> {
    tracing::debug!(command = ?command, "Dispatching");

    let report = match command {
        Commands::Info => {
            let mut stdout = std::io::stdout().lock();
            app.info(&mut stdout).context("Failed to list torrents")?;
            None
        }
        Commands::Mount => {
            app.mount().context("Mount command failed")?;
            None
        }
        Commands::Unmount => {
            app.unmount().context("Unmount command failed")?;
            None
        }
        Commands::ArchiveById { .. } | Commands::ArchiveByRatio { .. } | Commands::ArchiveAll => {
            let selection = command
                .selection()
                .context("Archive command without a selection")?;
            app.archive(&selection).context("Failed to archive torrents")?
        }
        Commands::SyncById { .. } | Commands::SyncAll => {
            let selection = command
                .selection()
                .context("Sync command without a selection")?;
            app.sync(&selection).context("Failed to sync torrents")?
        }
        Commands::DeleteFromArchive { torrent_id } => app
            .delete_from_archive(*torrent_id)
            .with_context(|| format!("Failed to delete archive of torrent {}", torrent_id))?,
    };

    if let Some(report) = report {
        if report.interrupted {
            tracing::warn!(
                not_started = report.not_started(),
                "Stopped early on request"
            );
        }
    }

    Ok(())
}
