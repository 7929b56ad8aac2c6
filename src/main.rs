use anyhow::{Context, Result};
use clap::Parser;
use torrent_archiver::{
    create_client, logging, App, ArchiverError, Cli, Config, InstanceLock, StopFlag,
    TerminalPrompt,
};

const PROGRAM_NAME: &str = "torrent-archiver";

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load_with_cli(&cli.config_overrides())
        .context("Failed to load configuration")?;

    logging::setup_logging(logging::resolve_level(
        cli.verbose,
        cli.quiet,
        &config.logging.level,
    ))?;

    config.validate().context("Invalid configuration")?;
    tracing::debug!(paths = ?config.paths, mount = ?config.mount, "Configuration loaded");

    let _lock = match InstanceLock::acquire(&config.paths.lock_file()) {
        Ok(lock) => lock,
        Err(ArchiverError::AlreadyRunning(_)) => {
            println!("{} already running", PROGRAM_NAME);
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to acquire instance lock"),
    };

    let stop = StopFlag::new();
    stop.install_sigint_handler()
        .context("Failed to install SIGINT handler")?;

    let client = create_client(&config.remote);
    let mut app = App::new(config, client, TerminalPrompt::stdio(), stop);

    torrent_archiver::run(&mut app, &cli.command)
}
