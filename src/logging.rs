use anyhow::Result;
use tracing::Level;

/// Resolves the effective level: `-q` beats `-v`, and either beats the
/// configured level.
pub fn resolve_level(verbose: u8, quiet: bool, configured: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => configured.parse().unwrap_or(Level::INFO),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs the global subscriber. Logs go to stderr so that stdout carries
/// only listings and prompts.
pub fn setup_logging(level: Level) -> Result<()> {
    use tracing_subscriber::fmt;

    let subscriber = fmt()
        .with_max_level(level)
        .with_target(level >= Level::DEBUG)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
