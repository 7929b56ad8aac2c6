use crate::api::listing::parse_listing;
use crate::api::TorrentClient;
use crate::config::RemoteConfig;
use crate::error::ArchiverResult;
use crate::process::run_command;
use crate::types::TorrentRecord;
use tracing::{debug, instrument};

/// Control actions understood by `transmission-remote -t <id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TorrentAction {
    Stop,
    Remove,
}

impl TorrentAction {
    pub fn flag(self) -> &'static str {
        match self {
            TorrentAction::Stop => "-S",
            TorrentAction::Remove => "-r",
        }
    }
}

/// Drives a transmission daemon through the `transmission-remote` tool.
pub struct TransmissionRemote {
    program: String,
    host: Option<String>,
    auth_credentials: Option<(String, String)>,
}

impl TransmissionRemote {
    /// Create a client talking to the tool's default daemon address
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            host: None,
            auth_credentials: None,
        }
    }

    /// Address a specific daemon (`host:port`)
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Authenticate with the daemon
    pub fn with_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth_credentials = Some((username.into(), password.into()));
        self
    }

    fn base_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(host) = &self.host {
            args.push(host.clone());
        }
        if let Some((username, password)) = &self.auth_credentials {
            args.push("-n".to_string());
            args.push(format!("{}:{}", username, password));
        }
        args
    }

    /// Arguments for the listing form.
    pub fn list_args(&self) -> Vec<String> {
        let mut args = self.base_args();
        args.push("-l".to_string());
        args
    }

    /// Arguments for acting on a single torrent.
    pub fn action_args(&self, id: u64, action: TorrentAction) -> Vec<String> {
        let mut args = self.base_args();
        args.push("-t".to_string());
        args.push(id.to_string());
        args.push(action.flag().to_string());
        args
    }

    /// Arguments as they may appear in logs.
    fn redacted(&self, args: &[String]) -> String {
        match &self.auth_credentials {
            Some((username, password)) => {
                let secret = format!("{}:{}", username, password);
                let shown = format!("{}:***", username);
                args.iter()
                    .map(|a| if *a == secret { shown.as_str() } else { a.as_str() })
                    .collect::<Vec<_>>()
                    .join(" ")
            }
            None => args.join(" "),
        }
    }

    fn run(&self, args: &[String]) -> ArchiverResult<String> {
        debug!(program = %self.program, args = %self.redacted(args), "Invoking control tool");
        let output = run_command(&self.program, args, &self.program)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn torrent_action(&self, id: u64, action: TorrentAction) -> ArchiverResult<()> {
        self.run(&self.action_args(id, action))?;
        debug!(torrent_id = id, %action, "Success");
        Ok(())
    }
}

impl TorrentClient for TransmissionRemote {
    #[instrument(skip(self), fields(api_op = "list"))]
    fn list(&self) -> ArchiverResult<Vec<TorrentRecord>> {
        let stdout = self.run(&self.list_args())?;
        let records: Vec<_> = parse_listing(&stdout).collect();
        debug!(count = records.len(), "Parsed torrent listing");
        Ok(records)
    }

    #[instrument(skip(self), fields(api_op = "stop"))]
    fn stop(&self, id: u64) -> ArchiverResult<()> {
        self.torrent_action(id, TorrentAction::Stop)
    }

    #[instrument(skip(self), fields(api_op = "remove"))]
    fn remove(&self, id: u64) -> ArchiverResult<()> {
        self.torrent_action(id, TorrentAction::Remove)
    }
}

/// Build the client described by the `[remote]` config section.
pub fn create_client(remote: &RemoteConfig) -> TransmissionRemote {
    let mut client = TransmissionRemote::new(remote.program.clone());
    if let Some(host) = &remote.host {
        client = client.with_host(host.clone());
    }
    if let Some((username, password)) = remote.credentials() {
        client = client.with_auth(username, password);
    }
    client
}
