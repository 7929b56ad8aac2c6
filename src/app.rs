//! One method per subcommand: fetch, select, confirm, then run the batch
//! inside the mount guard.

use crate::api::TorrentClient;
use crate::archive::{Archiver, BatchReport};
use crate::cancel::StopFlag;
use crate::config::Config;
use crate::error::ArchiverResult;
use crate::mount::MountGuard;
use crate::prompt::Prompt;
use crate::select::{select_interactive, Selection};
use crate::types::TorrentRecord;
use std::fmt;
use std::io::Write;
use tracing::info;

/// A row of the `info` listing.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusLine {
    pub id: u64,
    pub name: String,
    pub ratio: f64,
    pub done_percent: u8,
    pub synced: bool,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4}  {:<8}  ratio {:>6.2}  {:>3}%  {}",
            self.id,
            if self.synced { "SYNCED" } else { "UNSYNCED" },
            self.ratio,
            self.done_percent,
            self.name
        )
    }
}

pub struct App<C, P> {
    config: Config,
    client: C,
    prompt: P,
    stop: StopFlag,
    guard: MountGuard,
}

impl<C: TorrentClient, P: Prompt> App<C, P> {
    pub fn new(config: Config, client: C, prompt: P, stop: StopFlag) -> Self {
        let guard = MountGuard::from_config(&config.mount);
        Self {
            config,
            client,
            prompt,
            stop,
            guard,
        }
    }

    fn archiver(&self) -> Archiver<'_, C> {
        Archiver::new(&self.client, &self.config.paths, self.stop.clone())
    }

    /// Lists every finished torrent and whether it has an archive copy.
    pub fn info<W: Write>(&self, out: &mut W) -> ArchiverResult<Vec<StatusLine>> {
        let archiver = self.archiver();
        let lines = self.guard.run(|| {
            let lines: Vec<StatusLine> = self
                .client
                .list()?
                .into_iter()
                .map(|record| StatusLine {
                    synced: archiver.is_archived(&record),
                    id: record.id,
                    name: record.name,
                    ratio: record.ratio,
                    done_percent: record.done_percent,
                })
                .collect();
            for line in &lines {
                writeln!(out, "{}", line)?;
            }
            Ok(lines)
        })?;
        Ok(lines)
    }

    pub fn mount(&self) -> ArchiverResult<()> {
        self.guard.mount()
    }

    pub fn unmount(&self) -> ArchiverResult<()> {
        self.guard.unmount()
    }

    /// Archives the selected torrents after the operator confirms the list.
    /// Archiving everything needs an extra up-front confirmation.
    pub fn archive(&mut self, selection: &Selection) -> ArchiverResult<Option<BatchReport>> {
        if matches!(selection, Selection::All)
            && !self
                .prompt
                .confirm("Archive all. Are you sure?", "Y/n:", "Y")?
        {
            info!("Archive all declined");
            return Ok(None);
        }
        let records = self.prepare(selection)?;
        self.confirm_and_archive(records)
    }

    pub fn sync(&mut self, selection: &Selection) -> ArchiverResult<Option<BatchReport>> {
        let records = self.prepare(selection)?;
        self.guarded(records, |archiver, records| archiver.sync(records))
    }

    pub fn delete_from_archive(&mut self, id: u64) -> ArchiverResult<Option<BatchReport>> {
        let records = self.prepare(&Selection::ids([id]))?;
        self.guarded(records, |archiver, records| {
            archiver.delete_from_archive(records)
        })
    }

    fn prepare(&mut self, selection: &Selection) -> ArchiverResult<Vec<TorrentRecord>> {
        let records = self.client.list()?;
        select_interactive(records, selection, &mut self.prompt)
    }

    fn confirm_and_archive(
        &mut self,
        records: Vec<TorrentRecord>,
    ) -> ArchiverResult<Option<BatchReport>> {
        if records.is_empty() {
            info!("No torrents selected, nothing to do");
            return Ok(None);
        }

        let names = records
            .iter()
            .map(|r| format!("  {}", r.name))
            .collect::<Vec<_>>()
            .join("\n");
        let question = format!("Will archive the following torrents:\n{}", names);
        if !self.prompt.confirm(&question, "Continue? y/n:", "y")? {
            info!("Archive declined");
            return Ok(None);
        }

        self.guarded(records, |archiver, records| archiver.archive(records))
    }

    fn guarded<F>(
        &self,
        records: Vec<TorrentRecord>,
        batch: F,
    ) -> ArchiverResult<Option<BatchReport>>
    where
        F: FnOnce(&Archiver<'_, C>, &[TorrentRecord]) -> ArchiverResult<BatchReport>,
    {
        if records.is_empty() {
            info!("No torrents selected, nothing to do");
            return Ok(None);
        }
        let archiver = self.archiver();
        self.guard
            .run(|| batch(&archiver, &records))
            .map(Some)
    }
}
