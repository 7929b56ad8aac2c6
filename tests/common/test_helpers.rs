//! Consolidated test helpers for torrent-archiver
//!
//! # Usage
//!
//! ```rust
//! let env = TestEnvironment::new(vec![fixtures::example_torrent()]);
//! env.seed_download("ExampleTorrent");
//! let mut app = env.app(&mut prompt);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use torrent_archiver::{
    App, ArchiverResult, Config, Prompt, StopFlag, TorrentClient, TorrentRecord,
};

/// A client call as observed by [`FakeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Stop(u64),
    Remove(u64),
}

/// In-memory torrent client that records every call.
pub struct FakeClient {
    records: Vec<TorrentRecord>,
    calls: RefCell<Vec<Call>>,
    stop_on: Option<(u64, StopFlag)>,
}

impl FakeClient {
    pub fn new(records: Vec<TorrentRecord>) -> Self {
        Self {
            records,
            calls: RefCell::new(Vec::new()),
            stop_on: None,
        }
    }

    /// Requests a stop on `flag` while torrent `id` is being stopped,
    /// like a SIGINT arriving in the middle of that record.
    pub fn interrupt_during(mut self, id: u64, flag: StopFlag) -> Self {
        self.stop_on = Some((id, flag));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls other than listings.
    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| *c != Call::List)
            .collect()
    }
}

impl TorrentClient for FakeClient {
    fn list(&self) -> ArchiverResult<Vec<TorrentRecord>> {
        self.calls.borrow_mut().push(Call::List);
        Ok(self.records.clone())
    }

    fn stop(&self, id: u64) -> ArchiverResult<()> {
        self.calls.borrow_mut().push(Call::Stop(id));
        if let Some((target, flag)) = &self.stop_on {
            if *target == id {
                flag.request_stop();
            }
        }
        Ok(())
    }

    fn remove(&self, id: u64) -> ArchiverResult<()> {
        self.calls.borrow_mut().push(Call::Remove(id));
        Ok(())
    }
}

/// Prompt answering from a script and remembering what it was asked.
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
    pub questions: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            questions: Vec::new(),
        }
    }

    pub fn unanswered(&self) -> usize {
        self.answers.len()
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str, _hint: &str) -> ArchiverResult<String> {
        self.questions.push(question.to_string());
        Ok(self
            .answers
            .pop_front()
            .expect("prompt asked more questions than the script answers"))
    }
}

/// Temporary download and archive trees plus a fake client.
pub struct TestEnvironment {
    pub temp_dir: TempDir,
    pub config: Config,
    pub client: FakeClient,
    pub stop: StopFlag,
}

impl TestEnvironment {
    pub fn new(records: Vec<TorrentRecord>) -> Self {
        Self::with_client(|_| FakeClient::new(records))
    }

    /// Builds the client with access to the environment's stop flag.
    pub fn with_client(make: impl FnOnce(&StopFlag) -> FakeClient) -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = create_test_config(temp_dir.path());
        fs::create_dir(&config.paths.archive_dir).unwrap();
        fs::create_dir(&config.paths.download_dir).unwrap();
        let stop = StopFlag::new();
        let client = make(&stop);

        Self {
            temp_dir,
            config,
            client,
            stop,
        }
    }

    pub fn with_mount_commands(mut self) -> Self {
        self.config.mount.mount_command = Some(shell_append(&self.events_file(), "mount"));
        self.config.mount.unmount_command = Some(shell_append(&self.events_file(), "unmount"));
        self
    }

    pub fn app<'a>(
        &'a self,
        prompt: &'a mut ScriptedPrompt,
    ) -> App<&'a FakeClient, &'a mut ScriptedPrompt> {
        App::new(self.config.clone(), &self.client, prompt, self.stop.clone())
    }

    pub fn download(&self, name: &str) -> PathBuf {
        self.config.paths.download_dir.join(name)
    }

    pub fn archived(&self, name: &str) -> PathBuf {
        self.config.paths.archive_dir.join(name)
    }

    /// Creates a download directory with a couple of nested files.
    pub fn seed_download(&self, name: &str) {
        write_tree(&self.download(name), name);
    }

    /// Creates an archive directory with a couple of nested files.
    pub fn seed_archive(&self, name: &str) {
        write_tree(&self.archived(name), "archived copy");
    }

    pub fn events_file(&self) -> PathBuf {
        self.temp_dir.path().join("events")
    }

    /// Lines appended by the mount/unmount commands.
    pub fn events(&self) -> Vec<String> {
        fs::read_to_string(self.events_file())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}

pub fn create_test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.paths.archive_dir = root.join("archive");
    config.paths.download_dir = root.join("downloads");
    config.paths.lock_file = Some(root.join("torrent-archiver.pid"));
    config
}

fn shell_append(file: &Path, word: &str) -> String {
    format!("echo {} >> '{}'", word, file.display())
}

fn write_tree(dir: &Path, content: &str) {
    fs::create_dir_all(dir.join("extras")).unwrap();
    fs::write(dir.join("payload.bin"), content.as_bytes()).unwrap();
    fs::write(dir.join("extras").join("notes.txt"), b"notes").unwrap();
}

/// Every file under `dir` with its content, sorted by relative path.
pub fn snapshot(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files: Vec<_> = walkdir::WalkDir::new(dir)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            (
                e.path().strip_prefix(dir).unwrap().to_path_buf(),
                fs::read(e.path()).unwrap(),
            )
        })
        .collect();
    files.sort();
    files
}
