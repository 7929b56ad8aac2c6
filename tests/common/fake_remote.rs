//! A stand-in `transmission-remote` executable.
//!
//! The client passes its host argument first, so tests configure the host as
//! a per-test state directory. The script appends the remaining arguments to
//! `<state>/calls.log`, prints `<state>/listing.txt` for `-l`, and exits with
//! the code stored in `<state>/exit_code` (0 by default).
//!
//! The script is written once per test binary, before any test spawns it, to
//! avoid ETXTBSY from a concurrent fork holding the file open for writing.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use torrent_archiver::TransmissionRemote;

const SCRIPT: &str = r#"#!/bin/sh
dir="$1"
shift
printf '%s\n' "$*" >> "$dir/calls.log"
code=$(cat "$dir/exit_code" 2>/dev/null || echo 0)
if [ "$code" != "0" ]; then
    echo "Couldn't connect to server" >&2
    exit "$code"
fi
for arg in "$@"; do
    if [ "$arg" = "-l" ]; then
        cat "$dir/listing.txt"
    fi
done
"#;

fn script_path() -> &'static Path {
    static SCRIPT_PATH: OnceLock<PathBuf> = OnceLock::new();
    SCRIPT_PATH.get_or_init(|| {
        let dir = std::env::temp_dir().join(format!("fake-transmission-remote-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let program = dir.join("transmission-remote");
        fs::write(&program, SCRIPT).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();
        program
    })
}

pub struct FakeRemote {
    state: PathBuf,
}

impl FakeRemote {
    pub fn install(state: &Path, listing: &str) -> Self {
        script_path();
        fs::write(state.join("listing.txt"), listing).unwrap();
        Self {
            state: state.to_path_buf(),
        }
    }

    pub fn program(&self) -> String {
        script_path().display().to_string()
    }

    /// Host argument that points the script at this state directory.
    pub fn host(&self) -> String {
        self.state.display().to_string()
    }

    pub fn client(&self) -> TransmissionRemote {
        TransmissionRemote::new(self.program()).with_host(self.host())
    }

    pub fn fail_with(&self, code: i32) {
        fs::write(self.state.join("exit_code"), code.to_string()).unwrap();
    }

    /// One entry per invocation, arguments after the host joined by spaces.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.state.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
