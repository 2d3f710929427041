//! Shared harness for CLI integration tests.
//!
//! [`Workspace`] lays out an input directory, an output directory and stub
//! `ffmpeg`/`ffprobe` scripts inside a temp dir, and builds a `crfbatch`
//! command pointed at them through a config file.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use assert_cmd::prelude::*;
use tempfile::TempDir;

/// Stub ffprobe reporting a 1.2 Mb/s video stream (CRF 32).
pub const FFPROBE_1200K: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then echo "ffprobe version stub"; exit 0; fi
echo 1200000
"#;

/// Stub ffmpeg that writes the first 100 bytes of its input to the output
/// path (its last argument), failing for inputs named `v2.mp4`.
pub const FFMPEG_FAILS_V2: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then echo "ffmpeg version stub"; exit 0; fi
case "$2" in
  *v2.mp4) echo "corrupt input" >&2; exit 1 ;;
esac
for last; do :; done
head -c 100 "$2" > "$last"
"#;

/// Stub ffmpeg that always fails.
pub const FFMPEG_ALWAYS_FAILS: &str = "#!/bin/sh\necho \"encoder crashed\" >&2\nexit 1\n";

#[allow(deprecated)]
pub fn crfbatch_cmd() -> Command {
    Command::cargo_bin("crfbatch").unwrap()
}

/// Scratch layout for one CLI run.
pub struct Workspace {
    pub root: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("in")).unwrap();
        Self { root }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    pub fn input_dir(&self) -> PathBuf {
        self.path().join("in")
    }

    pub fn output_dir(&self) -> PathBuf {
        self.path().join("out")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.path().join("reference.txt")
    }

    pub fn log_file(&self) -> PathBuf {
        self.path().join("run.log")
    }

    /// Create `name` in the input directory with `len` bytes.
    pub fn add_input(&self, name: &str, len: usize) {
        fs::write(self.input_dir().join(name), vec![b'v'; len]).unwrap();
    }

    /// Write an executable shell script under `bin/`.
    #[cfg(unix)]
    pub fn stub(&self, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let path = bin.join(name);
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Write `crfbatch.toml` pointing at the given tools.
    pub fn config(&self, ffmpeg: &Path, ffprobe: Option<&Path>) -> PathBuf {
        let mut toml = format!("[tools]\nffmpeg_path = {:?}\n", ffmpeg.display().to_string());
        if let Some(ffprobe) = ffprobe {
            toml.push_str(&format!("ffprobe_path = {:?}\n", ffprobe.display().to_string()));
        }
        let path = self.path().join("crfbatch.toml");
        fs::write(&path, toml).unwrap();
        path
    }

    /// Command for a full run with every file location inside the workspace.
    pub fn command(&self, config: &Path) -> Command {
        let mut cmd = crfbatch_cmd();
        cmd.current_dir(self.path())
            .arg("--config")
            .arg(config)
            .arg("--input")
            .arg(self.input_dir())
            .arg("--output")
            .arg(self.output_dir())
            .arg("--log-file")
            .arg(self.log_file())
            .arg("--audit-log")
            .arg(self.audit_log());
        cmd
    }
}
