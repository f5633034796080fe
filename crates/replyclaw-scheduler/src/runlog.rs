//! Append-only run log.
//!
//! One line per event, each prefixed with a local timestamp, mirrored to
//! the console so an attached operator sees what the file records.
//! Captured child output is archived as-is; stderr lines carry a tag so
//! the two streams stay distinct in the archive.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// The scheduler's log file.
#[derive(Debug, Clone)]
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub fn new(path: &Path) -> Self {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamped scheduler event line.
    pub fn log(&self, msg: &str) {
        let line = format!("[{}] {}", Local::now().format("%Y-%m-%d %H:%M:%S"), msg);
        println!("{line}");
        self.append(&line);
    }

    /// Captured child stdout line — mirrored to the console.
    pub fn capture_stdout(&self, line: &str) {
        println!("{line}");
        self.append(line);
    }

    /// Captured child stderr line — archived only, tagged.
    pub fn capture_stderr(&self, line: &str) {
        self.append(&format!("[STDERR] {line}"));
    }

    fn append(&self, line: &str) {
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| writeln!(file, "{line}"));
        if let Err(e) = result {
            tracing::warn!("⚠️ run log write failed: {e}");
        }
    }
}
