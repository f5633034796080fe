//! Isolated job execution — one dispatch run as a separate unit of work.
//!
//! The scheduler never runs a dispatch in-process: a crash or hang in the
//! automation surface must not take the tick loop down with it. The trait
//! keeps the loop testable without a browser anywhere near the tests.

use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};

use replyclaw_core::{ReplyClawError, Result};

use crate::runlog::RunLog;

/// Spawns one dispatch run, streams its output into the log, and waits
/// for completion.
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run_job(&self, log: &RunLog) -> Result<()>;
}

/// Production runner: spawns the dispatch binary with `--today` and drains
/// both output streams line-by-line into the run log.
pub struct ProcessRunner {
    bot_bin: PathBuf,
}

impl ProcessRunner {
    pub fn new(bot_bin: PathBuf) -> Self {
        Self { bot_bin }
    }
}

#[async_trait]
impl JobRunner for ProcessRunner {
    async fn run_job(&self, log: &RunLog) -> Result<()> {
        let mut child = tokio::process::Command::new(&self.bot_bin)
            .arg("--today")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ReplyClawError::Scheduler(format!(
                    "spawn {} failed: {e}",
                    self.bot_bin.display()
                ))
            })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        // Both streams drain concurrently so neither pipe can fill up and
        // stall the child.
        let out_log = log.clone();
        let out_task = tokio::spawn(async move {
            if let Some(stdout) = stdout {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    out_log.capture_stdout(&line);
                }
            }
        });
        let err_log = log.clone();
        let err_task = tokio::spawn(async move {
            if let Some(stderr) = stderr {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    err_log.capture_stderr(&line);
                }
            }
        });

        let status = child
            .wait()
            .await
            .map_err(|e| ReplyClawError::Scheduler(format!("wait for dispatch failed: {e}")))?;
        let _ = out_task.await;
        let _ = err_task.await;

        if !status.success() {
            return Err(ReplyClawError::Scheduler(format!(
                "dispatch run exited with {status}"
            )));
        }
        Ok(())
    }
}
