//! The scheduler tick loop.
//!
//! A short poll checks whether a tick is due; a due tick launches a run
//! only when the time window is open and no prior run still holds the
//! guard. The run itself is spawned off the poll loop, so operator
//! cancellation stays responsive while a run is in flight.

use chrono::{Local, Timelike};
use std::sync::Arc;
use std::time::Duration;

use crate::gate::TimeWindow;
use crate::guard::RunGuard;
use crate::runlog::RunLog;
use crate::runner::JobRunner;

/// Recurring launcher for dispatch runs.
pub struct Scheduler {
    window: TimeWindow,
    guard: RunGuard,
    tick_interval: Duration,
    poll_interval: Duration,
    runner: Arc<dyn JobRunner>,
    log: RunLog,
}

impl Scheduler {
    pub fn new(
        window: TimeWindow,
        tick_interval: Duration,
        poll_interval: Duration,
        runner: Arc<dyn JobRunner>,
        log: RunLog,
    ) -> Self {
        Self {
            window,
            guard: RunGuard::new(),
            tick_interval,
            poll_interval,
            runner,
            log,
        }
    }

    /// One tick: gate → guard → spawn. Returns whether a run was launched.
    pub fn tick(&self) -> bool {
        self.tick_at(&Local::now())
    }

    fn tick_at<T: Timelike>(&self, now: &T) -> bool {
        if !self.window.contains(now) {
            // Outside the window the scheduler idles silently.
            return false;
        }
        let Some(permit) = self.guard.try_acquire() else {
            self.log
                .log("[SKIP] previous run still in progress — dropping this cycle");
            return false;
        };

        let runner = Arc::clone(&self.runner);
        let log = self.log.clone();
        let run_id = uuid::Uuid::new_v4();
        tokio::spawn(async move {
            // The permit lives until the run's output is fully drained.
            let _permit = permit;
            log.log(&"=".repeat(50));
            log.log(&format!("dispatch run {run_id} starting"));
            if let Err(e) = runner.run_job(&log).await {
                log.log(&format!("[ERROR] dispatch run {run_id} failed: {e}"));
            }
            log.log(&format!("dispatch run {run_id} finished"));
            log.log(&"=".repeat(50));
        });
        true
    }

    /// Run until the operator interrupts. Fires once immediately, then on
    /// every elapsed `tick_interval`, checking every `poll_interval`.
    /// Ctrl+C stops scheduling; an in-flight run completes on its own.
    pub async fn run_until_interrupted(&self) {
        self.log.log(&"=".repeat(50));
        self.log.log("reply dispatch scheduler starting");
        self.log.log(&format!(
            "cycle: {:02}:00–{:02}:00, every {} min",
            self.window.start_hour,
            self.window.end_hour,
            self.tick_interval.as_secs() / 60
        ));
        self.log
            .log(&format!("log file: {}", self.log.path().display()));
        self.log.log("press Ctrl+C to stop");
        self.log.log(&"=".repeat(50));

        self.tick();

        let mut next_due = tokio::time::Instant::now() + self.tick_interval;
        let mut poll = tokio::time::interval(self.poll_interval);
        poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = poll.tick() => {
                    if tokio::time::Instant::now() >= next_due {
                        next_due += self.tick_interval;
                        self.tick();
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    self.log.log("scheduler stopped");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::NaiveTime;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRunner {
        runs: AtomicUsize,
        hold: tokio::sync::Notify,
        blocking: bool,
    }

    impl CountingRunner {
        fn blocking() -> Self {
            Self {
                runs: AtomicUsize::new(0),
                hold: tokio::sync::Notify::new(),
                blocking: true,
            }
        }
    }

    #[async_trait]
    impl JobRunner for CountingRunner {
        async fn run_job(&self, _log: &RunLog) -> replyclaw_core::Result<()> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.blocking {
                self.hold.notified().await;
            }
            Ok(())
        }
    }

    fn temp_log(name: &str) -> RunLog {
        let path = std::env::temp_dir()
            .join("replyclaw-test-engine")
            .join(name);
        std::fs::remove_file(&path).ok();
        RunLog::new(&path)
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn scheduler(runner: Arc<CountingRunner>, log: RunLog) -> Scheduler {
        Scheduler::new(
            TimeWindow::default(),
            Duration::from_secs(1800),
            Duration::from_secs(30),
            runner,
            log,
        )
    }

    #[tokio::test]
    async fn test_tick_outside_window_is_a_silent_noop() {
        let runner = Arc::new(CountingRunner::default());
        let log = temp_log("outside.log");
        let sched = scheduler(Arc::clone(&runner), log.clone());

        assert!(!sched.tick_at(&at(23, 10)));

        tokio::task::yield_now().await;
        assert_eq!(runner.runs.load(Ordering::SeqCst), 0);
        // Not even a skip notice is written.
        assert!(std::fs::read_to_string(log.path()).unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn test_overlapping_tick_is_dropped_with_notice() {
        let runner = Arc::new(CountingRunner::blocking());
        let log = temp_log("overlap.log");
        let sched = scheduler(Arc::clone(&runner), log.clone());

        assert!(sched.tick_at(&at(10, 0)));
        // Second tick fires while the first run still holds the guard.
        assert!(!sched.tick_at(&at(10, 30)));

        runner.hold.notify_one();
        while sched.guard.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        assert_eq!(runner.runs.load(Ordering::SeqCst), 1);
        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content
                .lines()
                .filter(|l| l.contains("previous run still in progress"))
                .count(),
            1
        );
        assert_eq!(
            content.lines().filter(|l| l.contains("starting")).count(),
            1
        );
    }

    #[tokio::test]
    async fn test_guard_released_after_failed_run() {
        struct FailingRunner;
        #[async_trait]
        impl JobRunner for FailingRunner {
            async fn run_job(&self, _log: &RunLog) -> replyclaw_core::Result<()> {
                Err(replyclaw_core::ReplyClawError::Scheduler("boom".into()))
            }
        }

        let log = temp_log("failed.log");
        let sched = Scheduler::new(
            TimeWindow::default(),
            Duration::from_secs(1800),
            Duration::from_secs(30),
            Arc::new(FailingRunner),
            log.clone(),
        );

        assert!(sched.tick_at(&at(12, 0)));
        while sched.guard.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("[ERROR]"));
        // The slot is free again: the next cycle can run.
        assert!(sched.tick_at(&at(12, 30)));
        while sched.guard.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    #[tokio::test]
    async fn test_consecutive_ticks_run_when_slot_is_free() {
        let runner = Arc::new(CountingRunner::default());
        let log = temp_log("consecutive.log");
        let sched = scheduler(Arc::clone(&runner), log);

        assert!(sched.tick_at(&at(9, 0)));
        while sched.guard.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(sched.tick_at(&at(9, 30)));
        while sched.guard.is_busy() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert_eq!(runner.runs.load(Ordering::SeqCst), 2);
    }
}
