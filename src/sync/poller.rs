//! Polling fallback scheduler
//!
//! Fixed-interval ticker that drives refreshes while the live channel is
//! down. Start and stop are idempotent, and dropping the scheduler clears
//! the timer, so no exit path can leak it.

use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Timer-driven fallback refresh mechanism
///
/// Owned exclusively by one coordinator; ticks are delivered on the channel
/// supplied at construction.
pub struct PollScheduler {
    interval: Duration,
    tick_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl PollScheduler {
    /// Create a stopped scheduler that will send ticks into `tick_tx`
    pub fn new(interval: Duration, tick_tx: mpsc::Sender<()>) -> Self {
        Self {
            interval,
            tick_tx,
            task: None,
        }
    }

    /// Start ticking; no-op if already running
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        debug!(
            interval_ms = self.interval.as_millis() as u64,
            "Starting poll scheduler"
        );
        let interval = self.interval;
        let tx = self.tick_tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The coordinator always refreshes before falling back to
            // polling, so the interval's immediate first tick is skipped.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        }));
    }

    /// Stop ticking; no-op if not running
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            debug!("Stopped poll scheduler");
        }
    }

    /// Whether a timer task is currently active
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::Receiver<()>) -> usize {
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        ticks
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_start_leaves_one_timer() {
        let (tx, mut rx) = mpsc::channel(32);
        let mut scheduler = PollScheduler::new(Duration::from_secs(20), tx);

        scheduler.start();
        scheduler.start();
        assert!(scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(61)).await;
        // A duplicated timer would have delivered six ticks here.
        assert_eq!(drain(&mut rx), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_double_stop_is_a_noop() {
        let (tx, mut rx) = mpsc::channel(32);
        let mut scheduler = PollScheduler::new(Duration::from_secs(20), tx);

        scheduler.start();
        scheduler.stop();
        scheduler.stop();
        assert!(!scheduler.is_running());

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(drain(&mut rx), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_after_stop() {
        let (tx, mut rx) = mpsc::channel(32);
        let mut scheduler = PollScheduler::new(Duration::from_secs(20), tx);

        scheduler.start();
        tokio::time::sleep(Duration::from_secs(21)).await;
        assert_eq!(drain(&mut rx), 1);

        scheduler.stop();
        scheduler.start();
        tokio::time::sleep(Duration::from_secs(21)).await;
        assert_eq!(drain(&mut rx), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_clears_timer() {
        let (tx, mut rx) = mpsc::channel(32);
        let mut scheduler = PollScheduler::new(Duration::from_secs(20), tx);
        scheduler.start();
        drop(scheduler);

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(drain(&mut rx), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_immediate_tick_on_start() {
        let (tx, mut rx) = mpsc::channel(32);
        let mut scheduler = PollScheduler::new(Duration::from_secs(20), tx);
        scheduler.start();

        tokio::time::sleep(Duration::from_secs(19)).await;
        assert_eq!(drain(&mut rx), 0);
    }
}
