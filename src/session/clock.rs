use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Whole seconds elapsed since the session started.
///
/// Each run counts into its own counter, so an increment racing with `stop`
/// can never leak into the next run.
pub struct SessionClock {
    elapsed: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            elapsed: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    /// Start counting from zero. Must be called inside a tokio runtime.
    pub fn start(&mut self) {
        self.stop();

        let elapsed = Arc::clone(&self.elapsed);
        self.task = Some(tokio::spawn(async move {
            // First tick one full period after start
            let mut ticker = interval_at(Instant::now() + TICK, TICK);
            loop {
                ticker.tick().await;
                elapsed.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    /// Cancel the interval, reset to zero and return the final count.
    pub fn stop(&mut self) -> u64 {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        let finished = std::mem::replace(&mut self.elapsed, Arc::new(AtomicU64::new(0)));
        finished.load(Ordering::SeqCst)
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionClock {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
