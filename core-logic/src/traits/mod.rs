use anyhow::Result;
use async_trait::async_trait;

/// Per-cycle tally of operation outcomes
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub done: u64,
    pub skipped: u64,
}

impl WorkerStats {
    pub fn record(&mut self, done: bool) {
        if done {
            self.done += 1;
        } else {
            self.skipped += 1;
        }
    }

    pub fn total(&self) -> u64 {
        self.done + self.skipped
    }
}

/// A long-running unit of work for one account.
#[async_trait]
pub trait Worker: Send + Sync {
    /// Display name used in log lines
    fn label(&self) -> &str;

    /// Runs until the process exits. Returning at all is abnormal.
    async fn run(&self) -> Result<()>;
}
