use crate::error::CoreError;
use crate::traits::Worker;
use anyhow::Result;
use futures::FutureExt;
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Once;
use std::time::Duration;
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{error, info, warn, Instrument};
use tracing_appender::non_blocking::WorkerGuard;

static SHUTDOWN_HOOK: Once = Once::new();

pub struct WorkerRunner;

impl WorkerRunner {
    /// Registers the Ctrl+C hook. Later calls are no-ops.
    ///
    /// The hook exits the process immediately with code 0; in-flight
    /// requests are not drained. It takes ownership of the file logger's
    /// guard so the stop message is flushed to disk before exiting.
    pub fn install_shutdown_hook(log_guard: Option<WorkerGuard>) {
        SHUTDOWN_HOOK.call_once(move || {
            tokio::spawn(async move {
                match signal::ctrl_c().await {
                    Ok(()) => {
                        announce_stop(log_guard);
                        std::process::exit(0);
                    }
                    Err(err) => {
                        error!("Unable to listen for shutdown signal: {}", err);
                    }
                }
            });
        });
    }

    /// Spawns every worker as its own task and waits for them.
    ///
    /// Workers are expected to run forever. The first one that fails or
    /// panics ends the whole run with an error; dropping the set aborts the
    /// remaining workers so a restart never doubles them up.
    pub async fn run_workers(workers: Vec<Box<dyn Worker>>) -> Result<()> {
        let mut set = JoinSet::new();
        info!("Starting {} account workers...", workers.len());

        for (i, worker) in workers.into_iter().enumerate() {
            let id = i + 1;
            let span = tracing::info_span!(
                "worker",
                worker_id = format!("{:03}", id),
                label = worker.label()
            );

            set.spawn(
                async move {
                    let label = worker.label().to_string();
                    (label, worker.run().await)
                }
                .instrument(span),
            );
        }

        while let Some(res) = set.join_next().await {
            match res {
                Ok((label, Ok(()))) => {
                    warn!("Worker [{}] returned, remaining workers keep running", label);
                }
                Ok((label, Err(e))) => {
                    error!("Worker [{}] failed: {:#}", label, e);
                    return Err(e.context(format!("worker [{}] failed", label)));
                }
                Err(e) => {
                    error!("A worker task panicked or failed to join: {:?}", e);
                    return Err(anyhow::anyhow!("worker task aborted: {}", e));
                }
            }
        }

        Ok(())
    }

    /// Runs `unit` to completion, turning a panic into a [`CoreError::Panicked`].
    pub async fn guard<T, Fut>(name: &str, unit: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        match AssertUnwindSafe(unit).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(CoreError::Panicked {
                name: name.to_string(),
                message: panic_message(payload.as_ref()),
            }
            .into()),
        }
    }

    /// Re-runs the unit built by `make_unit` forever.
    ///
    /// Whenever the unit ends, by error, panic, or plain return, the failure
    /// is logged and the next run starts after `delay`. There is no restart
    /// limit.
    pub async fn supervise<F, Fut>(name: &str, delay: Duration, mut make_unit: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        loop {
            match Self::guard(name, make_unit()).await {
                Ok(()) => warn!("{} returned unexpectedly, restarting", name),
                Err(e) => error!("❌ {} - Major error, restarting: {:#}", name, e),
            }
            tokio::time::sleep(delay).await;
        }
    }
}

/// Logs the stop message, then drops the guard to flush the file writer.
fn announce_stop(log_guard: Option<WorkerGuard>) {
    info!("🛑 Received stop signal. Shutting down...");
    drop(log_guard);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_guard_passes_results_through() {
        let ok = WorkerRunner::guard("unit", async { Ok(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err: Result<()> =
            WorkerRunner::guard("unit", async { Err(anyhow::anyhow!("nope")) }).await;
        assert_eq!(err.unwrap_err().to_string(), "nope");
    }

    #[tokio::test]
    async fn test_guard_catches_panics() {
        let res: Result<()> = WorkerRunner::guard("unit", async {
            if true {
                panic!("exploded");
            }
            Ok(())
        })
        .await;

        let err = res.unwrap_err();
        assert!(err.to_string().contains("'unit' panicked: exploded"));
    }

    #[test]
    fn test_stop_message_is_flushed_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("stop.log");
        let file = std::fs::File::create(&log_path).unwrap();
        let (writer, guard) = tracing_appender::non_blocking(file);
        let subscriber = tracing_subscriber::fmt()
            .with_writer(writer)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || announce_stop(Some(guard)));

        let written = std::fs::read_to_string(&log_path).unwrap();
        assert!(written.contains("Received stop signal"));
    }
}
