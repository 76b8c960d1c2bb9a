use crate::client::BlockpadClient;
use crate::config::BlockpadConfig;
use crate::task::{cycle_tasks, BlockpadTask, ClaimFaucetTask, TaskContext};
use anyhow::Result;
use async_trait::async_trait;
use core_logic::{Account, ProxyConfig, Worker, WorkerRunner, WorkerStats};
use tokio::time::sleep;
use tracing::{error, info};

/// Drives one account forever: claim the faucet, then cycle through the
/// DeFi tasks with fixed pacing between every call.
pub struct AccountWorker {
    ctx: TaskContext,
    faucet: Box<dyn BlockpadTask>,
    tasks: Vec<Box<dyn BlockpadTask>>,
    config: BlockpadConfig,
}

impl AccountWorker {
    pub fn new(
        account: &Account,
        proxy: Option<&ProxyConfig>,
        config: &BlockpadConfig,
    ) -> Result<Self> {
        let client = BlockpadClient::new(&account.token, &account.label, proxy, config)?;

        Ok(Self::with_tasks(
            TaskContext::new(client),
            Box::new(ClaimFaucetTask::new()),
            cycle_tasks(config),
            config,
        ))
    }

    /// Builds a worker around an explicit faucet task and cycle list.
    pub fn with_tasks(
        ctx: TaskContext,
        faucet: Box<dyn BlockpadTask>,
        tasks: Vec<Box<dyn BlockpadTask>>,
        config: &BlockpadConfig,
    ) -> Self {
        Self {
            ctx,
            faucet,
            tasks,
            config: config.clone(),
        }
    }

    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.ctx.client.proxy()
    }

    /// Runs every cycle task once, in order, pausing `op_delay` after each.
    ///
    /// A skipped operation does not stop the cycle; only a fault outside the
    /// retry policy does.
    pub async fn run_cycle(&self) -> Result<WorkerStats> {
        let mut stats = WorkerStats::default();

        for task in &self.tasks {
            let result = task.run(&self.ctx).await?;
            if result.is_none() {
                info!(
                    target: core_logic::TASK_RESULT_TARGET,
                    "⏭️ [{}] Skipped {} this round",
                    self.ctx.label(),
                    task.name()
                );
            }
            stats.record(result.is_some());
            sleep(self.config.op_delay()).await;
        }

        Ok(stats)
    }

    /// One faucet claim followed by cycles that never end. Errors escaping a
    /// cycle are logged and the cycle restarts after `cycle_error_delay`.
    async fn session(&self) -> Result<()> {
        let label = self.ctx.label();

        self.faucet.run(&self.ctx).await?;
        sleep(self.config.op_delay()).await;

        loop {
            match WorkerRunner::guard("operation cycle", self.run_cycle()).await {
                Ok(stats) => {
                    info!(
                        "🔄 [{}]: Completing one cycle ({}/{} done), starting next...",
                        label,
                        stats.done,
                        stats.total()
                    );
                    sleep(self.config.cycle_delay()).await;
                }
                Err(e) => {
                    error!("❌ [{}] - Error in operation cycle: {:#}", label, e);
                    sleep(self.config.cycle_error_delay()).await;
                }
            }
        }
    }
}

#[async_trait]
impl Worker for AccountWorker {
    fn label(&self) -> &str {
        self.ctx.label()
    }

    async fn run(&self) -> Result<()> {
        let label = self.ctx.label();
        info!("🔐 Starting tasks for account: {}...", label);
        if let Some(proxy) = self.proxy() {
            info!("🌐 [{}] Using proxy: {}", label, proxy.url);
        }

        let name = format!("[{}]", label);
        WorkerRunner::supervise(&name, self.config.restart_delay(), || self.session()).await;
        Ok(())
    }
}
