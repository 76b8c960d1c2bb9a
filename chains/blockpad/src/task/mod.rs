//! BlockPad tasks
//!
//! Each task wraps exactly one client operation together with the
//! parameters it is run with. The worker claims the faucet once per session
//! and then loops over [`cycle_tasks`] in order.

use crate::client::BlockpadClient;
use crate::config::BlockpadConfig;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub mod t01_claim_faucet;
pub mod t02_swap;
pub mod t03_add_liquidity;
pub mod t04_remove_liquidity;
pub mod t05_stake;
pub mod t06_unstake;

pub use t01_claim_faucet::ClaimFaucetTask;
pub use t02_swap::SwapTask;
pub use t03_add_liquidity::AddLiquidityTask;
pub use t04_remove_liquidity::RemoveLiquidityTask;
pub use t05_stake::StakeTask;
pub use t06_unstake::UnstakeTask;

/// Everything a task needs to talk to the API for one account.
#[derive(Clone)]
pub struct TaskContext {
    pub client: BlockpadClient,
}

impl TaskContext {
    pub fn new(client: BlockpadClient) -> Self {
        Self { client }
    }

    pub fn label(&self) -> &str {
        self.client.label()
    }
}

#[async_trait]
pub trait BlockpadTask: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(Some(body))` on success, `Ok(None)` when the operation was skipped
    /// this round (cooldown or retries exhausted). `Err` is reserved for
    /// faults outside the retry policy.
    async fn run(&self, ctx: &TaskContext) -> Result<Option<Value>>;
}

/// The fixed per-cycle sequence: swap, add liquidity, remove liquidity,
/// stake, unstake.
pub fn cycle_tasks(config: &BlockpadConfig) -> Vec<Box<dyn BlockpadTask>> {
    vec![
        Box::new(SwapTask::new(
            &config.swap_from,
            &config.swap_to,
            config.swap_amount,
        )),
        Box::new(AddLiquidityTask::new(config.liquidity_amount)),
        Box::new(RemoveLiquidityTask::new(config.liquidity_amount)),
        Box::new(StakeTask::new(&config.stake_token, config.stake_amount)),
        Box::new(UnstakeTask::new(&config.stake_token, config.stake_amount)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_order() {
        let names: Vec<&str> = cycle_tasks(&BlockpadConfig::default())
            .iter()
            .map(|t| t.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "02_swap",
                "03_add_liquidity",
                "04_remove_liquidity",
                "05_stake",
                "06_unstake"
            ]
        );
    }
}
