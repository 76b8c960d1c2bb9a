//! Claim Faucet Task
//!
//! Claims the account's tICE allowance. The faucet is rate limited per
//! account; a claim during cooldown is reported and skipped, not retried.

use super::{BlockpadTask, TaskContext};
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone, Default)]
pub struct ClaimFaucetTask;

impl ClaimFaucetTask {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl BlockpadTask for ClaimFaucetTask {
    fn name(&self) -> &'static str {
        "01_claim_faucet"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<Option<Value>> {
        ctx.client.claim_faucet().await
    }
}
