//! Stake Task

use super::{BlockpadTask, TaskContext};
use crate::config::Amount;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct StakeTask {
    token: String,
    amount: Amount,
}

impl StakeTask {
    pub fn new(token: &str, amount: Amount) -> Self {
        Self {
            token: token.to_string(),
            amount,
        }
    }
}

#[async_trait]
impl BlockpadTask for StakeTask {
    fn name(&self) -> &'static str {
        "05_stake"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<Option<Value>> {
        ctx.client.stake(&self.token, self.amount).await
    }
}
