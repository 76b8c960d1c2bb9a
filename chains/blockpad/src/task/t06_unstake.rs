//! Unstake Task

use super::{BlockpadTask, TaskContext};
use crate::config::Amount;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct UnstakeTask {
    token: String,
    amount: Amount,
}

impl UnstakeTask {
    pub fn new(token: &str, amount: Amount) -> Self {
        Self {
            token: token.to_string(),
            amount,
        }
    }
}

#[async_trait]
impl BlockpadTask for UnstakeTask {
    fn name(&self) -> &'static str {
        "06_unstake"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<Option<Value>> {
        ctx.client.unstake(&self.token, self.amount).await
    }
}
