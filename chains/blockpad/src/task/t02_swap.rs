//! Swap Task

use super::{BlockpadTask, TaskContext};
use crate::config::Amount;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct SwapTask {
    from_token: String,
    to_token: String,
    amount: Amount,
}

impl SwapTask {
    pub fn new(from_token: &str, to_token: &str, amount: Amount) -> Self {
        Self {
            from_token: from_token.to_string(),
            to_token: to_token.to_string(),
            amount,
        }
    }
}

#[async_trait]
impl BlockpadTask for SwapTask {
    fn name(&self) -> &'static str {
        "02_swap"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<Option<Value>> {
        ctx.client
            .swap(&self.from_token, &self.to_token, self.amount)
            .await
    }
}
