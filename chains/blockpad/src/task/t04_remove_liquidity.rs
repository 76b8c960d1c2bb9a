//! Remove Liquidity Task

use super::{BlockpadTask, TaskContext};
use crate::config::Amount;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct RemoveLiquidityTask {
    tice_amount: Amount,
}

impl RemoveLiquidityTask {
    pub fn new(tice_amount: Amount) -> Self {
        Self { tice_amount }
    }
}

#[async_trait]
impl BlockpadTask for RemoveLiquidityTask {
    fn name(&self) -> &'static str {
        "04_remove_liquidity"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<Option<Value>> {
        ctx.client.remove_liquidity(self.tice_amount).await
    }
}
