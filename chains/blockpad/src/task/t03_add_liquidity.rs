//! Add Liquidity Task

use super::{BlockpadTask, TaskContext};
use crate::config::Amount;
use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct AddLiquidityTask {
    tice_amount: Amount,
}

impl AddLiquidityTask {
    pub fn new(tice_amount: Amount) -> Self {
        Self { tice_amount }
    }
}

#[async_trait]
impl BlockpadTask for AddLiquidityTask {
    fn name(&self) -> &'static str {
        "03_add_liquidity"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<Option<Value>> {
        ctx.client.add_liquidity(self.tice_amount).await
    }
}
