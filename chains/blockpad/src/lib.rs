//! # BlockPad Bot
//!
//! Multi-account task runner for the BlockPad testnet API. Each account gets
//! its own [`AccountWorker`] which claims the faucet and then loops over
//! swap, add/remove liquidity, stake and unstake forever.

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod task;
pub mod worker;

pub use client::BlockpadClient;
pub use config::{Amount, BlockpadConfig};
pub use error::{is_faucet_cooldown, ApiErrorBody, BlockpadError};
pub use worker::AccountWorker;
