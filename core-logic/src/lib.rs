//! # Core Logic - Shared Plumbing for Account Bots
//!
//! This crate holds everything an account-automation bot needs that is not
//! specific to one remote service.
//!
//! ## Modules
//!
//! - [`config`] - Account and proxy records parsed from the input lists
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - The [`Worker`](traits::Worker) trait and per-cycle stats
//! - `utils` - List loaders, fixed-delay retry, supervisor/runner, logger

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

pub use config::{Account, ProxyConfig};
pub use error::{ConfigError, CoreError, NetworkError};
pub use traits::{Worker, WorkerStats};

pub use utils::logger::TASK_RESULT_TARGET;
pub use utils::{setup_logger, AccountManager, ProxyManager, WorkerRunner};

pub use utils::retry::{with_retry, RetryConfig, RetryOutcome, Retryable};
