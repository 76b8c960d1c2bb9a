use crate::config::BlockpadConfig;
use crate::worker::AccountWorker;
use core_logic::{Account, AccountManager, ConfigError, ProxyConfig, ProxyManager};
use std::path::Path;
use tracing::{error, info, warn};

/// Creates one worker per account, handing out proxies round-robin.
///
/// An account whose client cannot be built (e.g. a token that is not a
/// valid header value) is logged and left out.
pub fn build_workers(
    accounts: &[Account],
    proxies: &[ProxyConfig],
    config: &BlockpadConfig,
) -> Vec<AccountWorker> {
    accounts
        .iter()
        .enumerate()
        .filter_map(|(i, account)| {
            let proxy = ProxyManager::assign(proxies, i);
            match AccountWorker::new(account, proxy, config) {
                Ok(worker) => Some(worker),
                Err(e) => {
                    error!("❌ [{}] Failed to set up account: {:#}", account.label, e);
                    None
                }
            }
        })
        .collect()
}

/// Reads both input lists and builds the workers.
///
/// Fails only when there is no usable account. An unreadable proxy list
/// means running without proxies.
pub fn load_workers(
    accounts_path: &Path,
    proxies_path: &Path,
    config: &BlockpadConfig,
) -> Result<Vec<AccountWorker>, ConfigError> {
    let accounts = AccountManager::load_accounts(accounts_path)?;
    let proxies = ProxyManager::load_proxies(proxies_path).unwrap_or_else(|e| {
        warn!("Error reading proxies: {}", e);
        Vec::new()
    });

    info!("📝 Loaded {} accounts", accounts.len());
    info!("🌐 Loaded {} proxies", proxies.len());

    let workers = build_workers(&accounts, &proxies, config);
    if workers.is_empty() {
        return Err(ConfigError::NoAccounts {
            path: accounts_path.display().to_string(),
        });
    }
    Ok(workers)
}
