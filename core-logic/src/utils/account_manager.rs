use crate::config::Account;
use crate::error::ConfigError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

pub struct AccountManager;

impl AccountManager {
    pub const ACCOUNT_FILE: &'static str = "accounts.txt";

    /// Loads accounts from a `token[,label]` per line file.
    ///
    /// A missing file and a file without a single usable line are both
    /// errors: the bot has nothing to do without accounts.
    pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<Account>, ConfigError> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path_str.clone(),
            },
            _ => ConfigError::IoError {
                path: path_str.clone(),
                msg: e.to_string(),
            },
        })?;

        let accounts = Self::parse(&content);
        if accounts.is_empty() {
            return Err(ConfigError::NoAccounts { path: path_str });
        }

        info!("Loaded {} accounts from {}", accounts.len(), path_str);
        Ok(accounts)
    }

    pub fn parse(content: &str) -> Vec<Account> {
        content.lines().filter_map(Account::parse_line).collect()
    }
}
