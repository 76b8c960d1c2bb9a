use crate::config::ProxyConfig;
use crate::error::ConfigError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

pub struct ProxyManager;

impl ProxyManager {
    pub const PROXY_FILE: &'static str = "proxy.txt";

    /// Loads proxies, one URI per line. A missing file means no proxying.
    ///
    /// Every non-blank line is kept, even ones that later fail to build a
    /// proxy, so that round-robin indices match the file's line order.
    pub fn load_proxies(path: impl AsRef<Path>) -> Result<Vec<ProxyConfig>, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("{} not found. Running without proxies.", path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(ConfigError::IoError {
                    path: path.display().to_string(),
                    msg: e.to_string(),
                })
            }
        };

        let proxies = Self::parse(&content);
        info!("Loaded {} proxies from {}", proxies.len(), path.display());
        Ok(proxies)
    }

    pub fn parse(content: &str) -> Vec<ProxyConfig> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(ProxyConfig::parse)
            .collect()
    }

    /// Round-robin assignment: worker `index` gets `proxies[index % len]`.
    pub fn assign(proxies: &[ProxyConfig], index: usize) -> Option<&ProxyConfig> {
        if proxies.is_empty() {
            None
        } else {
            proxies.get(index % proxies.len())
        }
    }
}
