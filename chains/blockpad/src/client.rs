//! BlockPad API client
//!
//! One [`BlockpadClient`] exists per account. It owns a `reqwest` client with
//! the account's bearer token, the browser-like header set the web app sends,
//! and the account's proxy if it has one. Every remote operation goes through
//! [`with_retry`], so callers only ever see `Some(body)` or `None`.

use crate::config::{Amount, BlockpadConfig};
use crate::error::BlockpadError;
use anyhow::{Context, Result};
use core_logic::{with_retry, NetworkError, ProxyConfig, RetryConfig, RetryOutcome};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Proxy};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use url::Url;

const ORIGIN: &str = "https://testnet.blockpad.fun";
const REFERER: &str = "https://testnet.blockpad.fun/";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/133.0.0.0 Safari/537.36";
const SEC_CH_UA: &str = r#""Not(A:Brand";v="99", "Brave";v="133", "Chromium";v="133""#;

#[derive(Debug, Serialize)]
struct SwapRequest<'a> {
    #[serde(rename = "fromToken")]
    from_token: &'a str,
    #[serde(rename = "toToken")]
    to_token: &'a str,
    amount: Amount,
}

#[derive(Debug, Serialize)]
struct LiquidityRequest {
    #[serde(rename = "tICEAmount")]
    tice_amount: Amount,
}

#[derive(Debug, Serialize)]
struct StakeRequest<'a> {
    token: &'a str,
    amount: Amount,
}

#[derive(Clone)]
pub struct BlockpadClient {
    http: Client,
    base_url: String,
    label: String,
    retry: RetryConfig,
    proxy: Option<ProxyConfig>,
}

impl BlockpadClient {
    /// Builds the client for one account.
    ///
    /// A proxy that cannot be turned into a `reqwest::Proxy` is logged and
    /// dropped; the account then talks to the API directly.
    pub fn new(
        token: &str,
        label: &str,
        proxy: Option<&ProxyConfig>,
        config: &BlockpadConfig,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .default_headers(default_headers(token)?)
            .timeout(config.timeout());

        let mut active_proxy = None;
        if let Some(proxy_conf) = proxy {
            match build_proxy(proxy_conf) {
                Ok(p) => {
                    builder = builder.proxy(p);
                    active_proxy = Some(proxy_conf.clone());
                }
                Err(e) => error!("❌ [{}] Proxy configuration error: {}", label, e),
            }
        }

        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            label: label.to_string(),
            retry: config.retry_config(),
            proxy: active_proxy,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// The proxy actually in use, if any.
    pub fn proxy(&self) -> Option<&ProxyConfig> {
        self.proxy.as_ref()
    }

    pub async fn claim_faucet(&self) -> Result<Option<Value>> {
        let url = self.endpoint("faucet/claim")?;
        self.execute("Faucet claim", || async {
            info!("🎯 [{}] Claiming faucet...", self.label);
            let data = self.post(&url, None::<&()>).await?;
            self.report_success("Faucet claimed");
            Ok::<_, BlockpadError>(data)
        })
        .await
    }

    pub async fn swap(&self, from_token: &str, to_token: &str, amount: Amount) -> Result<Option<Value>> {
        let url = self.endpoint("swap/execute")?;
        let body = SwapRequest {
            from_token,
            to_token,
            amount,
        };
        self.execute("Swap", || async {
            info!(
                "🔄 [{}] Swapping {} {} to {}...",
                self.label, amount, from_token, to_token
            );
            let data = self.post(&url, Some(&body)).await?;
            self.report_success("Swap executed");
            Ok::<_, BlockpadError>(data)
        })
        .await
    }

    pub async fn add_liquidity(&self, tice_amount: Amount) -> Result<Option<Value>> {
        let url = self.endpoint("liquidity/add")?;
        let body = LiquidityRequest { tice_amount };
        self.execute("Add liquidity", || async {
            info!("💧 [{}] Adding liquidity: {} tICE...", self.label, tice_amount);
            let data = self.post(&url, Some(&body)).await?;
            self.report_success("Liquidity added");
            Ok::<_, BlockpadError>(data)
        })
        .await
    }

    pub async fn remove_liquidity(&self, tice_amount: Amount) -> Result<Option<Value>> {
        let url = self.endpoint("liquidity/remove")?;
        let body = LiquidityRequest { tice_amount };
        self.execute("Remove liquidity", || async {
            info!("🔄 [{}] Removing liquidity: {} tICE...", self.label, tice_amount);
            let data = self.post(&url, Some(&body)).await?;
            self.report_success("Liquidity removed");
            Ok::<_, BlockpadError>(data)
        })
        .await
    }

    pub async fn stake(&self, token: &str, amount: Amount) -> Result<Option<Value>> {
        let url = self.endpoint("staking/stake")?;
        let body = StakeRequest { token, amount };
        self.execute("Stake", || async {
            info!("📥 [{}] Staking {} {}...", self.label, amount, token);
            let data = self.post(&url, Some(&body)).await?;
            self.report_success("Staking done");
            Ok::<_, BlockpadError>(data)
        })
        .await
    }

    pub async fn unstake(&self, token: &str, amount: Amount) -> Result<Option<Value>> {
        let url = self.endpoint("staking/unstake")?;
        let body = StakeRequest { token, amount };
        self.execute("Unstake", || async {
            info!("📤 [{}] Unstaking {} {}...", self.label, amount, token);
            let data = self.post(&url, Some(&body)).await?;
            self.report_success("Unstaking done");
            Ok::<_, BlockpadError>(data)
        })
        .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, BlockpadError> {
        let full = format!("{}/{}", self.base_url, path);
        Url::parse(&full).map_err(|source| BlockpadError::InvalidEndpoint { path: full, source })
    }

    fn report_success(&self, what: &str) {
        info!(
            target: core_logic::TASK_RESULT_TARGET,
            "✅ [{}] Success {}",
            self.label,
            what
        );
    }

    /// Retry wrapper shared by every operation. Cooldown and exhausted
    /// retries both come back as `Ok(None)`.
    async fn execute<F, Fut>(&self, operation_name: &str, operation: F) -> Result<Option<Value>>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<Value, BlockpadError>>,
    {
        match with_retry(&self.retry, &self.label, operation_name, operation).await {
            RetryOutcome::Success { value, .. } => Ok(Some(value)),
            RetryOutcome::Halted { error: e, .. } => {
                let hours = e
                    .body()
                    .map(|b| b.remaining_hours_text())
                    .unwrap_or_else(|| "unknown".to_string());
                warn!("⏳ [{}] {}", self.label, e);
                warn!("⌛ [{}] Remaining hours: {}", self.label, hours);
                Ok(None)
            }
            RetryOutcome::Exhausted { .. } => Ok(None),
        }
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        url: &Url,
        body: Option<&B>,
    ) -> Result<Value, BlockpadError> {
        let mut request = self.http.post(url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(BlockpadError::from_response(status.as_u16(), &text));
        }
        Ok(decode_body(&text))
    }
}

/// Empty bodies decode to `null`, non-JSON bodies to a JSON string.
fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn default_headers(token: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(header::ORIGIN, HeaderValue::from_static(ORIGIN));
    headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
    headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
    headers.insert("sec-ch-ua", HeaderValue::from_static(SEC_CH_UA));
    headers.insert("sec-ch-ua-mobile", HeaderValue::from_static("?0"));
    headers.insert("sec-ch-ua-platform", HeaderValue::from_static("\"Windows\""));

    let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
        .context("Account token contains characters not allowed in a header")?;
    auth.set_sensitive(true);
    headers.insert(header::AUTHORIZATION, auth);

    Ok(headers)
}

fn build_proxy(conf: &ProxyConfig) -> Result<Proxy, NetworkError> {
    let invalid = |reason: String| NetworkError::InvalidProxy {
        proxy: conf.url.clone(),
        reason,
    };

    let mut proxy = Proxy::all(&conf.url).map_err(|e| invalid(e.to_string()))?;
    if let Some(user) = &conf.username {
        proxy = proxy.basic_auth(user, conf.password.as_deref().unwrap_or_default());
    }
    Ok(proxy)
}
