use anyhow::Result;
use async_trait::async_trait;
use blockpad_bot::bootstrap::{build_workers, load_workers};
use blockpad_bot::task::{BlockpadTask, TaskContext};
use blockpad_bot::{AccountWorker, BlockpadClient, BlockpadConfig};
use core_logic::{Account, ConfigError, ProxyManager, Worker};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_config(server: &MockServer) -> BlockpadConfig {
    BlockpadConfig {
        base_url: format!("{}/api", server.uri()),
        retry_delay_ms: 0,
        op_delay_ms: 10,
        cycle_delay_ms: 20,
        cycle_error_delay_ms: 20,
        restart_delay_ms: 20,
        ..Default::default()
    }
}

async fn mount_ok(server: &MockServer, endpoint: &str, body: serde_json::Value, times: u64) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_cycle_calls_every_endpoint_once_in_order() {
    let server = MockServer::start().await;
    let swap = json!({"fromToken": "tICE", "toToken": "BPAD", "amount": 10});
    let liquidity = json!({"tICEAmount": 0.5});
    let stake = json!({"token": "tICE", "amount": 100});
    mount_ok(&server, "/api/swap/execute", swap, 1).await;
    mount_ok(&server, "/api/liquidity/add", liquidity.clone(), 1).await;
    mount_ok(&server, "/api/liquidity/remove", liquidity, 1).await;
    mount_ok(&server, "/api/staking/stake", stake.clone(), 1).await;
    mount_ok(&server, "/api/staking/unstake", stake, 1).await;

    let accounts = [Account::new("abc123", Some("Alice"))];
    let workers = build_workers(&accounts, &[], &fast_config(&server));
    let stats = workers[0].run_cycle().await.unwrap();
    assert_eq!(stats.done, 5);
    assert_eq!(stats.skipped, 0);

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(
        paths,
        vec![
            "/api/swap/execute",
            "/api/liquidity/add",
            "/api/liquidity/remove",
            "/api/staking/stake",
            "/api/staking/unstake",
        ]
    );
}

#[tokio::test]
async fn test_failed_operation_does_not_stop_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/swap/execute"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/liquidity/add"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/liquidity/remove"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/staking/stake"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/staking/unstake"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let workers = build_workers(&[Account::new("abc123", None)], &[], &fast_config(&server));
    let stats = workers[0].run_cycle().await.unwrap();
    assert_eq!(stats.done, 4);
    assert_eq!(stats.skipped, 1);
}

#[tokio::test]
async fn test_worker_claims_faucet_once_then_keeps_cycling() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/faucet/claim"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"error": "Faucet on cooldown", "remainingHours": 5})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/swap/execute"))
        .respond_with(ResponseTemplate::new(200))
        .expect(2..)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let accounts = [Account::new("abc123", Some("Alice"))];
    let workers = build_workers(&accounts, &[], &fast_config(&server));
    let worker = &workers[0];

    let res = tokio::time::timeout(Duration::from_millis(800), worker.run()).await;
    assert!(res.is_err(), "worker must never return on its own");
}

#[test]
fn test_two_accounts_no_proxies() {
    let dir = tempfile::tempdir().unwrap();
    let accounts = dir.path().join("accounts.txt");
    let proxies = dir.path().join("proxy.txt");
    std::fs::write(&accounts, "abc123,Alice\ndef456\n").unwrap();
    std::fs::write(&proxies, "").unwrap();

    let workers = load_workers(&accounts, &proxies, &BlockpadConfig::default()).unwrap();
    let labels: Vec<&str> = workers.iter().map(|w| w.label()).collect();
    assert_eq!(labels, vec!["Alice", "def456"]);
    assert!(workers.iter().all(|w| w.proxy().is_none()));
}

#[test]
fn test_proxies_are_assigned_round_robin() {
    let accounts = vec![
        Account::new("token-one", None),
        Account::new("token-two", None),
        Account::new("token-three", None),
    ];
    let proxies = ProxyManager::parse("http://10.0.0.1:8080\nhttp://10.0.0.2:8080\n");

    let workers = build_workers(&accounts, &proxies, &BlockpadConfig::default());
    let assigned: Vec<&str> = workers
        .iter()
        .map(|w| w.proxy().unwrap().url.as_str())
        .collect();
    assert_eq!(
        assigned,
        vec!["http://10.0.0.1:8080", "http://10.0.0.2:8080", "http://10.0.0.1:8080"]
    );
}

#[test]
fn test_missing_or_empty_accounts_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let accounts = dir.path().join("accounts.txt");
    let proxies = dir.path().join("proxy.txt");

    let err = load_workers(&accounts, &proxies, &BlockpadConfig::default()).err().unwrap();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));

    std::fs::write(&accounts, "\n\n").unwrap();
    let err = load_workers(&accounts, &proxies, &BlockpadConfig::default()).err().unwrap();
    assert!(matches!(err, ConfigError::NoAccounts { .. }));
}

#[test]
fn test_unusable_token_is_left_out() {
    let accounts = vec![
        Account::new("bad\ttoken\u{7f}", Some("Broken")),
        Account::new("good-token", Some("Fine")),
    ];

    let workers = build_workers(&accounts, &[], &BlockpadConfig::default());
    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].label(), "Fine");
}

/// Records when it runs and fails its first `failures` runs.
struct ScriptedTask {
    name: &'static str,
    started: Instant,
    runs: Arc<Mutex<Vec<Duration>>>,
    failures: usize,
}

impl ScriptedTask {
    fn new(name: &'static str, started: Instant, failures: usize) -> (Self, Arc<Mutex<Vec<Duration>>>) {
        let runs = Arc::new(Mutex::new(Vec::new()));
        let task = Self {
            name,
            started,
            runs: runs.clone(),
            failures,
        };
        (task, runs)
    }
}

#[async_trait]
impl BlockpadTask for ScriptedTask {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn run(&self, _ctx: &TaskContext) -> Result<Option<Value>> {
        let mut runs = self.runs.lock().unwrap();
        runs.push(self.started.elapsed());
        if runs.len() <= self.failures {
            anyhow::bail!("{} broke", self.name);
        }
        Ok(Some(json!({"success": true})))
    }
}

fn scripted_worker(faucet: ScriptedTask, cycle: ScriptedTask) -> AccountWorker {
    let config = BlockpadConfig::default();
    let client = BlockpadClient::new("abc123", "Alice", None, &config).unwrap();
    AccountWorker::with_tasks(
        TaskContext::new(client),
        Box::new(faucet),
        vec![Box::new(cycle)],
        &config,
    )
}

fn secs(values: &[u64]) -> Vec<Duration> {
    values.iter().map(|s| Duration::from_secs(*s)).collect()
}

#[tokio::test(start_paused = true)]
async fn test_failed_session_reclaims_faucet_after_restart_delay() {
    let started = Instant::now();
    let (faucet, faucet_runs) = ScriptedTask::new("01_claim_faucet", started, 1);
    let (swap, swap_runs) = ScriptedTask::new("02_swap", started, 0);
    let worker = scripted_worker(faucet, swap);

    let res = tokio::time::timeout(Duration::from_secs(90), worker.run()).await;
    assert!(res.is_err());

    // Faucet fails at 0s, the session restarts 60s later, the first cycle
    // task follows after the 5s pacing delay, the next one after 5s + 10s.
    assert_eq!(*faucet_runs.lock().unwrap(), secs(&[0, 60]));
    assert_eq!(*swap_runs.lock().unwrap(), secs(&[65, 80]));
}

#[tokio::test(start_paused = true)]
async fn test_cycle_error_waits_and_continues_without_reclaiming() {
    let started = Instant::now();
    let (faucet, faucet_runs) = ScriptedTask::new("01_claim_faucet", started, 0);
    let (swap, swap_runs) = ScriptedTask::new("02_swap", started, 1);
    let worker = scripted_worker(faucet, swap);

    let res = tokio::time::timeout(Duration::from_secs(60), worker.run()).await;
    assert!(res.is_err());

    // The cycle fails at 5s and resumes after the 30s error delay; the
    // faucet is only claimed once.
    assert_eq!(*faucet_runs.lock().unwrap(), secs(&[0]));
    assert_eq!(*swap_runs.lock().unwrap(), secs(&[5, 35, 50]));
}
