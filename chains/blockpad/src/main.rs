use anyhow::Result;
use blockpad_bot::bootstrap;
use blockpad_bot::BlockpadConfig;
use clap::Parser;
use core_logic::{setup_logger, AccountManager, ProxyManager, Worker, WorkerRunner};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Optional settings file; built-in defaults apply when it is missing
    #[arg(short, long, default_value = "config.toml")]
    config: String,
    #[arg(short, long, default_value = AccountManager::ACCOUNT_FILE)]
    accounts: PathBuf,
    #[arg(short, long, default_value = ProxyManager::PROXY_FILE)]
    proxies: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let log_guard = setup_logger("blockpad", &["blockpad_bot"]);
    let args = Args::parse();

    info!("🚀 Initializing BlockPad Task Bot...");

    let config = match BlockpadConfig::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Failed to load config: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    WorkerRunner::install_shutdown_hook(log_guard);

    loop {
        let workers = match bootstrap::load_workers(&args.accounts, &args.proxies, &config) {
            Ok(w) => w,
            Err(e) => {
                error!("❌ {}", e);
                return ExitCode::FAILURE;
            }
        };

        if let Err(e) = run(workers).await {
            error!("❌ Fatal error in main process: {:#}", e);
        }
        tokio::time::sleep(config.restart_delay()).await;
    }
}

async fn run(workers: Vec<blockpad_bot::AccountWorker>) -> Result<()> {
    info!("🚀 Starting BlockPad Multi-Account Task Bot...");
    let workers: Vec<Box<dyn Worker>> = workers
        .into_iter()
        .map(|w| Box::new(w) as Box<dyn Worker>)
        .collect();

    WorkerRunner::guard("main process", WorkerRunner::run_workers(workers)).await
}
