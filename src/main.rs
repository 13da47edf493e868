mod cli;
mod config;
mod delay;
mod dispatch;
mod error;
mod logging;
mod queue;
mod state_machine;
mod ui;
mod worker;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use cli::{Cli, Command};
use config::WorkerConfig;
use dispatch::StaticResolver;
use queue::{HttpQueueClient, JobSource};
use worker::{JobWorker, LoopPolicy, Tick};

fn load_config(cli: &Cli) -> Result<WorkerConfig> {
    let mut config = match &cli.config {
        Some(path) => WorkerConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => WorkerConfig::load()?,
    };
    if let Some(url) = &cli.queue_url {
        config.queue_url = url.clone();
        config.validate()?;
    }
    Ok(config)
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::init(config.log_format, cli.verbose);

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let queue = HttpQueueClient::new(config.queue_url.clone(), timeout)?;

    match cli.command {
        Command::Status => {
            let jobs = JobSource::new(queue).fetch_pending().await?;
            ui::print_status(&jobs, config.max_attempts);
        }
        Command::Once => {
            let resolver = StaticResolver::new(config.targets.clone(), timeout)?;
            let worker = JobWorker::new(queue, resolver, LoopPolicy::from(&config));
            match worker.tick().await {
                Tick::Processed(id) => println!("processed job {id}"),
                Tick::Idle(delay) => println!("no eligible jobs (waited {}ms)", delay.as_millis()),
                Tick::QueueDown(_) => anyhow::bail!("queue service at {} is unavailable", config.queue_url),
            }
        }
        Command::Run => {
            let resolver = StaticResolver::new(config.targets.clone(), timeout)?;
            info!(
                queue_url = %config.queue_url,
                targets = resolver.target_count(),
                "starting worker loop"
            );
            let worker = JobWorker::new(queue, resolver, LoopPolicy::from(&config));
            info!(
                max_attempts = worker.policy().max_attempts,
                idle_min_ms = worker.policy().idle.min().as_millis() as u64,
                idle_max_ms = worker.policy().idle.max().as_millis() as u64,
                "loop policy"
            );
            worker.run_until(shutdown_signal()).await;
        }
    }

    Ok(())
}
