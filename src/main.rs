use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ticketwatch::bot::UpdatePoller;
use ticketwatch::config::{Config, LoggingConfig};
use ticketwatch::crawler::{fetch_with_retry, SnapshotSource, TicketFetcher};
use ticketwatch::notifications::{Notifier, TelegramChannel};
use ticketwatch::scheduler::{Monitor, PeriodicTrigger};
use ticketwatch::utils::retry::RetryConfig;

#[derive(Parser)]
#[command(
    name = "ticketwatch",
    version,
    about = "Watches a ticket page and messages you on Telegram when sales open",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json), overrides the configured one
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Optional TOML file with non-secret settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the watcher until interrupted
    Run,

    /// Verify configuration and do a single fetch
    Check {
        /// Also send the result to the configured chat
        #[arg(long, default_value = "false")]
        notify: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; variables may come from the real environment
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing/logging
    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(&config.logging, log_format, cli.verbose)?;

    match cli.command {
        Commands::Run => {
            tracing::info!(
                target_url = %config.target.url,
                check_interval_secs = config.schedule.check_interval_secs,
                heartbeat_interval_secs = config.schedule.heartbeat_interval_secs,
                "Starting ticket watcher"
            );
            run(config).await?;
        }

        Commands::Check { notify } => {
            tracing::info!(notify = %notify, "Starting setup check");
            check(config, notify).await?;
        }
    }

    Ok(())
}

fn setup_tracing(logging: &LoggingConfig, format: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("ticketwatch=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_new(format!("ticketwatch={},warn", logging.level))
            .with_context(|| format!("Invalid log level: {}", logging.level))?
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}

async fn run(config: Config) -> Result<()> {
    let channel =
        Arc::new(TelegramChannel::new(&config.telegram).context("Failed to set up Telegram")?);
    let fetcher =
        Arc::new(TicketFetcher::new(&config.target).context("Failed to set up page fetcher")?);

    let notifier = Notifier::new(channel.clone(), config.telegram.chat_id);
    let monitor = Arc::new(Monitor::new(
        fetcher,
        notifier.clone(),
        RetryConfig::single(config.schedule.retry_delay()),
    ));

    if let Err(e) = notifier.startup(config.schedule.summary()).await {
        tracing::error!(error = %e, "Failed to deliver startup message");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let check_monitor = Arc::clone(&monitor);
    let check_task = PeriodicTrigger::new("check", config.schedule.check_interval())
        .fire_immediately(true)
        .spawn(shutdown_rx.clone(), move || {
            let monitor = Arc::clone(&check_monitor);
            async move {
                monitor.run_check().await;
            }
        });

    let heartbeat_monitor = Arc::clone(&monitor);
    let heartbeat_task = PeriodicTrigger::new("heartbeat", config.schedule.heartbeat_interval())
        .spawn(shutdown_rx.clone(), move || {
            let monitor = Arc::clone(&heartbeat_monitor);
            async move {
                monitor.heartbeat().await;
            }
        });

    let poller = UpdatePoller::new(
        channel,
        Arc::clone(&monitor),
        notifier,
        config.schedule.poll_timeout_secs,
    );
    let poller_task = tokio::spawn(poller.run(shutdown_rx));

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, stopping");
    let _ = shutdown_tx.send(true);

    for (name, task) in [
        ("poller", poller_task),
        ("check", check_task),
        ("heartbeat", heartbeat_task),
    ] {
        if let Err(e) = task.await {
            tracing::error!(task = name, error = %e, "Task ended abnormally");
        }
    }

    tracing::info!("Ticket watcher stopped");
    Ok(())
}

async fn check(config: Config, notify: bool) -> Result<()> {
    let fetcher = TicketFetcher::new(&config.target).context("Failed to set up page fetcher")?;
    let retry = RetryConfig::single(config.schedule.retry_delay());

    println!("Configuration OK");
    println!("  Target: {}", fetcher.page_url());
    println!("  Chat id: {}", config.telegram.chat_id);
    println!();

    let snapshot = fetch_with_retry(&fetcher, &retry)
        .await
        .context("Failed to fetch ticket status")?;

    println!("Ticket status:");
    for (key, status) in snapshot.iter() {
        if status.is_available {
            println!("  {}: on sale {}", key.display_name(), status.link);
        } else {
            println!("  {}: disabled", key.display_name());
        }
    }

    if notify {
        let channel =
            Arc::new(TelegramChannel::new(&config.telegram).context("Failed to set up Telegram")?);
        Notifier::new(channel, config.telegram.chat_id)
            .manual_status(&snapshot, fetcher.source_url())
            .await
            .context("Failed to deliver test message")?;
        println!();
        println!("Test message delivered");
    }

    Ok(())
}

/// Resolve on Ctrl+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to wait for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
