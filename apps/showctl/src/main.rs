use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{ControlSession, ErrorRecord, HttpTransport, StatusView};
use shared::{domain::ShowId, error::ApiException};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "showctl", about = "Operate a remote show player")]
struct Cli {
    /// Base resource of the player, e.g. http://192.168.2.10/json
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current player status.
    Status,
    /// List the shows available on the player.
    Directory,
    Start,
    Stop,
    Resume,
    /// Select a show without changing playback.
    Select {
        show: String,
    },
    /// Toggle looping of the current show.
    Loop,
    /// Poll the status and print it whenever it changes.
    Watch {
        #[arg(long)]
        interval_ms: Option<u64>,
        #[arg(long)]
        count: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        settings.timeout_secs = timeout_secs;
    }

    let transport = HttpTransport::with_timeout(&settings.base_url, settings.timeout())
        .with_context(|| format!("cannot use base url '{}'", settings.base_url))?;
    info!(base_url = %transport.base_url(), "using show player");
    let session = ControlSession::with_endpoints(Arc::new(transport), settings.endpoints());

    match cli.command {
        Command::Status => {
            session.refresh().await;
        }
        Command::Directory => {
            session.load_directory().await;
            for option in session.directory_options().await {
                println!("{}", option.label);
            }
            return report_last_error(&session).await;
        }
        Command::Start => {
            session.refresh().await;
            session.start().await;
        }
        Command::Stop => {
            session.refresh().await;
            session.stop().await;
        }
        Command::Resume => {
            session.refresh().await;
            session.resume().await;
        }
        Command::Select { show } => {
            session.refresh().await;
            session.select_show(ShowId::new(show)).await;
        }
        Command::Loop => {
            session.refresh().await;
            session.toggle_loop().await;
        }
        Command::Watch { interval_ms, count } => {
            let interval = interval_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| settings.poll_interval());
            watch(&session, interval, count).await;
        }
    }

    if session.status().await.is_some() {
        println!("{}", session.view().await);
    }
    report_last_error(&session).await
}

async fn watch(session: &ControlSession, interval: Duration, count: Option<u64>) {
    let mut ticker = tokio::time::interval(interval);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);
    let mut printed: Option<StatusView> = None;
    let mut polls = 0_u64;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
            _ = async {
                ticker.tick().await;
                session.refresh().await
            } => {}
        }

        let view = session.view().await;
        if session.status().await.is_some() && printed.as_ref() != Some(&view) {
            println!("{view}\n");
            printed = Some(view);
        }

        polls += 1;
        if count.is_some_and(|count| polls >= count) {
            break;
        }
    }
}

async fn report_last_error(session: &ControlSession) -> Result<()> {
    let last_error = session.last_error().await;
    if let Some(record) = &last_error {
        eprintln!(
            "warning: {:?} failed at {}: {}",
            record.operation,
            record.at.to_rfc3339(),
            record.error.message
        );
    }
    exit_status(last_error, session.has_heard_from_player().await)
}

/// Stale output is not a failure; only a session that never heard from the
/// player exits non-zero.
fn exit_status(last_error: Option<ErrorRecord>, heard_from_player: bool) -> Result<()> {
    match last_error {
        Some(record) if !heard_from_player => {
            Err(ApiException::from(record.error)).context("show player did not answer")
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
