//! Web remote client: entry point.
//!
//! Reads touch, keyboard and text-field events as JSON lines on stdin and
//! sends batched command frames to a remote host over a WebSocket.
//!
//! # Usage
//!
//! ```text
//! web-remote [OPTIONS]
//!
//! Options:
//!   --endpoint <URL>        Host WebSocket URL
//!   --config <PATH>         Config file (default: platform config dir)
//!   --flush-ms <MS>         Batch flush period [default: 20]
//!   --poll-ms <MS>          Text field poll period [default: 90]
//!   --tap-window-ms <MS>    Tap-then-press drag window [default: 180]
//!   --log-level <FILTER>    Log filter when RUST_LOG is unset [default: info]
//!   --dry-run               Record frames and print them instead of sending
//!   --init-config           Write the effective config file and exit
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable              | Description                  |
//! |-----------------------|------------------------------|
//! | `WEB_REMOTE_ENDPOINT` | Host WebSocket URL           |
//! | `WEB_REMOTE_CONFIG`   | Config file path             |
//! | `RUST_LOG`            | Log filter (wins over file)  |
//!
//! Precedence: CLI flag, then environment variable, then config file, then
//! built-in default.
//!
//! # Example
//!
//! ```text
//! printf '%s\n' '{"type":"Tap"}' '{"type":"KeyDown","code":13}' \
//!   | web-remote --endpoint ws://192.168.1.20:8080/remote
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use remote_client::application::ChannelFactory;
use remote_client::domain::ClientConfig;
use remote_client::infrastructure::storage::{load_config, save_config, FileConfig};
use remote_client::infrastructure::{run_session, MemoryChannelFactory, WsChannelFactory};

/// Endpoint used by `--dry-run` when none is configured.
const DRY_RUN_ENDPOINT: &str = "memory://dry-run";

/// Time given to socket tasks to deliver the last frame and the close
/// handshake before the runtime shuts down.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(100);

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Remote-control input client.
#[derive(Debug, Parser)]
#[command(
    name = "web-remote",
    about = "Batches touch, key and text input into frames for a remote host",
    version
)]
struct Cli {
    /// WebSocket URL of the receiving host, e.g. `ws://192.168.1.20:8080/remote`.
    #[arg(long, env = "WEB_REMOTE_ENDPOINT")]
    endpoint: Option<String>,

    /// Path to the TOML config file.
    #[arg(long, env = "WEB_REMOTE_CONFIG")]
    config: Option<PathBuf>,

    /// Delay between batch flushes, in milliseconds.
    #[arg(long)]
    flush_ms: Option<u64>,

    /// Delay between text field polls, in milliseconds.
    #[arg(long)]
    poll_ms: Option<u64>,

    /// Tap-then-press window that starts a drag, in milliseconds.
    #[arg(long)]
    tap_window_ms: Option<u64>,

    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long)]
    log_level: Option<String>,

    /// Record frames in memory and print them on exit instead of sending.
    #[arg(long)]
    dry_run: bool,

    /// Write the effective configuration to the config file and exit.
    #[arg(long)]
    init_config: bool,
}

impl Cli {
    /// Applies the CLI overrides on top of the file configuration.
    fn merge_into(&self, mut file: FileConfig) -> FileConfig {
        if let Some(endpoint) = &self.endpoint {
            file.client.endpoint = Some(endpoint.clone());
        }
        if let Some(level) = &self.log_level {
            file.client.log_level = level.clone();
        }
        if let Some(ms) = self.flush_ms {
            file.timing.flush_ms = ms;
        }
        if let Some(ms) = self.poll_ms {
            file.timing.poll_ms = ms;
        }
        if let Some(ms) = self.tap_window_ms {
            file.timing.tap_window_ms = ms;
        }
        file
    }

    /// Builds the runtime configuration from the merged file settings.
    ///
    /// # Errors
    ///
    /// Returns an error if a merged value is unusable (e.g. `--flush-ms 0`).
    fn into_client_config(self, file: FileConfig) -> anyhow::Result<ClientConfig> {
        let mut config = self
            .merge_into(file)
            .into_client_config()
            .context("invalid configuration")?;
        if self.dry_run && config.endpoint.is_none() {
            config.endpoint = Some(DRY_RUN_ENDPOINT.to_string());
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Program entry point.
///
/// 1. Parse CLI arguments and load the config file.
/// 2. Initialise `tracing` (`RUST_LOG`, else the configured level).
/// 3. Install a Ctrl+C handler that clears the shared `running` flag.
/// 4. Run the session on stdin until EOF or Ctrl+C.
///
/// The runtime is single-threaded: the session loop is one task, and channel
/// socket tasks only shuttle bytes.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file = load_config(cli.config.as_deref()).context("failed to load config file")?;
    let file = cli.merge_into(file);

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&file.client.log_level)),
        )
        .init();

    if cli.init_config {
        let path = save_config(&file, cli.config.as_deref()).context("failed to write config file")?;
        info!("wrote config to {}", path.display());
        return Ok(());
    }

    let dry_run = cli.dry_run;
    let config = cli.into_client_config(file)?;

    info!(
        endpoint = config.endpoint.as_deref().unwrap_or("<unset>"),
        flush_ms = config.flush_period.as_millis() as u64,
        poll_ms = config.poll_period.as_millis() as u64,
        dry_run,
        "web remote starting"
    );

    // ── Graceful shutdown flag ─────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    // ── Session ────────────────────────────────────────────────────────────────
    let recorder = MemoryChannelFactory::new();
    let factory: Box<dyn ChannelFactory> = if dry_run {
        Box::new(recorder.clone())
    } else {
        Box::new(WsChannelFactory::new())
    };

    let input = BufReader::new(tokio::io::stdin());
    let summary = run_session(config, input, factory, running).await?;

    if dry_run {
        for frame in recorder.sent() {
            println!("{frame}");
        }
    } else {
        tokio::time::sleep(SHUTDOWN_GRACE).await;
    }

    info!(
        events = summary.events,
        frames_sent = summary.frames_sent,
        frames_dropped = summary.frames_dropped,
        "web remote stopped"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_file_config_untouched() {
        // Arrange
        let cli = Cli::parse_from(["web-remote"]);

        // Act
        let merged = cli.merge_into(FileConfig::default());

        // Assert
        assert_eq!(merged, FileConfig::default());
    }

    #[test]
    fn test_cli_endpoint_override() {
        let cli = Cli::parse_from(["web-remote", "--endpoint", "ws://10.0.0.9:9000/r"]);
        let config = cli.into_client_config(FileConfig::default()).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("ws://10.0.0.9:9000/r"));
    }

    #[test]
    fn test_cli_timing_overrides() {
        // Arrange
        let cli = Cli::parse_from([
            "web-remote",
            "--flush-ms",
            "10",
            "--poll-ms",
            "45",
            "--tap-window-ms",
            "250",
        ]);

        // Act
        let config = cli.into_client_config(FileConfig::default()).unwrap();

        // Assert
        assert_eq!(config.flush_period, Duration::from_millis(10));
        assert_eq!(config.poll_period, Duration::from_millis(45));
        assert_eq!(config.tap_window, Duration::from_millis(250));
    }

    #[test]
    fn test_cli_overrides_win_over_file_values() {
        // Arrange
        let mut file = FileConfig::default();
        file.client.endpoint = Some("ws://from-file/r".to_string());
        file.timing.flush_ms = 50;
        let cli = Cli::parse_from(["web-remote", "--flush-ms", "15"]);

        // Act
        let config = cli.into_client_config(file).unwrap();

        // Assert: the file endpoint survives, the flush period is overridden
        assert_eq!(config.endpoint.as_deref(), Some("ws://from-file/r"));
        assert_eq!(config.flush_period, Duration::from_millis(15));
    }

    #[test]
    fn test_dry_run_supplies_an_endpoint() {
        let cli = Cli::parse_from(["web-remote", "--dry-run"]);
        let config = cli.into_client_config(FileConfig::default()).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some(DRY_RUN_ENDPOINT));
    }

    #[test]
    fn test_zero_flush_period_is_rejected() {
        let cli = Cli::parse_from(["web-remote", "--flush-ms", "0"]);
        assert!(cli.into_client_config(FileConfig::default()).is_err());
    }

    #[test]
    fn test_log_level_override() {
        let cli = Cli::parse_from(["web-remote", "--log-level", "debug"]);
        let merged = cli.merge_into(FileConfig::default());
        assert_eq!(merged.client.log_level, "debug");
    }
}
