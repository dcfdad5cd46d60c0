//! HAR replay server.
//!
//! Serves the responses recorded in a HAR archive as a local mock backend.
//!
//! # Architecture Overview
//!
//! ```text
//!   HAR file ──▶ har::loader ──▶ har::ingest ──▶ Entry[] ──▶ routing::registry
//!                                                                  │ (frozen)
//!                                                                  ▼
//!   Client ──▶ net::listener ──▶ http::server ──▶ routing::matcher ──▶ http::response
//!                                      │
//!                                      └── GET / ──▶ http::dashboard
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use har_replay::config::{load_config, validate_config, ReplayConfig};
use har_replay::lifecycle::{self, Shutdown, StartupError};
use har_replay::observability::logging;

#[derive(Parser)]
#[command(name = "har-replay", version)]
#[command(about = "Replay a HAR archive as a local HTTP mock server", long_about = None)]
struct Cli {
    /// HAR file to replay
    har_file: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Do not add CORS headers or answer preflight requests
    #[arg(long)]
    no_cors: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    /// Do not log individual requests
    #[arg(short, long)]
    quiet: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Expose Prometheus metrics on this address
    #[arg(long, value_name = "ADDR")]
    metrics: Option<String>,

    /// Print every ingested entry and exit
    #[arg(long)]
    dump: bool,
}

impl Cli {
    /// Apply command-line overrides on top of the file (or default) configuration.
    fn apply(&self, config: &mut ReplayConfig) {
        if let Some(path) = &self.har_file {
            config.har.path = Some(path.clone());
        }
        if self.host.is_some() || self.port.is_some() {
            config.listener.bind_address =
                splice_bind_address(&config.listener.bind_address, self.host.as_deref(), self.port);
        }
        if self.no_cors {
            config.cors.enabled = false;
        }
        if self.verbose {
            config.observability.log_level = "debug".to_string();
        }
        if self.quiet {
            config.observability.log_requests = false;
        }
        if self.json_logs {
            config.observability.log_format = "json".to_string();
        }
        if let Some(addr) = &self.metrics {
            config.observability.metrics_enabled = true;
            config.observability.metrics_address = addr.clone();
        }
    }
}

/// Replace the host and/or port of a `host:port` bind address.
fn splice_bind_address(current: &str, host: Option<&str>, port: Option<u16>) -> String {
    let (current_host, current_port) = current.rsplit_once(':').unwrap_or(("127.0.0.1", "3000"));
    let host = match host {
        // Bare IPv6 literals need brackets once a port follows.
        Some(h) if h.contains(':') && !h.starts_with('[') => format!("[{h}]"),
        Some(h) => h.to_string(),
        None => current_host.to_string(),
    };
    let port = port.map_or_else(|| current_port.to_string(), |p| p.to_string());
    format!("{host}:{port}")
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => ReplayConfig::default(),
    };
    cli.apply(&mut config);

    if let Err(errors) = validate_config(&config) {
        for e in errors {
            eprintln!("Error: {}", e);
        }
        return ExitCode::FAILURE;
    }

    logging::init_logging(&config.observability);

    if cli.dump {
        return dump(&config);
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        cors = config.cors.enabled,
        "har-replay starting"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    match lifecycle::start(config, shutdown.subscribe()).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(StartupError::NoEntries { path, errors }) => {
            eprintln!("Error: no entries could be loaded from {}", path.display());
            for e in errors {
                eprintln!("  {}", e);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Print every entry of the configured HAR file through the text codec.
fn dump(config: &ReplayConfig) -> ExitCode {
    let Some(path) = &config.har.path else {
        eprintln!("Error: {}", StartupError::MissingHarPath);
        return ExitCode::FAILURE;
    };

    match lifecycle::dump_har_file(path) {
        Ok(dump) => {
            for e in &dump.errors {
                eprintln!("Parse error: {}", e);
            }
            println!("{}", dump.text);
            ExitCode::SUCCESS
        }
        Err(StartupError::NoEntries { errors, .. }) => {
            for e in &errors {
                eprintln!("Parse error: {}", e);
            }
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
