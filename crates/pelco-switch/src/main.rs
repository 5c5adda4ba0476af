//! Pelco-D camera switch: entry point.
//!
//! Reads a Pelco-D joystick on one serial port and forwards every frame to
//! whichever camera is currently selected.  An HTTP control surface selects
//! the camera, recalls and stores presets, and records the preview/program
//! mode.
//!
//! # Usage
//!
//! ```text
//! pelco-switch [OPTIONS]
//!
//! Options:
//!   --config    <PATH>  Config file [default: platform config dir]
//!   --bind      <ADDR>  HTTP listen address, overrides http.bind_address
//!   --baud-rate <N>     Serial baud rate, overrides serial.baud_rate
//! ```
//!
//! | Variable              | Overrides   |
//! |-----------------------|-------------|
//! | `PELCO_SWITCH_CONFIG` | `--config`  |
//! | `PELCO_SWITCH_BIND`   | `--bind`    |
//! | `RUST_LOG`            | `switch.log_level` |
//!
//! # Architecture overview
//!
//! ```text
//! joystick port ──► IngestJoystickUseCase ──► Forwarder ──► camera ports
//!                                                 ▲
//! HTTP (axum) ──► handlers ──► RouteTable ────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use pelco_switch::application::ingest_joystick::IngestJoystickUseCase;
use pelco_switch::application::manage_targets::RouteTable;
use pelco_switch::application::route_frames::Forwarder;
use pelco_switch::infrastructure::http::{create_router, AppState};
use pelco_switch::infrastructure::serial::{open_camera_endpoints, open_port};
use pelco_switch::infrastructure::storage::config::{config_file_path, load_config, AppConfig};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Routes a Pelco-D joystick to one of several PTZ cameras.
#[derive(Debug, Parser)]
#[command(name = "pelco-switch", version)]
struct Cli {
    /// Path to the TOML config file.
    ///
    /// Defaults to `config.toml` in the platform config directory.  A missing
    /// file means built-in defaults.
    #[arg(long, env = "PELCO_SWITCH_CONFIG")]
    config: Option<PathBuf>,

    /// HTTP listen address (`host:port`).
    #[arg(long, env = "PELCO_SWITCH_BIND")]
    bind: Option<String>,

    /// Baud rate for the joystick and every camera port.
    #[arg(long)]
    baud_rate: Option<u32>,
}

impl Cli {
    /// Loads the config file and applies command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if no config path can be determined or the file is
    /// unreadable, malformed, or invalid.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let path = match self.config {
            Some(path) => path,
            None => config_file_path().context("no --config given and no platform config dir")?,
        };
        let mut cfg =
            load_config(&path).with_context(|| format!("loading config from {}", path.display()))?;

        if let Some(bind) = self.bind {
            cfg.http.bind_address = bind;
        }
        if let Some(baud_rate) = self.baud_rate {
            cfg.serial.baud_rate = baud_rate;
        }
        Ok(cfg)
    }
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    cfg.http
        .bind_address
        .parse()
        .with_context(|| format!("invalid HTTP bind address: '{}'", cfg.http.bind_address))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Cli::parse().into_app_config()?;

    // `RUST_LOG` wins; otherwise the config file's level.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&cfg.switch.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("pelco-switch {} starting", env!("CARGO_PKG_VERSION"));

    let addr = bind_addr(&cfg)?;

    // ── Camera outputs and routing ────────────────────────────────────────────
    let endpoints = open_camera_endpoints(&cfg.cameras, cfg.serial.baud_rate)?;
    let routes = RouteTable::new(
        endpoints,
        &cfg.switch.default_target,
        cfg.switch.default_mode,
    )
    .context("building route table")?;
    let forwarder = Arc::new(Forwarder::new(Arc::new(routes)));

    // ── Joystick ingestion ────────────────────────────────────────────────────
    let joystick = open_port(&cfg.serial.joystick, cfg.serial.baud_rate)?;
    info!(
        "joystick on {} @ {} baud, routing to {}",
        cfg.serial.joystick, cfg.serial.baud_rate, cfg.switch.default_target
    );
    let ingest = IngestJoystickUseCase::new(Arc::clone(&forwarder));
    tokio::spawn(async move {
        let summary = ingest.run(joystick).await;
        if summary.ended_by_error {
            error!("joystick ingestion ended on a read error; control surface stays up");
        }
    });

    // ── HTTP control surface ──────────────────────────────────────────────────
    let app = create_router(AppState::new(forwarder, cfg.switch.camera_address));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding HTTP listener on {addr}"))?;
    info!("control surface listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("pelco-switch stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl+C, shutting down"),
        Err(e) => error!("failed to listen for Ctrl+C signal: {e}"),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
