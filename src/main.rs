/*
 *  main.rs
 *
 *  stratux-screen - receiver status at a glance
 *	(c) 2026 Stratux Screen contributors
 *
 *	This program is free software: you can redistribute it and/or modify
 *	it under the terms of the GNU General Public License as published by
 *	the Free Software Foundation, either version 3 of the License, or
 *	(at your option) any later version.
 *
 *	This program is distributed in the hope that it will be useful,
 *	but WITHOUT ANY WARRANTY; without even the implied warranty of
 *	MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *	GNU General Public License for more details.
 *
 *	See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *	Public License.
 *
 */

use std::fs::OpenOptions;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};
use log::{error, info, warn};

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind}; // Import specific Unix signals

use stratux_screen::config::{self, Cli, Config};
use stratux_screen::cycle::DisplayCycle;
use stratux_screen::display::{bitmap, DisplayDriverFactory, DisplayManager};
use stratux_screen::pidfile::PidFile;
use stratux_screen::status::StatusClient;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
/// Once a signal is caught, it logs the event and returns, allowing for
/// graceful shutdown.
async fn signal_handler() -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

/// RUST_LOG wins over the configured level; a log file replaces stderr
fn init_logging(cfg: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        Env::default().default_filter_or(cfg.log_level.as_str())
    );
    builder.format_timestamp_secs();

    if let Some(path) = &cfg.daemon.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
    }

    builder.init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli).context("loading configuration")?;

    if cli.dump_config {
        print!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    init_logging(&cfg)?;
    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let _pidfile = match &cfg.daemon.pidfile {
        Some(path) => Some(
            PidFile::acquire(path, Duration::from_secs(cfg.daemon.pidfile_timeout_secs))
                .await
                .with_context(|| format!("claiming PID file {}", path.display()))?,
        ),
        None => None,
    };

    let driver = DisplayDriverFactory::create_from_config(&cfg.display)
        .context("opening display")?;
    let sink = DisplayManager::new(driver, cfg.display.font);

    let client = StatusClient::new(&cfg.status).context("building status client")?;
    info!("Status from {} and {}", client.status_url(), client.towers_url());

    let mut cycle = DisplayCycle::new(
        client,
        sink,
        &cfg.layout,
        Duration::from_secs(cfg.cycle.check_period_secs),
    );

    if cfg.cycle.splash {
        match bitmap::load_logo(&cfg.cycle.logo_path) {
            Ok(logo) => {
                cycle = cycle.with_splash(logo, Duration::from_secs(cfg.cycle.logo_secs));
            }
            Err(e) => warn!("Skipping splash: {}", e),
        }
    }

    // Main application loop
    tokio::select! {
        // Handle Unix signals for graceful shutdown
        res = signal_handler() => {
            if let Err(e) = res {
                error!("Signal handling failed: {}", e);
            }
        }
        _ = cycle.run() => {
            info!("Closed Application Loop.");
        }
    }

    info!("Main application exiting. Clearing display.");
    cycle.shutdown();

    Ok(())
}
