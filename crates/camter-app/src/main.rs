// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Camter shell — headless host runner
//
// Entry point. Initialises logging and services, then drives the host
// container from newline-delimited JSON events on stdin.

mod runner;
mod services;
mod webview;

use std::process::ExitCode;

use clap::Parser;
use services::app_services::{AppServices, BridgeKind};

#[derive(Debug, Parser)]
#[command(name = "camter", about = "Headless Camter shell host", version)]
struct Cli {
    /// Answer native calls with the stub bridge instead of the simulated device
    #[arg(long)]
    stub_bridge: bool,

    /// Deep links delivered once the first page has loaded
    links: Vec<String>,
}

impl Cli {
    fn bridge(&self) -> BridgeKind {
        if self.stub_bridge {
            BridgeKind::Stub
        } else {
            BridgeKind::Simulated
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Camter shell starting");

    let bridge = cli.bridge();
    let services = match AppServices::init(bridge) {
        Ok(s) => {
            tracing::info!("services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "persistent storage failed; using in-memory fallback");
            match AppServices::fallback(bridge) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "fallback initialisation failed");
                    return ExitCode::FAILURE;
                }
            }
        }
    };

    match runner::run(&services, &cli.links, tokio::io::stdin()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "runner stopped");
            ExitCode::FAILURE
        }
    }
}
