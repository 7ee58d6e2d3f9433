//! `junction` command-line runner.
//!
//! Replays an arrival schedule through the intersection and prints every
//! light change to stdout. Diagnostics go to stderr, filtered by
//! `RUST_LOG` (default `warn`).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use junction::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "junction")]
#[command(about = "Simulate a four-way intersection with one traffic light per lane")]
struct Cli {
    /// Arrival schedule, one `id side direction time` per line. Runs the
    /// four-car reference scenario when omitted.
    #[arg(short, long)]
    schedule: Option<PathBuf>,
    /// Wall-clock milliseconds per simulated second
    #[arg(long, default_value_t = 1000)]
    second_ms: u64,
    /// Simulated seconds a car takes to cross
    #[arg(long, default_value_t = 5)]
    crossing: u64,
    /// Milliseconds to wait before retrying a rejected claim
    #[arg(long, default_value_t = 10)]
    retry_ms: u64,
    /// Milliseconds between drain checks
    #[arg(long, default_value_t = 1000)]
    poll_ms: u64,
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            second: Duration::from_millis(self.second_ms),
            crossing_secs: self.crossing,
            retry_backoff: Duration::from_millis(self.retry_ms),
            drain_poll: Duration::from_millis(self.poll_ms),
            topology: Topology::standard(),
        }
    }

    fn schedule(&self) -> Result<Schedule> {
        let Some(path) = &self.schedule else {
            return Ok(Schedule::reference());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading schedule {}", path.display()))?;
        text.parse::<Schedule>()
            .with_context(|| format!("parsing schedule {}", path.display()))
    }
}

fn run(cli: &Cli) -> Result<ShutdownReport> {
    let schedule = cli.schedule()?;
    info!(arrivals = schedule.len(), "schedule loaded");
    let report = Intersection::run(cli.config(), schedule, Arc::new(StdoutSink))?;
    if !report.is_clean() {
        anyhow::bail!(
            "{} of 9 lights joined cleanly (feed joined: {}, monitor joined: {})",
            report.controllers_joined,
            report.feed_joined,
            report.monitor_joined
        );
    }
    Ok(report)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(report) => {
            info!(
                cars = report.metrics.cars_crossed,
                elapsed_secs = report.elapsed_secs,
                "all cars crossed"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
