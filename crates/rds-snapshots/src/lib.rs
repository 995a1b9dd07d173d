//! rds-snapshots library crate
//!
//! Takes a snapshot of one RDS instance, writes a short metadata note for it
//! to S3, and deletes the instance's snapshots that have outlived the
//! retention window. The binary is a thin wrapper around [`run`].

pub mod cli;
pub mod config;
pub mod identifier;
pub mod runner;
pub mod stages;
pub mod tracing_setup;

#[cfg(test)]
pub mod test_utils;

use anyhow::{Context, Result};
use clap::Parser;
use rds_snapshots_services::create_services;
use std::process::ExitCode;
use tracing::info;

use crate::cli::Cli;
use crate::config::Config;
use crate::runner::{RunOptions, RunReport, Runner};

/// Exit codes following Unix conventions
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Exit status for a finished run
///
/// Stage failures only surface in the status when `strict` is set.
pub fn exit_status(report: &RunReport, strict: bool) -> u8 {
    if strict && report.has_failures() {
        EXIT_ERROR
    } else {
        EXIT_SUCCESS
    }
}

/// Main entry point for rds-snapshots.
///
/// Parses command line arguments, loads configuration and performs one run.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    tracing_setup::init(cli.log_format);

    let config = match Config::load(cli.config.as_deref(), &cli.overrides()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return Ok(ExitCode::from(EXIT_USAGE));
        }
    };

    let services = create_services(&config.backend)
        .await
        .context("Failed to create service clients")?;

    let runner = Runner::from_config(
        &config,
        services,
        RunOptions {
            dry_run: cli.dry_run,
        },
    )
    .context("Failed to prepare run")?;

    info!(
        instance_id = %config.instance_id,
        bucket = %config.bucket_name,
        retention_days = config.retention_days,
        backend = ?config.backend.backend,
        dry_run = cli.dry_run,
        "Starting snapshot run"
    );

    let report = runner.run().await;
    report.log_summary();

    Ok(ExitCode::from(exit_status(&report, cli.strict)))
}
