// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.


use anyhow::{Context, Result};
use carta::{ErrorReporter, ReportConfig, ReportError, ReportGenerator};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(name = "carta-report")]
#[command(about = "Render sweep charts from evaluation metric CSV files")]
struct Cli {
    /// YAML report configuration; defaults are used when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    input_dir: Option<PathBuf>,
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Print the chart plan as JSON lines without loading or rendering.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
    #[arg(long, default_value_t = false)]
    debug: bool,
}

fn load_config(args: &Cli) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_yaml_file(path).map_err(ReportError::from)?,
        None => ReportConfig::default(),
    };
    if let Some(dir) = &args.input_dir {
        config.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    Ok(config)
}

fn run(args: &Cli) -> Result<()> {
    let config = load_config(args)?;
    let generator = ReportGenerator::new(config)?;
    if args.dry_run {
        for spec in generator.plan() {
            let line = serde_json::to_string(&spec).context("serialising chart plan")?;
            println!("{line}");
        }
        return Ok(());
    }
    let summary = generator.run()?;
    info!(
        "Report complete: {} rows, {} charts written, {} empty, {} skipped",
        summary.rows,
        summary.written.len(),
        summary.empty.len(),
        summary.skipped.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Cli::parse();

    let filter = if args.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<ReportError>() {
                Some(report_error) => eprintln!("{}", ErrorReporter::new().report(report_error)),
                None => eprintln!("Error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
