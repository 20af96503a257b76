//! Reflow CLI.
//!
//! Reads a reflow request (JSON) from a file or stdin and prints the
//! response JSON to stdout. Logs go to stderr; set `RUST_LOG` to tune them.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use u_reflow::api::{self, ReflowRequest, ReflowResponse};
use u_reflow::scheduler::ReflowKpi;
use u_reflow::{ReflowConfig, ReflowEngine};

#[derive(Parser)]
#[command(name = "u-reflow")]
#[command(about = "Reflow a manufacturing schedule around shifts, maintenance, and dependencies")]
struct Cli {
    /// Request file (JSON). Reads stdin when omitted or "-".
    input: Option<PathBuf>,

    /// Days to search ahead for the next shift before giving up
    #[arg(long)]
    horizon_days: Option<u32>,

    /// Pretty-print the response
    #[arg(long)]
    pretty: bool,

    /// Also print reflow KPIs (JSON) to stderr
    #[arg(long)]
    kpi: bool,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() != "-" => std::fs::read_to_string(p)
            .with_context(|| format!("failed to read {}", p.display())),
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.verbose { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let raw = read_input(cli.input.as_ref())?;
    let request: ReflowRequest =
        serde_json::from_str(&raw).context("request is not a valid reflow request")?;

    let mut config = ReflowConfig::new();
    if let Some(days) = cli.horizon_days {
        config = config.with_shift_search_days(days);
    }
    let engine = ReflowEngine::new().with_config(config);

    info!(
        work_orders = request.work_orders.len(),
        work_centers = request.work_centers.len(),
        "request loaded"
    );
    let response = api::handle(&request, &engine);

    if cli.kpi {
        if let ReflowResponse::Success(result) = &response {
            eprintln!("{}", to_json(&ReflowKpi::calculate(result), cli.pretty)?);
        }
    }
    println!("{}", to_json(&response, cli.pretty)?);

    Ok(())
}
