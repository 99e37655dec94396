//! `kyb-risk` — onboarding risk assessment for business counterparties.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and initialise logging.
//! 2. Load config ([`config::load_config`]) and apply flag overrides.
//! 3. Load the sanctions list ([`sanctions::SanctionsList::load_or_empty`]).
//! 4. Run the requested check: registry lookup ([`registry`]), sanctions
//!    screening ([`sanctions`]), bundle scoring or full assessment ([`risk`]).
//! 5. Render the requested report ([`report`]).
//! 6. Exit `0`, or `1` when `--fail-on-high` and a counterparty is labelled high.

mod batch;
mod cases;
mod cli;
mod config;
mod models;
mod registry;
mod report;
mod risk;
mod sanctions;

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cases::{load_cases, CaseQueue};
use cli::{Cli, Command, LogFormat, ReportFormat};
use config::load_config;
use models::{RiskLabel, VerificationBundle};
use registry::RegistryClient;
use sanctions::{SanctionsList, SanctionsScreener};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let cwd = std::env::current_dir().context("failed to resolve working directory")?;
    let mut config = load_config(&cwd, cli.config.as_deref())?;
    if cli.mock {
        config.registry.use_mock = true;
    }
    if let Some(path) = &cli.sanctions_file {
        config.sanctions.path = path.clone();
    }
    debug!(?config, "configuration loaded");

    match &cli.command {
        Command::Registry { query } => {
            let client = RegistryClient::new(&config.registry)?;
            print_json(&client.search(query).await)?;
        }
        Command::Sanctions { name } => {
            let screener = load_screener(&config.sanctions);
            print_json(&screener.check(name))?;
        }
        Command::Risk { input } => {
            let state = read_bundle(input)?;
            let bundle = VerificationBundle::from_value(&state);
            print_json(&risk::compute_risk(&bundle))?;
        }
        Command::Assess { name, fail_on_high } => {
            let client = RegistryClient::new(&config.registry)?;
            let screener = load_screener(&config.sanctions);

            let registry = client.search(name).await;
            let sanctions = screener.check(name);
            let assessment = risk::assess_at(name, registry, sanctions, risk::age::today());

            match cli.report {
                ReportFormat::Terminal => {
                    report::terminal::render_assessment(&assessment, cli.verbose, cli.quiet)?
                }
                ReportFormat::Json => print_json(&assessment)?,
            }

            if *fail_on_high && assessment.result().label == RiskLabel::High {
                std::process::exit(1);
            }
        }
        Command::Batch {
            input,
            fail_on_high,
        } => {
            let names = batch::load_names(input)?;
            let client = RegistryClient::new(&config.registry)?;
            let screener = load_screener(&config.sanctions);

            let assessments = batch::assess_all(
                &names,
                &client,
                &screener,
                Some(config.sanctions.path.as_path()),
                risk::age::today(),
                cli.quiet,
            )
            .await?;

            match cli.report {
                ReportFormat::Terminal => report::terminal::render_batch(&assessments, cli.quiet)?,
                ReportFormat::Json => print_json(&assessments)?,
            }

            let any_high = assessments
                .iter()
                .any(|a| a.result().label == RiskLabel::High);
            if *fail_on_high && any_high {
                std::process::exit(1);
            }
        }
        Command::Queue { input, sort } => {
            let queue = CaseQueue::build(load_cases(input)?, (*sort).into());
            debug!(cases = queue.len(), "case queue built");
            match cli.report {
                ReportFormat::Terminal => report::terminal::render_queue(&queue)?,
                ReportFormat::Json => print_json(&queue)?,
            }
        }
    }

    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn load_screener(config: &config::SanctionsConfig) -> SanctionsScreener {
    SanctionsScreener::with_threshold(
        SanctionsList::load_or_empty(&config.path),
        config.match_threshold,
    )
}

/// Read a JSON verification bundle from `path`, or stdin when `path` is `-`.
fn read_bundle(path: &Path) -> Result<serde_json::Value> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read bundle from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
