use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cases::QueueSort;

#[derive(Parser, Debug)]
#[command(
    name = "kyb-risk",
    about = "Score counterparty onboarding risk from registry and sanctions checks",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file [default: ./.kyb-risk/config.toml, fallback ~/.config/kyb-risk/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve the fixed mock record instead of calling the registry API
    #[arg(long, global = true)]
    pub mock: bool,

    /// Sanctions list CSV (overrides config and SANCTIONS_FILE)
    #[arg(long, global = true, value_name = "FILE")]
    pub sanctions_file: Option<PathBuf>,

    /// Report format for assess, batch and queue
    #[arg(long, global = true, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Log output format (logs go to stderr)
    #[arg(long, global = true, default_value = "text", value_name = "FORMAT")]
    pub log_format: LogFormat,

    /// Show signals and rule contributions
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up a company in the registry and print the normalized record
    Registry {
        /// Company name to search for
        query: String,
    },

    /// Screen a name against the sanctions list
    Sanctions {
        /// Person or company name
        name: String,
    },

    /// Score a verification bundle read from a JSON file ("-" for stdin)
    Risk {
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Run both checks for one counterparty and score it
    Assess {
        /// Counterparty name
        name: String,

        /// Exit with status 1 if the counterparty is labelled high
        #[arg(long)]
        fail_on_high: bool,
    },

    /// Assess every counterparty in a CSV file with a `name` column
    Batch {
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Exit with status 1 if any counterparty is labelled high
        #[arg(long)]
        fail_on_high: bool,
    },

    /// Show the approvals queue from a JSON array of cases
    Queue {
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Ordering of the pending group
        #[arg(long, default_value = "score")]
        sort: SortArg,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SortArg {
    Score,
    Recent,
}

impl From<SortArg> for QueueSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Score => QueueSort::Score,
            SortArg::Recent => QueueSort::Recent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "kyb-risk",
            "assess",
            "Acme Ltd",
            "--mock",
            "--report",
            "json",
            "--fail-on-high",
        ])
        .unwrap();
        assert!(cli.mock);
        assert!(matches!(cli.report, ReportFormat::Json));
        match cli.command {
            Command::Assess { name, fail_on_high } => {
                assert_eq!(name, "Acme Ltd");
                assert!(fail_on_high);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_queue_sort_defaults_to_score() {
        let cli = Cli::try_parse_from(["kyb-risk", "queue", "cases.json"]).unwrap();
        match cli.command {
            Command::Queue { sort, .. } => assert_eq!(QueueSort::from(sort), QueueSort::Score),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_risk_accepts_stdin_marker() {
        let cli = Cli::try_parse_from(["kyb-risk", "risk", "-"]).unwrap();
        assert!(matches!(cli.command, Command::Risk { ref input } if input.as_os_str() == "-"));
        assert!(matches!(cli.log_format, LogFormat::Text));
    }
}
