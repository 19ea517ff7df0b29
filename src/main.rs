mod checker;
mod config;
mod diagnostics;
mod error;
mod extractor;
mod inventory;
mod resolver;
mod types;
mod watch;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter.
const LOG_ENV: &str = "DOCLINKS_LOG";

/// Top-level CLI.
#[derive(Parser)]
#[command(name = "doclinks", version, about = "Find dangling internal links between markdown documents")]
struct Cli {
    /// Root options for the default check when no subcommand is given.
    #[command(flatten)]
    check: RootArgs,
    /// Subcommand; defaults to `check`.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Increase log verbosity on stderr (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check every markdown document once (the default)
    Check(RootArgs),
    /// Check, then re-check whenever a file under the root changes
    Watch(RootArgs),
}

/// Location of the document collection.
#[derive(Args)]
struct RootArgs {
    /// Collection root directory.
    #[arg(long, default_value = ".")]
    root: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    return match cli.command {
        None => run_check(&cli.check.root),
        Some(Commands::Check(args)) => run_check(&args.root),
        Some(Commands::Watch(args)) => match watch::run(&args.root) {
            Ok(code) => code,
            Err(e) => {
                diagnostics::print_error(&e);
                ExitCode::FAILURE
            },
        },
    };
}

/// Install the stderr subscriber. `DOCLINKS_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| return EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
    return;
}

/// Run one check, print failures to stdout, and map the result to an exit code.
fn run_check(root: &Path) -> ExitCode {
    return match checker::run(root) {
        Ok(report) => {
            report.print();
            if report.success() { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        },
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
    };
}
