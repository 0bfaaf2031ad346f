//! SharedCart CLI - settle a set of bills and confirm the result.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod input;
mod output;

use commands::{canonicalize, confirm, settle, verify_confirmation};

#[derive(Parser)]
#[command(name = "sharedcart")]
#[command(about = "Shared-expense settlement calculator")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute balances and transfers for a settlement request
    Settle {
        /// Request JSON file (or stdin if not provided)
        request: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Reject requests with more than N bills (default: unlimited)
        #[arg(long)]
        max_bills: Option<usize>,
        /// Reject inputs larger than SIZE bytes (default: unlimited)
        #[arg(long)]
        max_size: Option<u64>,
    },
    /// Produce a confirmation for a settlement request
    Confirm {
        /// Request JSON file (or stdin if not provided)
        request: Option<String>,
        /// Write the confirmation to FILE instead of stdout
        #[arg(long)]
        out: Option<String>,
        /// Reject inputs larger than SIZE bytes (default: unlimited)
        #[arg(long)]
        max_size: Option<u64>,
    },
    /// Check a confirmation against a recomputed settlement
    VerifyConfirmation {
        /// Request JSON file the settlement was computed from
        request: String,
        /// Confirmation JSON file
        confirmation: String,
    },
    /// Show canonical bytes for input JSON
    Canonicalize {
        /// Input JSON file (or stdin if not provided)
        input: Option<String>,
    },
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Settle {
            request,
            json,
            max_bills,
            max_size,
        } => settle::run(request, json, max_bills, max_size),
        Commands::Confirm {
            request,
            out,
            max_size,
        } => confirm::run(request, out, max_size),
        Commands::VerifyConfirmation {
            request,
            confirmation,
        } => verify_confirmation::run(request, confirmation),
        Commands::Canonicalize { input } => canonicalize::run(input),
    };

    if let Err(e) = result {
        tracing::debug!(error = %e, "command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
