//! Paysheet Demo CLI
//!
//! Command-line driver for exploring the payment sheet: replay drag gestures,
//! type on the password pad, inspect configuration and run a checkout.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use paysheet_demo_cli::commands::{self, checkout::Decision, SheetOptions};
use paysheet_demo_cli::ui;

#[derive(Parser)]
#[command(name = "paysheet-demo")]
#[command(about = "Paysheet Demo CLI - Drive the payment bottom sheet from a terminal", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    sheet: SheetOptions,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a drag gesture, e.g. "handle@0:0,60:90,120:140"
    Drag {
        /// Origin, '@', then time:y samples (ms:px); the first sample is the press
        script: String,

        /// Draw the sheet at its last drag position
        #[arg(long)]
        frames: bool,
    },

    /// Type keys on the password pad ('<' deletes)
    Pin {
        /// Key sequence, e.g. "12<34"
        keys: String,

        /// Amount shown on the sheet
        #[arg(short, long, default_value = "0")]
        amount: f64,
    },

    /// Show the effective configuration and methods
    Config {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Open the sheet and pay interactively
    Checkout {
        /// Amount to pay
        #[arg(short, long, default_value = "0")]
        amount: f64,

        /// Skip the prompts: pick this method index and confirm
        #[arg(long, value_name = "INDEX")]
        auto: Option<usize>,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("paysheet_demo_cli=debug,paysheet_lib=debug")
        } else {
            EnvFilter::new("paysheet_demo_cli=info,paysheet_lib=warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli) {
        ui::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Drag { script, frames } => commands::drag::run(&cli.sheet, &script, frames),
        Commands::Pin { keys, amount } => commands::pin::run(&cli.sheet, amount, &keys),
        Commands::Config { json } => commands::config::run(&cli.sheet, json),
        Commands::Checkout { amount, auto: None } => {
            commands::checkout::run(&cli.sheet, amount, cli.verbose)
        }
        Commands::Checkout {
            amount,
            auto: Some(method),
        } => {
            let events = commands::checkout::scripted(&cli.sheet, amount, method, &Decision::Confirm)?;
            commands::print_events(&events);
            Ok(())
        }
    }
}
