mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use commands::blend::BlendArgs;
use commands::discount::DiscountArgs;
use commands::fees::FeesArgs;
use commands::market::MarketArgs;
use commands::pricing::PriceArgs;

/// Roasted coffee bean pricing and profit simulation
#[derive(Parser)]
#[command(
    name = "roastcalc",
    version,
    about = "Roasted coffee bean pricing and profit simulation",
    long_about = "Derives roasted yield, sellable bags, per-bag cost, recommended retail and \
                  wholesale prices, break-even point and expected profit for up to five beans, \
                  and simulates bulk-bag discounts, blends and sales-channel fees."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    output: OutputFormat,

    /// Log pipeline steps to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Price up to five beans (yield, bags, prices, break-even, profit)
    Price(PriceArgs),
    /// Simulate a discounted bulk bag and sweep the profit curve
    Discount(DiscountArgs),
    /// Cost a blend recipe and price it as one batch
    Blend(BlendArgs),
    /// Compare platform and payment fees for one shelf price
    Fees(FeesArgs),
    /// Compare a recommended price against competitor prices
    Market(MarketArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Cards,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(output = ?cli.output, "starting roastcalc");

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Price(args) => commands::pricing::run_price(args),
        Commands::Discount(args) => commands::discount::run_discount(args),
        Commands::Blend(args) => commands::blend::run_blend(args),
        Commands::Fees(args) => commands::fees::run_fees(args),
        Commands::Market(args) => commands::market::run_market(args),
        Commands::Version => {
            println!("roastcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
