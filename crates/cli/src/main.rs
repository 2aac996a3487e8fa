//! Kaos EUY! CLI - quoting, payload inspection and payment tools.
//!
//! # Usage
//!
//! ```bash
//! # Price a design + variant batch
//! kaos-cli quote order.yaml
//!
//! # Summarize a stored customization, order item or order
//! kaos-cli inspect order.json
//!
//! # Payment gateway signatures
//! kaos-cli payment sign --order-id <uuid> --amount 400000
//! kaos-cli payment verify callback.json
//! ```
//!
//! # Commands
//!
//! - `quote` - Apply a design, add variants, log fee and totals
//! - `inspect` - Normalize and summarize stored customization JSON
//! - `payment sign` / `payment verify` - Inquiry and callback signatures

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kaos_euy_core::OrderId;
use rust_decimal::Decimal;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "kaos-cli")]
#[command(author, version, about = "Kaos EUY! CLI tools")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Quote a customized product from a YAML file
    Quote {
        /// Path to the quote file
        file: PathBuf,
    },
    /// Normalize and summarize stored customization JSON
    Inspect {
        /// Path to a customization, order item or order JSON file
        file: PathBuf,
    },
    /// Payment gateway signatures
    Payment {
        #[command(subcommand)]
        action: PaymentAction,
    },
}

#[derive(Subcommand)]
enum PaymentAction {
    /// Compute the inquiry signature for an order
    Sign {
        /// Order id (merchant order id)
        #[arg(long)]
        order_id: OrderId,

        /// Amount in rupiah (rounded to whole rupiah)
        #[arg(long)]
        amount: Decimal,

        /// Buyer email; when given, the full inquiry body is printed
        #[arg(long)]
        email: Option<String>,

        /// Buyer name
        #[arg(long, default_value = "Guest")]
        name: String,

        /// Buyer phone number
        #[arg(long)]
        phone: Option<String>,

        /// Payment method code
        #[arg(long, default_value = "BC")]
        method: String,

        /// Number of order lines, for the payment page description
        #[arg(long, default_value_t = 1)]
        lines: usize,
    },
    /// Verify a callback body captured from the gateway
    Verify {
        /// Path to the callback JSON
        file: PathBuf,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("kaos_euy_cli=info,kaos_euy_core=info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Quote { file } => {
            let config = config::CliConfig::from_env()?;
            commands::quote::run(&file, &config).await?;
        }
        Commands::Inspect { file } => commands::inspect::run(&file).await?,
        Commands::Payment { action } => {
            let config = config::payment_from_env()?;
            match action {
                PaymentAction::Sign {
                    order_id,
                    amount,
                    email,
                    name,
                    phone,
                    method,
                    lines,
                } => commands::payment::sign(
                    &config,
                    &commands::payment::SignArgs {
                        order_id,
                        amount,
                        email,
                        name,
                        phone,
                        method,
                        lines,
                    },
                )?,
                PaymentAction::Verify { file } => {
                    commands::payment::verify(&config, &file).await?;
                }
            }
        }
    }
    Ok(())
}
