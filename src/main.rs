use anyhow::Result;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use rust_decimal::Decimal;
use xconv::cli::convert::ConvertArgs;
use xconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the currencies supported by the provider
    Currencies,
    /// Convert an amount between two currencies
    Convert {
        /// Amount to convert, between 0.01 and 1e14
        #[arg(default_value = "1.0")]
        amount: Decimal,
        /// Source currency code; defaults to the first supported currency
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code; defaults to the second supported currency
        #[arg(short, long)]
        to: Option<String>,
        /// Conversion date as YYYY-MM-DD; defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },
    /// Fill in the conversion form interactively
    Form,
}

impl From<Commands> for xconv::AppCommand {
    fn from(cmd: Commands) -> xconv::AppCommand {
        match cmd {
            Commands::Currencies => xconv::AppCommand::Currencies,
            Commands::Convert {
                amount,
                from,
                to,
                date,
            } => xconv::AppCommand::Convert(ConvertArgs {
                amount,
                from,
                to,
                date,
            }),
            Commands::Form => xconv::AppCommand::Form,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => xconv::cli::setup::setup_at_path(path),
            None => xconv::cli::setup::setup(),
        },
        Some(cmd) => xconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
