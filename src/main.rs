use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xcalc::core::CalculationForm;
use xcalc::core::CurrencyCode;
use xcalc::core::log::init_logging;

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
    /// Calculate FIRST OPERATOR SECOND, e.g. `xcalc eval 8 / 4`
    #[command(allow_negative_numbers = true)]
    Eval {
        first: String,
        /// One of + - * / (quote * in most shells)
        operator: String,
        second: String,
        /// Convert the result from USD into this currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// List supported currencies
    Currencies,
    /// Show the latest USD exchange rate for a currency
    Rate {
        #[arg(value_parser = clap::value_parser!(CurrencyCode))]
        code: CurrencyCode,
    },
}

impl From<Commands> for xcalc::AppCommand {
    fn from(cmd: Commands) -> xcalc::AppCommand {
        match cmd {
            Commands::Eval {
                first,
                operator,
                second,
                currency,
            } => xcalc::AppCommand::Eval(CalculationForm {
                first,
                operator,
                second,
                currency,
            }),
            Commands::Currencies => xcalc::AppCommand::Currencies,
            Commands::Rate { code } => xcalc::AppCommand::Rate(code),
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => xcalc::cli::setup::setup(),
        Some(cmd) => xcalc::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
