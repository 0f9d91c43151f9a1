use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use ratebot::core::log::init_logging;
use std::path::PathBuf;

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
    /// Start the Telegram bot
    Run,
    /// Answer a single bot command locally, e.g. "/exchange $10 to EUR"
    Ask {
        /// The command text, as it would be typed in the chat
        text: String,

        /// Where to write the chart produced by /history
        #[arg(long, default_value = "plot.png")]
        chart_out: PathBuf,
    },
}

impl From<Commands> for ratebot::AppCommand {
    fn from(cmd: Commands) -> ratebot::AppCommand {
        match cmd {
            Commands::Run => ratebot::AppCommand::Run,
            Commands::Ask { text, chart_out } => ratebot::AppCommand::Ask { text, chart_out },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => ratebot::cli::setup::setup(),
        Some(cmd) => ratebot::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
