//! stocksense - AI shopping operations assistant

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;

use commands::{ask_command, init_command, status_command, tools_command};

/// stocksense - ask questions about your sales and inventory
#[derive(Parser)]
#[command(name = "stocksense")]
#[command(about = "AI shopping operations assistant for merchants")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config and data directories
    Init,
    /// Ask the agent a question
    Ask {
        /// The question to answer
        question: String,
        /// Print the tool usage trace after the answer
        #[arg(short, long)]
        debug: bool,
    },
    /// List the registered tools
    Tools,
    /// Show system status
    Status,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt().with_env_filter("debug").init();
    } else {
        tracing_subscriber::fmt::init();
    }

    match cli.command {
        Commands::Init => {
            if let Err(e) = init_command().await {
                error!("Init failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Ask { question, debug } => {
            if let Err(e) = ask_command(question, debug).await {
                error!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Tools => {
            if let Err(e) = tools_command().await {
                error!("Tools failed: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Status => {
            if let Err(e) = status_command().await {
                error!("Status failed: {}", e);
                std::process::exit(1);
            }
        }
    }
}
