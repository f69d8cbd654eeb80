use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod chat;
pub mod serve;

use crate::core::{AppConfig, logging};

#[derive(Subcommand)]
enum Command {
    /// Run the chat relay API server
    Serve {
        /// Set the server host address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Set the server port
        #[arg(long, default_value = "2222")]
        port: String,
    },
    /// Start an interactive chat session in the terminal
    Chat {
        /// Override the model from GEMCHAT_MODEL
        #[arg(long)]
        model: Option<String>,
    },
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();

    logging::init();
    let mut config = AppConfig::default();

    // Handle each sub command
    match args.command {
        Some(Command::Serve { host, port }) => {
            serve::run(host, port, config).await?;
        }
        Some(Command::Chat { model }) => {
            if let Some(model) = model {
                config.model = model;
            }
            chat::run(config).await?;
        }
        None => {}
    }

    Ok(())
}
