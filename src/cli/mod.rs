//! CLI module for Concierge
//!
//! Provides command-line interface parsing for the `concierge` binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;
pub mod repl;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Concierge - customer service chatbot server
#[derive(Parser, Debug)]
#[command(
    name = "concierge",
    version,
    about = "Concierge - customer service chatbot server",
    long_about = "A customer service assistant that answers store FAQ questions, answers questions\n\
                  about a loaded document, files complaints, tracks orders and escalates complaints.\n\n\
                  Run without arguments to start the server, or use 'chat' for a terminal session.",
    after_help = "EXAMPLES:\n    \
                  concierge                          # Start the server (reads concierge.toml)\n    \
                  concierge chat                     # Chat in the terminal against a running server\n    \
                  concierge config --validate        # Check the configuration\n    \
                  concierge --config prod.toml serve # Use a custom config file"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "concierge.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve {
        /// Override the configured host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Chat with the assistant in the terminal
    ///
    /// Complaints, order tracking and escalations go to the support API at
    /// `support_api.base_url`, so a server should be running.
    Chat {
        /// Order ID used when you press Enter at the order prompt
        /// (defaults to `chat.default_order_id`)
        #[arg(long)]
        default_order_id: Option<String>,
    },

    /// Show configuration information
    Config {
        /// Validate the configuration file and referenced environment variables
        #[arg(long)]
        validate: bool,
    },
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
