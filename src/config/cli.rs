use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "storefront-shipping")]
#[command(about = "Shipping rate quotes for the storefront checkout")]
pub struct CliConfig {
    /// TOML configuration file. Environment variables are used when omitted.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Run the HTTP API.
    Serve {
        /// Overrides the configured port.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Quote a single request read from a JSON file.
    Quote {
        #[arg(long)]
        request: PathBuf,
    },
}
