//! CLI for the document processing gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Docgate - document processing gateway
#[derive(Parser)]
#[command(name = "docgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the gateway server
    Serve,
}
