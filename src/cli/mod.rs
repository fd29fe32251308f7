//! Command line entry points

pub mod serve;

use clap::{Parser, Subcommand};

/// RestJSON - serve JSON documents as REST APIs
#[derive(Parser)]
#[command(name = "restjson")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web and public APIs
    Serve,
}
