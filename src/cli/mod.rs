//! CLI for the transact API
//!
//! Subcommands:
//! - `serve`: run the HTTP server
//! - `migrate`: apply schema migrations and seed data, then exit

pub mod migrate;
pub mod serve;

use clap::{Parser, Subcommand};

/// Transact API - micro-transactions backend
#[derive(Parser)]
#[command(name = "transact-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Apply schema migrations and seed data, then exit
    Migrate,
}
