//! Bundlegen - operator bundle generator
//!
//! Aggregates Kubernetes resource manifests, drives `operator-sdk generate
//! bundle`, and rewrites the resulting ClusterServiceVersion with substituted
//! images, related-image provenance, and upgrade metadata.

use clap::Parser;

mod bundle;
mod cli;
mod commands;
mod config;
mod csv;
mod error;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate(args) => commands::generate::run(args, cli.verbose),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
