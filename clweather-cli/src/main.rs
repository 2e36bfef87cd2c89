//! Binary crate for the `clweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering bulletins for the terminal

use clap::Parser;

mod cli;
mod logging;
mod render;
mod run;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.log_level.as_deref());
    cmd.run().await
}
