//! `ldpc-8023an` CLI application
//!
//! The CLI application is organized in several subcommands. The
//! supported subcommands can be seen by running `ldpc-8023an`.
//! See the modules below for examples and more information about
//! how to use each subcommand.

use clap::Parser;
use std::error::Error;

pub mod code;
pub mod decode;

/// Trait to run a CLI subcommand
pub trait Run {
    /// Run the CLI subcommand
    fn run(&self) -> Result<(), Box<dyn Error>>;
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    name = "ldpc-8023an",
    about = "Hardware-compliant IEEE 802.3an LDPC decoder"
)]
pub enum Args {
    /// decode subcommand
    Decode(decode::Args),
    /// code subcommand
    Code(code::Args),
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        match self {
            Args::Decode(x) => x.run(),
            Args::Code(x) => x.run(),
        }
    }
}
