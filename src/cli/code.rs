//! Code CLI subcommand
//!
//! This subcommand prints the alist of the parity check matrix of the
//! built-in IEEE 802.3an code to `stdout`, or a summary of its structure.
//! See [`crate::codes::ieee802_3an`] for more information about the code.
//!
//! # Examples
//! The alist is generated with
//! ```shell
//! $ ldpc-8023an code > ieee802_3an.alist
//! ```
//! The summary is printed with
//! ```shell
//! $ ldpc-8023an code --summary
//! ```

use crate::{cli::Run, code::CodeStructure, codes::ieee802_3an};
use clap::Parser;
use std::error::Error;

/// Code CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Prints the alist of the IEEE 802.3an LDPC code")]
pub struct Args {
    /// Prints a summary of the code structure instead of the alist
    #[arg(long)]
    summary: bool,
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let code = ieee802_3an::code()?;
        if self.summary {
            print!("{}", summary(&code));
        } else {
            print!("{}", code.alist());
        }
        Ok(())
    }
}

fn summary(code: &CodeStructure) -> String {
    let weights = code.column_weights();
    let min_weight = weights.iter().copied().min().unwrap_or(0);
    let max_weight = weights.iter().copied().max().unwrap_or(0);
    format!(
        "variable nodes: {}\n\
         check nodes: {}\n\
         systematic bits: {}\n\
         block size: {}\n\
         layers: {}\n\
         check degree: {}\n\
         column weight: {}..={}\n",
        code.num_variable_nodes(),
        code.num_check_nodes(),
        code.num_systematic_bits(),
        code.block_size(),
        code.num_layers(),
        code.max_check_degree(),
        min_weight,
        max_weight,
    )
}
