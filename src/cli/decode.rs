//! Decode CLI subcommand.
//!
//! This subcommand decodes one frame with the hardware-compliant decoder and
//! prints the run statistics.
//!
//! # Examples
//!
//! A frame of channel LLRs stored as whitespace-separated real values can be
//! decoded with
//! ```shell
//! $ ldpc-8023an decode --scheduling TWO_PHASE --num-iterations 20 frame.txt
//! ```
//! Without an input file, the all-zero codeword is decoded with some bits in
//! error. The floating-point reference decoder can be run at the same time:
//! ```shell
//! $ ldpc-8023an decode --flips 40 --seed 1 --reference --trace
//! ```

use crate::{
    cli::Run,
    codes::ieee802_3an,
    decoder::{
        config::{CheckNodeAlgorithm, DecoderConfig, SchedulingMode},
        factory::{DecodeReport, DecoderImplementation},
    },
    vectors::{self, Rng, SeedableRng},
};
use clap::Parser;
use std::{error::Error, fs::File, io::Write, path::PathBuf, time::Instant};

/// Decode CLI arguments.
#[derive(Debug, Parser)]
#[command(about = "Decodes a frame")]
pub struct Args {
    /// Input file with the channel LLRs (positive LLRs favour zero bits)
    input: Option<PathBuf>,
    /// Output file (decoded bits, unpacked)
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of bits in error when no input file is given
    #[arg(long, default_value_t = 0)]
    flips: usize,
    /// LLR magnitude when no input file is given
    #[arg(long, default_value_t = 1.0)]
    magnitude: f64,
    /// Seed for the bits in error
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Decoder implementation
    #[arg(long, default_value_t = DecoderImplementation::Fixed)]
    implementation: DecoderImplementation,
    /// Also runs the floating-point reference decoder
    #[arg(long)]
    reference: bool,
    /// Prints per-iteration statistics
    #[arg(long)]
    trace: bool,
    /// Message passing schedule
    #[arg(long, default_value_t = SchedulingMode::Layered)]
    scheduling: SchedulingMode,
    /// Check node update rule
    #[arg(long, default_value_t = CheckNodeAlgorithm::NormalizedMinSum)]
    check_node_algorithm: CheckNodeAlgorithm,
    /// Number of smallest magnitudes used by the λ-min rule
    #[arg(long, default_value_t = 2)]
    num_lambda_min: usize,
    /// Normalization factor or offset of the check node rule
    #[arg(long, default_value_t = 0.75)]
    scaling_factor: f64,
    /// Fractional bits of the channel values
    #[arg(long, default_value_t = 2)]
    fractional_bits: u32,
    /// Bit width of the check node messages
    #[arg(long, default_value_t = 6)]
    extrinsic_bit_width: u32,
    /// Bit width of the APP values
    #[arg(long, default_value_t = 8)]
    app_bit_width: u32,
    /// Maximum number of iterations
    #[arg(long, default_value_t = 10)]
    num_iterations: usize,
    /// Number of parallel memory lanes
    #[arg(long, default_value_t = 1)]
    partition_count: usize,
    /// Early termination threshold (unused by this code)
    #[arg(long, default_value_t = 0)]
    threshold: u32,
}

impl Args {
    fn config(&self) -> DecoderConfig {
        DecoderConfig {
            scheduling: self.scheduling,
            check_node_algorithm: self.check_node_algorithm,
            num_lambda_min: self.num_lambda_min,
            scaling_factor: self.scaling_factor,
            fractional_bits: self.fractional_bits,
            extrinsic_bit_width: self.extrinsic_bit_width,
            app_bit_width: self.app_bit_width,
            num_iterations: self.num_iterations,
            partition_count: self.partition_count,
            threshold: self.threshold,
        }
    }

    fn llrs(&self) -> Result<Vec<f64>, Box<dyn Error>> {
        Ok(match &self.input {
            Some(path) => parse_llrs(&std::fs::read_to_string(path)?)?,
            None if self.flips > ieee802_3an::NUM_VARIABLE_NODES => {
                return Err(format!(
                    "cannot flip {} bits of a {}-bit codeword",
                    self.flips,
                    ieee802_3an::NUM_VARIABLE_NODES
                )
                .into())
            }
            None => vectors::zero_codeword_llrs(
                ieee802_3an::NUM_VARIABLE_NODES,
                self.flips,
                self.magnitude,
                &mut Rng::seed_from_u64(self.seed),
            ),
        })
    }

    fn write_report<W: Write>(
        &self,
        mut f: W,
        name: &str,
        report: &DecodeReport,
    ) -> std::io::Result<()> {
        let stats = &report.statistics;
        writeln!(f, "{name}:")?;
        writeln!(
            f,
            "  result: {}",
            if stats.decoding_successful {
                "converged"
            } else {
                "failed"
            }
        )?;
        writeln!(f, "  iterations performed: {}", stats.iterations_performed)?;
        writeln!(
            f,
            "  unsatisfied parity checks: {}",
            stats.unsatisfied_parity_checks
        )?;
        writeln!(
            f,
            "  modified systematic bits: {}",
            stats.modified_systematic_bits
        )?;
        if self.input.is_none() {
            let errors = report.codeword.iter().filter(|&&b| b != 0).count();
            writeln!(f, "  bit errors: {errors}")?;
        }
        if self.trace {
            writeln!(f, "  iteration | counter | flipped bits")?;
            for (iteration, flipped) in stats.flipped_bits.iter().enumerate() {
                writeln!(
                    f,
                    "  {:9} | {:7} | {:12}",
                    iteration,
                    stats.mean_iterations[iteration + 1],
                    flipped
                )?;
            }
        }
        Ok(())
    }
}

impl Run for Args {
    fn run(&self) -> Result<(), Box<dyn Error>> {
        let code = ieee802_3an::code()?;
        let config = self.config();
        let llrs = self.llrs()?;
        let mut decoder = self
            .implementation
            .build_decoder(code.clone(), config.clone())?;
        let start = Instant::now();
        let (report, reference) = if self.reference {
            let mut reference = DecoderImplementation::Float.build_decoder(code, config)?;
            let (report, reference) =
                rayon::join(|| decoder.decode(&llrs), || reference.decode(&llrs));
            (report?, Some(reference?))
        } else {
            (decoder.decode(&llrs)?, None)
        };
        let elapsed = start.elapsed();

        let stdout = std::io::stdout();
        let mut stdout = stdout.lock();
        self.write_report(&mut stdout, &self.implementation.to_string(), &report)?;
        if let Some(reference) = &reference {
            self.write_report(&mut stdout, "Float reference", reference)?;
            let differences = report
                .codeword
                .iter()
                .zip(&reference.codeword)
                .filter(|(a, b)| a != b)
                .count();
            writeln!(stdout, "hard decision differences: {differences}")?;
        }
        writeln!(
            stdout,
            "elapsed time: {}",
            humantime::format_duration(elapsed)
        )?;

        if let Some(path) = &self.output {
            File::create(path)?.write_all(&report.codeword)?;
        }
        Ok(())
    }
}

/// Parses whitespace-separated channel LLRs.
///
/// # Errors
/// Returns an error if a value is not a real number.
pub fn parse_llrs(s: &str) -> Result<Vec<f64>, std::num::ParseFloatError> {
    s.split_whitespace().map(str::parse).collect()
}
