//! Hardware-compliant LDPC decoder.
//!
//! This module implements an iterative min-sum family decoder that reproduces
//! the behavior of a fixed-function decoder core bit by bit. The decoder is
//! generic over its [`arithmetic`], so the same control logic gives both the
//! fixed-point hardware model and an unquantized floating-point reference.
//!
//! Each run initializes the APP memory from the channel values and iterates
//! one of the two message passing schedules ([`SchedulingMode`]). The loop
//! is driven by a [`ConvergenceMonitor`]: when all the parity checks are
//! satisfied the decoder performs one more iteration before stopping, as the
//! hardware does. The hard decisions and APP values of every iteration are
//! kept, and the iterations that were not executed are filled with the
//! results of the last executed iteration, so the outputs always have
//! `num_iterations` entries.

use crate::code::{self, CodeStructure};
use log::{debug, error, trace};
use ndarray::ArrayView2;
use num_traits::Signed;
use thiserror::Error;

pub mod arithmetic;
pub mod check_node;
pub mod config;
pub mod convergence;
pub mod factory;
pub mod layered;
pub mod ports;
pub mod quantization;
pub mod state;
pub mod statistics;
pub mod two_phase;

use arithmetic::DecoderArithmetic;
use check_node::CheckNodeUnit;
use config::{ConfigurationProvider, DecoderConfig, SchedulingMode};
use convergence::ConvergenceMonitor;
use ports::{InputSource, OutputSink};
use state::StateStore;
use statistics::{IterationHistory, RunStatistics};

/// LDPC decoder error.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Error)]
pub enum Error {
    /// The selected scheduling is not supported.
    #[error("scheduling {0:?} not supported for these codes")]
    UnsupportedScheduling(String),
    /// The selected check node algorithm is not supported.
    #[error("check node algorithm {0:?} not supported")]
    UnsupportedAlgorithm(String),
    /// The configuration contains an option that is not recognized.
    #[error("unknown option {0:?}")]
    UnknownOption(String),
    /// An option has an invalid value.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Option name.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },
    /// A decoder memory could not be allocated.
    #[error("failed to allocate {what} ({rows} x {cols} elements)")]
    Allocation {
        /// Memory that could not be allocated.
        what: &'static str,
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// The channel input does not have one value per variable node.
    #[error("expected {expected} channel values, got {got}")]
    InputLength {
        /// Number of variable nodes.
        expected: usize,
        /// Number of channel values given.
        got: usize,
    },
    /// The code descriptor is invalid.
    #[error("invalid code structure: {0}")]
    Code(#[from] code::Error),
}

/// Decoder output.
///
/// The output borrows the decoder memories, so it must be consumed before the
/// next run starts.
#[derive(Debug)]
pub struct DecoderOutput<'a, A: DecoderArithmetic> {
    /// Arithmetic used by the decoder.
    pub arithmetic: &'a A,
    /// Hard decisions of each iteration.
    ///
    /// This has shape `num_iterations × num_variable_nodes`. A one means that
    /// the APP value was negative.
    pub hard_decisions: ArrayView2<'a, u8>,
    /// APP values of each iteration.
    ///
    /// This has shape `num_iterations × num_variable_nodes`.
    pub app: ArrayView2<'a, A::Llr>,
    /// Run statistics.
    pub statistics: &'a RunStatistics,
}

impl<A: DecoderArithmetic> DecoderOutput<'_, A> {
    /// Returns the hard decisions of the last executed iteration.
    pub fn codeword(&self) -> Vec<u8> {
        self.hard_decisions.row(self.last_row()).to_vec()
    }

    /// Returns the APP values of the last executed iteration as real values.
    pub fn app_llrs(&self) -> Vec<f64> {
        self.app
            .row(self.last_row())
            .iter()
            .map(|&x| self.arithmetic.llr_to_f64(x))
            .collect()
    }

    fn last_row(&self) -> usize {
        self.statistics.iterations_performed - 1
    }
}

/// Per-run decoder memories.
#[derive(Debug, Clone)]
struct RunContext<T> {
    channel: Vec<T>,
    store: StateStore<T>,
    unit: CheckNodeUnit<T>,
    history: IterationHistory<T>,
    statistics: RunStatistics,
}

impl<T: Copy + Default + PartialOrd + Signed> RunContext<T> {
    fn new(code: &CodeStructure, config: &DecoderConfig) -> Result<RunContext<T>, Error> {
        Ok(RunContext {
            channel: state::try_vec(code.num_variable_nodes(), T::default(), "channel buffer")?,
            store: StateStore::new(code, config)?,
            unit: CheckNodeUnit::new(
                config.check_node_algorithm,
                config.num_lambda_min,
                code.max_check_degree(),
            ),
            history: IterationHistory::new(config.num_iterations, code.num_variable_nodes())?,
            statistics: RunStatistics::new(config.num_iterations)?,
        })
    }
}

/// LDPC decoder.
///
/// The decoder owns the code descriptor, its configuration and all the
/// memories used by a run. Independent decoders can run in parallel.
///
/// # Examples
/// ```
/// # use ldpc_8023an::codes::ieee802_3an;
/// # use ldpc_8023an::decoder::{Decoder, arithmetic::FixedPoint, config::DecoderConfig};
/// let code = ieee802_3an::code().unwrap();
/// let mut decoder = Decoder::<FixedPoint>::new(code, DecoderConfig::default()).unwrap();
/// // noiseless all-zero codeword
/// let output = decoder.decode(&[4; 2048]).unwrap();
/// assert!(output.statistics.decoding_successful);
/// assert_eq!(output.statistics.iterations_performed, 2);
/// ```
#[derive(Debug, Clone)]
pub struct Decoder<A: DecoderArithmetic> {
    name: String,
    code: CodeStructure,
    config: DecoderConfig,
    arithmetic: A,
    context: RunContext<A::Llr>,
}

impl<A: DecoderArithmetic> Decoder<A> {
    /// Creates a new decoder.
    ///
    /// # Errors
    /// Returns an error if the configuration is not valid for the code or if
    /// the decoder memories cannot be allocated.
    pub fn new(code: CodeStructure, config: DecoderConfig) -> Result<Decoder<A>, Error> {
        config.validate(&code)?;
        let arithmetic = A::from_config(&config)?;
        let context = RunContext::new(&code, &config)?;
        let decoder = Decoder {
            name: String::from("ldpc_dec"),
            code,
            config,
            arithmetic,
            context,
        };
        decoder.log_configuration();
        Ok(decoder)
    }

    /// Creates a new decoder using the configuration of a provider.
    ///
    /// The configuration is acknowledged.
    ///
    /// # Errors
    /// Returns an error if the provider configuration is not supported or if
    /// [`Decoder::new`] fails.
    pub fn from_provider<P: ConfigurationProvider + ?Sized>(
        code: CodeStructure,
        provider: &mut P,
    ) -> Result<Decoder<A>, Error> {
        let decoder = Decoder::new(code, provider.configuration()?)?;
        provider.acknowledge_configuration();
        Ok(decoder)
    }

    /// Sets the instance name used in log messages.
    pub fn with_name(mut self, name: &str) -> Decoder<A> {
        self.name = name.to_string();
        self
    }

    /// Returns the instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the code descriptor.
    pub fn code(&self) -> &CodeStructure {
        &self.code
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Returns the decoder arithmetic.
    pub fn arithmetic(&self) -> &A {
        &self.arithmetic
    }

    /// Changes the configuration.
    ///
    /// All the decoder memories are reallocated. If the new configuration is
    /// rejected the decoder keeps the previous one.
    ///
    /// # Errors
    /// Returns an error if the configuration is not valid for the code or if
    /// the decoder memories cannot be allocated.
    pub fn reconfigure(&mut self, config: DecoderConfig) -> Result<(), Error> {
        let result = config.validate(&self.code).and_then(|()| {
            Ok((
                A::from_config(&config)?,
                RunContext::new(&self.code, &config)?,
            ))
        });
        match result {
            Ok((arithmetic, context)) => {
                self.config = config;
                self.arithmetic = arithmetic;
                self.context = context;
                self.log_configuration();
                Ok(())
            }
            Err(e) => {
                error!("{}: configuration rejected: {}", self.name, e);
                Err(e)
            }
        }
    }

    /// Reconfigures the decoder if the provider configuration was modified.
    ///
    /// # Errors
    /// Returns an error if the provider configuration is not supported or
    /// cannot be applied. The configuration is only acknowledged once it has
    /// been applied.
    pub fn apply_configuration<P: ConfigurationProvider + ?Sized>(
        &mut self,
        provider: &mut P,
    ) -> Result<(), Error> {
        if !provider.configuration_modified() {
            return Ok(());
        }
        let config = provider.configuration().map_err(|e| {
            error!("{}: {}", self.name, e);
            e
        })?;
        self.reconfigure(config)?;
        provider.acknowledge_configuration();
        Ok(())
    }

    /// Decodes a frame.
    ///
    /// The channel values must contain one value per variable node. Fixed
    /// point values are saturated to the extrinsic bit width when they are
    /// loaded into the APP memory.
    ///
    /// # Errors
    /// Returns [`Error::InputLength`] if the number of channel values is
    /// wrong.
    pub fn decode(&mut self, channel: &[A::Llr]) -> Result<DecoderOutput<'_, A>, Error> {
        if channel.len() != self.code.num_variable_nodes() {
            return Err(Error::InputLength {
                expected: self.code.num_variable_nodes(),
                got: channel.len(),
            });
        }
        self.context.channel.copy_from_slice(channel);
        Ok(self.decode_loaded())
    }

    /// Runs the decoder with its external collaborators.
    ///
    /// The decoder is reconfigured first if the provider reports a modified
    /// configuration. The channel values are read from `input`, and the
    /// results of all the iterations and the run statistics are written to
    /// `output`. Nothing is written if an error occurs.
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be applied or the input
    /// cannot be read.
    pub fn run<P, I, O>(&mut self, provider: &mut P, input: &mut I, output: &mut O) -> Result<(), Error>
    where
        P: ConfigurationProvider + ?Sized,
        I: InputSource<A::Llr> + ?Sized,
        O: OutputSink<A::Llr> + ?Sized,
    {
        self.apply_configuration(provider)?;
        input.read_channel(&mut self.context.channel)?;
        let result = self.decode_loaded();
        for (iteration, (bits, app)) in result
            .hard_decisions
            .outer_iter()
            .zip(result.app.outer_iter())
            .enumerate()
        {
            output.write_iteration(iteration, bits, app);
        }
        output.write_statistics(result.statistics);
        Ok(())
    }

    fn decode_loaded(&mut self) -> DecoderOutput<'_, A> {
        let Decoder {
            name,
            code,
            config,
            arithmetic,
            context,
        } = self;
        let RunContext {
            channel,
            store,
            unit,
            history,
            statistics,
        } = context;
        let (name, code, config, arithmetic) = (&*name, &*code, &*config, &*arithmetic);

        store.load_channel(code, arithmetic, channel);
        statistics.reset();
        let mut monitor = ConvergenceMonitor::new(config.num_iterations);
        let mut satisfied;
        loop {
            let iteration = monitor.iterations();
            satisfied = match config.scheduling {
                SchedulingMode::Layered => {
                    layered::decode_layered(arithmetic, code, store, unit, iteration)
                }
                SchedulingMode::TwoPhase => {
                    two_phase::decode_two_phase(arithmetic, code, store, unit, iteration)
                }
            };
            history.record(iteration, code, arithmetic, &store.app);
            if iteration != 0 {
                statistics.flipped_bits[iteration] = history.flipped_bits(iteration);
            }
            let state = monitor.iteration_completed(satisfied == code.num_check_nodes());
            statistics.mean_iterations[monitor.iterations()] = monitor.iterations();
            trace!(
                "{}: iteration {} satisfied {}/{} parity checks ({:?})",
                name,
                iteration,
                satisfied,
                code.num_check_nodes(),
                state
            );
            if monitor.is_done() {
                break;
            }
        }

        let iterations = monitor.iterations();
        statistics.decoding_successful = monitor.successful();
        statistics.iterations_performed = iterations;
        statistics.unsatisfied_parity_checks = code.num_check_nodes() - satisfied;
        statistics.modified_systematic_bits =
            statistics::modified_systematic_bits(code, arithmetic, channel, history, iterations);
        statistics::materialize(history, statistics, iterations);
        debug!(
            "{}: {} after {} iterations, {} unsatisfied parity checks, {} modified systematic bits",
            name,
            if statistics.decoding_successful {
                "converged"
            } else {
                "failed"
            },
            iterations,
            statistics.unsatisfied_parity_checks,
            statistics.modified_systematic_bits
        );

        DecoderOutput {
            arithmetic,
            hard_decisions: history.hard_decisions(),
            app: history.app(),
            statistics,
        }
    }

    fn log_configuration(&self) {
        debug!(
            "{}: {} scheduling, {} check nodes (lambda = {}, scaling = {}), \
             {}/{}-bit messages/APP with {} fractional bits, {} iterations, \
             {} partitions, threshold {}",
            self.name,
            self.config.scheduling,
            self.config.check_node_algorithm,
            self.config.num_lambda_min,
            self.config.scaling_factor,
            self.config.extrinsic_bit_width,
            self.config.app_bit_width,
            self.config.fractional_bits,
            self.config.num_iterations,
            self.config.partition_count,
            self.config.threshold
        );
    }
}

#[cfg(test)]
mod test {
    use super::arithmetic::{FixedPoint, FloatingPoint};
    use super::config::{CheckNodeAlgorithm, ParameterList};
    use super::ports::CollectingSink;
    use super::*;
    use crate::code::CodeStructureBuilder;
    use crate::codes::ieee802_3an;
    use crate::vectors::{self, Rng};
    use rand::{Rng as _, SeedableRng};

    const N: usize = ieee802_3an::NUM_VARIABLE_NODES;

    fn decoder<A: DecoderArithmetic>(config: DecoderConfig) -> Decoder<A> {
        Decoder::new(ieee802_3an::code().unwrap(), config).unwrap()
    }

    fn config(scheduling: SchedulingMode) -> DecoderConfig {
        DecoderConfig {
            scheduling,
            ..Default::default()
        }
    }

    fn noisy_channel() -> Vec<i32> {
        let mut llrs = vec![4; N];
        for j in [3, 700, 1500] {
            llrs[j] = -4;
        }
        llrs
    }

    #[test]
    fn noiseless_codeword() {
        for scheduling in enum_iterator::all::<SchedulingMode>() {
            let mut decoder = decoder::<FixedPoint>(config(scheduling));
            let output = decoder.decode(&[5; N]).unwrap();
            let stats = output.statistics;
            assert!(stats.decoding_successful, "{scheduling}");
            assert_eq!(stats.iterations_performed, 2, "{scheduling}");
            assert_eq!(stats.unsatisfied_parity_checks, 0);
            assert_eq!(stats.modified_systematic_bits, 0);
            assert_eq!(stats.mean_iterations, [0, 1, 2, 2, 2, 2, 2, 2, 2, 2, 2]);
            assert_eq!(stats.flipped_bits, [0; 10]);
            assert!(output.codeword().iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn noiseless_codeword_floating_point() {
        for scheduling in enum_iterator::all::<SchedulingMode>() {
            let mut decoder = decoder::<FloatingPoint>(config(scheduling));
            let output = decoder.decode(&[1.25; N]).unwrap();
            assert!(output.statistics.decoding_successful);
            assert_eq!(output.statistics.iterations_performed, 2);
        }
    }

    #[test]
    fn corrects_errors() {
        for scheduling in enum_iterator::all::<SchedulingMode>() {
            for algorithm in enum_iterator::all::<CheckNodeAlgorithm>() {
                let mut decoder = decoder::<FixedPoint>(DecoderConfig {
                    scheduling,
                    check_node_algorithm: algorithm,
                    num_iterations: 20,
                    ..Default::default()
                });
                let output = decoder.decode(&noisy_channel()).unwrap();
                let stats = output.statistics;
                assert!(stats.decoding_successful, "{scheduling} {algorithm}");
                assert_eq!(stats.unsatisfied_parity_checks, 0);
                assert!(output.codeword().iter().all(|&b| b == 0));
                // all the flipped bits are systematic
                assert_eq!(stats.modified_systematic_bits, 3);
                assert_eq!(stats.flipped_bits[0], 0);
            }
        }
    }

    #[test]
    fn convergence_delay() {
        let mut decoder = decoder::<FixedPoint>(DecoderConfig {
            num_iterations: 20,
            ..Default::default()
        });
        let output = decoder.decode(&noisy_channel()).unwrap();
        let k = output.statistics.iterations_performed;
        // the first iteration with all the parity checks satisfied is k - 1
        let code = ieee802_3an::code().unwrap();
        let first = (0..k)
            .find(|&i| {
                let row = output.hard_decisions.row(i);
                code.satisfied_checks(|v| row[v] == 1) == code.num_check_nodes()
            })
            .unwrap();
        assert_eq!(first + 2, k);
    }

    #[test]
    fn replication_and_flipped_bits() {
        let mut decoder = decoder::<FixedPoint>(DecoderConfig {
            num_iterations: 15,
            ..Default::default()
        });
        let output = decoder.decode(&noisy_channel()).unwrap();
        let stats = output.statistics;
        let k = stats.iterations_performed;
        assert!(k < 15);
        for j in k..15 {
            assert_eq!(output.hard_decisions.row(j), output.hard_decisions.row(k - 1));
            assert_eq!(output.app.row(j), output.app.row(k - 1));
            assert_eq!(stats.mean_iterations[j + 1], k);
        }
        for i in 1..15 {
            let distance = output
                .hard_decisions
                .row(i)
                .iter()
                .zip(output.hard_decisions.row(i - 1).iter())
                .filter(|(a, b)| a != b)
                .count();
            assert_eq!(stats.flipped_bits[i], distance);
        }
    }

    #[test]
    fn iteration_cap() {
        let mut rng = Rng::seed_from_u64(42);
        let llrs = (0..N)
            .map(|_| if rng.gen::<bool>() { 3 } else { -3 })
            .collect::<Vec<i32>>();
        for scheduling in enum_iterator::all::<SchedulingMode>() {
            let mut decoder = decoder::<FixedPoint>(DecoderConfig {
                scheduling,
                num_iterations: 5,
                ..Default::default()
            });
            let output = decoder.decode(&llrs).unwrap();
            assert!(!output.statistics.decoding_successful);
            assert_eq!(output.statistics.iterations_performed, 5);
            assert!(output.statistics.unsatisfied_parity_checks > 0);
            assert_eq!(output.statistics.mean_iterations, [0, 1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn deterministic() {
        let mut rng = Rng::seed_from_u64(7);
        let llrs = vectors::zero_codeword_llrs(N, 40, 1.0, &mut rng);
        for scheduling in enum_iterator::all::<SchedulingMode>() {
            let mut decoder = decoder::<FixedPoint>(config(scheduling));
            let channel = llrs
                .iter()
                .map(|&x| decoder.arithmetic().input_llr_quantize(x))
                .collect::<Vec<_>>();
            let first = {
                let output = decoder.decode(&channel).unwrap();
                (
                    output.hard_decisions.to_owned(),
                    output.app.to_owned(),
                    output.statistics.clone(),
                )
            };
            let output = decoder.decode(&channel).unwrap();
            assert_eq!(output.hard_decisions, first.0);
            assert_eq!(output.app, first.1);
            assert_eq!(output.statistics, &first.2);
        }
    }

    #[test]
    fn partitions_do_not_change_results() {
        let mut rng = Rng::seed_from_u64(3);
        let llrs = vectors::zero_codeword_llrs(N, 60, 1.0, &mut rng);
        for scheduling in enum_iterator::all::<SchedulingMode>() {
            let mut reference = decoder::<FixedPoint>(config(scheduling));
            let channel = llrs
                .iter()
                .map(|&x| reference.arithmetic().input_llr_quantize(x))
                .collect::<Vec<_>>();
            let expected = reference.decode(&channel).unwrap().app.to_owned();
            for partition_count in [2, 8, 64] {
                let mut decoder = decoder::<FixedPoint>(DecoderConfig {
                    scheduling,
                    partition_count,
                    ..Default::default()
                });
                assert_eq!(decoder.decode(&channel).unwrap().app, expected);
            }
        }
    }

    #[test]
    fn stored_values_are_saturated() {
        let config = DecoderConfig {
            extrinsic_bit_width: 5,
            app_bit_width: 7,
            num_iterations: 6,
            ..Default::default()
        };
        let mut decoder = decoder::<FixedPoint>(config);
        // out of range channel values are saturated to the extrinsic range
        let output = decoder.decode(&[1000; N]).unwrap();
        assert!(output.app.iter().all(|&x| (-64..=63).contains(&x)));
        assert!(output.app.row(0).iter().all(|&x| x > 15));
    }

    #[test]
    fn input_length() {
        let mut decoder = decoder::<FixedPoint>(DecoderConfig::default());
        assert_eq!(
            decoder.decode(&[1; 100]).unwrap_err(),
            Error::InputLength {
                expected: N,
                got: 100
            }
        );
    }

    #[test]
    fn allocation_failure() {
        let result = Decoder::<FixedPoint>::new(
            ieee802_3an::code().unwrap(),
            DecoderConfig {
                num_iterations: usize::MAX / 2,
                ..Default::default()
            },
        );
        assert!(matches!(result, Err(Error::Allocation { .. })));
    }

    #[test]
    fn run_with_collaborators() {
        let mut params: ParameterList = "num_iterations=4".parse().unwrap();
        let mut decoder = decoder::<FixedPoint>(DecoderConfig::default());
        let mut sink = CollectingSink::default();
        decoder.run(&mut params, &mut vec![6; N], &mut sink).unwrap();
        assert!(!params.configuration_modified());
        assert_eq!(decoder.config().num_iterations, 4);
        assert_eq!(sink.hard_decisions.len(), 4);
        assert_eq!(sink.app.len(), 4);
        let stats = sink.statistics.unwrap();
        assert!(stats.decoding_successful);
        assert_eq!(stats.iterations_performed, 2);
    }

    #[test]
    fn unsupported_scheduling_produces_no_output() {
        let mut params: ParameterList = "scheduling=FLOODING".parse().unwrap();
        let mut decoder = decoder::<FixedPoint>(DecoderConfig::default());
        let mut sink = CollectingSink::<i32>::default();
        let result = decoder.run(&mut params, &mut vec![6; N], &mut sink);
        assert_eq!(
            result,
            Err(Error::UnsupportedScheduling(String::from("FLOODING")))
        );
        assert!(params.configuration_modified());
        assert!(sink.hard_decisions.is_empty());
        assert!(sink.statistics.is_none());

        let result =
            Decoder::<FixedPoint>::from_provider(ieee802_3an::code().unwrap(), &mut params);
        assert!(matches!(result, Err(Error::UnsupportedScheduling(_))));
    }

    #[test]
    fn reconfigure_keeps_previous_configuration_on_error() {
        let mut decoder = decoder::<FixedPoint>(DecoderConfig::default());
        let result = decoder.reconfigure(DecoderConfig {
            partition_count: 5,
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(decoder.config(), &DecoderConfig::default());
        assert!(decoder.decode(&[3; N]).unwrap().statistics.decoding_successful);
    }

    // 12 variable nodes in blocks of 4, with 4 systematic bits and the parity
    // part column-twisted: position j is stored at APP address
    // [0, 1, 2, 3, 4, 8, 5, 9, 6, 10, 7, 11][j].
    fn ira_code() -> CodeStructure {
        CodeStructureBuilder {
            num_variable_nodes: 12,
            num_check_nodes: 8,
            max_check_degree: 3,
            block_size: 4,
            num_systematic_bits: 4,
            is_irregular_repeat_accumulate: true,
            layer_degrees: &[3, 3],
            base_addresses: &[0, 1, 2, 0, 1, 2],
            cyclic_shifts: &[0, 0, 0, 0, 1, 2],
        }
        .build()
        .unwrap()
    }

    #[test]
    fn ira_outputs_in_codeword_order() {
        // APP addresses 0..8 set to one satisfy all the checks
        let codeword: [u8; 12] = [1, 1, 1, 1, 1, 0, 1, 0, 1, 0, 1, 0];
        let llrs = |flipped: Option<usize>| {
            codeword
                .iter()
                .enumerate()
                .map(|(j, &b)| {
                    let llr: i32 = if b == 1 { -8 } else { 8 };
                    if Some(j) == flipped {
                        -llr.signum()
                    } else {
                        llr
                    }
                })
                .collect::<Vec<i32>>()
        };
        for scheduling in enum_iterator::all::<SchedulingMode>() {
            let mut decoder = Decoder::<FixedPoint>::new(ira_code(), config(scheduling)).unwrap();

            let output = decoder.decode(&llrs(None)).unwrap();
            assert!(output.statistics.decoding_successful, "{scheduling}");
            assert_eq!(output.statistics.iterations_performed, 2);
            assert_eq!(output.codeword(), codeword);
            assert_eq!(output.hard_decisions.row(0).to_vec(), codeword);
            assert!(output
                .app
                .row(0)
                .iter()
                .zip(&codeword)
                .all(|(&x, &b)| (x < 0) == (b == 1)));

            // a weak error in parity position 5 is corrected, but it does
            // not count as a modified systematic bit
            let output = decoder.decode(&llrs(Some(5))).unwrap();
            assert!(output.statistics.decoding_successful, "{scheduling}");
            assert_eq!(output.codeword(), codeword);
            assert_eq!(output.statistics.modified_systematic_bits, 0);

            let output = decoder.decode(&llrs(Some(2))).unwrap();
            assert!(output.statistics.decoding_successful, "{scheduling}");
            assert_eq!(output.codeword(), codeword);
            assert_eq!(output.statistics.modified_systematic_bits, 1);
        }
    }
}
