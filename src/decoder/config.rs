//! Decoder configuration.
//!
//! The decoder is parameterized by a [`DecoderConfig`]. Configurations can
//! be built directly, or obtained from a [`ConfigurationProvider`], which
//! additionally signals when the configuration has been modified so that the
//! decoder reinitializes before the next run. [`ParameterList`] is a
//! provider backed by string key/value options.

use super::{quantization::Quantization, Error};
use crate::code::CodeStructure;
use clap::ValueEnum;
use enum_iterator::Sequence;
use std::collections::BTreeMap;

/// Message passing schedule.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Sequence, ValueEnum)]
#[clap(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulingMode {
    /// Layered schedule.
    ///
    /// Layers are processed sequentially and each layer updates the APP
    /// values before the next layer runs.
    Layered,
    /// Two-phase schedule.
    ///
    /// All the check nodes are updated from a snapshot of the APP values
    /// taken at the start of the iteration.
    TwoPhase,
}

impl std::str::FromStr for SchedulingMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<SchedulingMode, Error> {
        Ok(match s {
            "LAYERED" => SchedulingMode::Layered,
            "TWO_PHASE" => SchedulingMode::TwoPhase,
            _ => return Err(Error::UnsupportedScheduling(s.to_string())),
        })
    }
}

impl std::fmt::Display for SchedulingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                SchedulingMode::Layered => "LAYERED",
                SchedulingMode::TwoPhase => "TWO_PHASE",
            }
        )
    }
}

/// Check node update rule.
///
/// All the rules belong to the min-sum family: the sign of each outgoing
/// message is the product of the signs of the other incoming messages, and
/// its magnitude is derived from the smallest incoming magnitudes.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Sequence, ValueEnum)]
#[clap(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckNodeAlgorithm {
    /// Plain min-sum.
    MinSum,
    /// Normalized min-sum.
    ///
    /// The min-sum magnitude is multiplied by the scaling factor.
    NormalizedMinSum,
    /// Offset min-sum.
    ///
    /// The scaling factor is subtracted from the min-sum magnitude.
    OffsetMinSum,
    /// λ-min.
    ///
    /// The `num_lambda_min` smallest magnitudes are combined with the box-plus
    /// operation.
    LambdaMin,
}

impl std::str::FromStr for CheckNodeAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<CheckNodeAlgorithm, Error> {
        Ok(match s {
            "MIN_SUM" => CheckNodeAlgorithm::MinSum,
            "NORMALIZED_MIN_SUM" => CheckNodeAlgorithm::NormalizedMinSum,
            "OFFSET_MIN_SUM" => CheckNodeAlgorithm::OffsetMinSum,
            "LAMBDA_MIN" => CheckNodeAlgorithm::LambdaMin,
            _ => return Err(Error::UnsupportedAlgorithm(s.to_string())),
        })
    }
}

impl std::fmt::Display for CheckNodeAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                CheckNodeAlgorithm::MinSum => "MIN_SUM",
                CheckNodeAlgorithm::NormalizedMinSum => "NORMALIZED_MIN_SUM",
                CheckNodeAlgorithm::OffsetMinSum => "OFFSET_MIN_SUM",
                CheckNodeAlgorithm::LambdaMin => "LAMBDA_MIN",
            }
        )
    }
}

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderConfig {
    /// Message passing schedule.
    pub scheduling: SchedulingMode,
    /// Check node update rule.
    pub check_node_algorithm: CheckNodeAlgorithm,
    /// Number of smallest incoming magnitudes tracked per check node.
    pub num_lambda_min: usize,
    /// Normalization factor or offset of the check node rule.
    pub scaling_factor: f64,
    /// Fractional bits of the fixed-point channel values.
    pub fractional_bits: u32,
    /// Bit width of the channel values and check node messages.
    pub extrinsic_bit_width: u32,
    /// Bit width of the APP values.
    pub app_bit_width: u32,
    /// Maximum number of iterations.
    pub num_iterations: usize,
    /// Number of parallel lanes of the decoder memories.
    pub partition_count: usize,
    /// Early termination threshold.
    ///
    /// This is specific to the code variant. The IEEE 802.3an decoder does
    /// not use it.
    pub threshold: u32,
}

impl Default for DecoderConfig {
    fn default() -> DecoderConfig {
        DecoderConfig {
            scheduling: SchedulingMode::Layered,
            check_node_algorithm: CheckNodeAlgorithm::NormalizedMinSum,
            num_lambda_min: 2,
            scaling_factor: 0.75,
            fractional_bits: 2,
            extrinsic_bit_width: 6,
            app_bit_width: 8,
            num_iterations: 10,
            partition_count: 1,
            threshold: 0,
        }
    }
}

impl DecoderConfig {
    /// Returns the quantization model of the configuration.
    ///
    /// # Errors
    /// Returns an error if the bit widths are invalid.
    pub fn quantization(&self) -> Result<Quantization, Error> {
        Quantization::new(
            self.extrinsic_bit_width,
            self.app_bit_width,
            self.fractional_bits,
        )
    }

    /// Checks that the configuration can be used with a code.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] naming the first invalid option.
    pub fn validate(&self, code: &CodeStructure) -> Result<(), Error> {
        self.quantization()?;
        let invalid = |name, reason: String| Err(Error::InvalidParameter { name, reason });
        if self.num_iterations == 0 {
            return invalid("num_iterations", "at least one iteration is required".into());
        }
        if !(2..=code.max_check_degree()).contains(&self.num_lambda_min) {
            return invalid(
                "num_lambda_min",
                format!(
                    "{} is outside [2, {}]",
                    self.num_lambda_min,
                    code.max_check_degree()
                ),
            );
        }
        if !self.scaling_factor.is_finite() || !(0.0..=16.0).contains(&self.scaling_factor) {
            return invalid(
                "scaling_factor",
                format!("{} is outside [0, 16]", self.scaling_factor),
            );
        }
        if self.partition_count == 0 || code.block_size() % self.partition_count != 0 {
            return invalid(
                "partition_count",
                format!(
                    "{} does not divide the block size {}",
                    self.partition_count,
                    code.block_size()
                ),
            );
        }
        Ok(())
    }
}

/// Source of the decoder configuration.
///
/// The decoder reads the configuration again, and reinitializes its
/// memories, whenever the provider reports that it has been modified.
pub trait ConfigurationProvider {
    /// Returns the current configuration.
    ///
    /// # Errors
    /// Returns an error if an option value is not supported.
    fn configuration(&self) -> Result<DecoderConfig, Error>;

    /// Returns `true` if the configuration changed since it was last
    /// acknowledged.
    fn configuration_modified(&self) -> bool;

    /// Acknowledges the current configuration.
    fn acknowledge_configuration(&mut self);
}

/// Names of the options recognized by [`ParameterList`].
pub const OPTIONS: [&str; 10] = [
    "scheduling",
    "check_node_algorithm",
    "num_lambda_min",
    "scaling_factor",
    "fractional_bits",
    "extrinsic_bit_width",
    "app_bit_width",
    "num_iterations",
    "partition_count",
    "threshold",
];

/// Key/value configuration provider.
///
/// Options not set take their [`DecoderConfig::default`] values. A new
/// parameter list counts as modified, so that the first run applies it.
///
/// # Examples
/// ```
/// # use ldpc_8023an::decoder::config::{ConfigurationProvider, ParameterList, SchedulingMode};
/// let params: ParameterList = "scheduling=TWO_PHASE,num_iterations=20".parse().unwrap();
/// let config = params.configuration().unwrap();
/// assert_eq!(config.scheduling, SchedulingMode::TwoPhase);
/// assert_eq!(config.num_iterations, 20);
/// ```
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ParameterList {
    options: BTreeMap<String, String>,
    modified: bool,
}

impl Default for ParameterList {
    fn default() -> ParameterList {
        ParameterList::new()
    }
}

impl ParameterList {
    /// Creates an empty parameter list.
    pub fn new() -> ParameterList {
        ParameterList {
            options: BTreeMap::new(),
            modified: true,
        }
    }

    /// Sets an option.
    ///
    /// # Errors
    /// Returns [`Error::UnknownOption`] if the option is not recognized.
    /// Values are only parsed by
    /// [`configuration`](ConfigurationProvider::configuration).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        if !OPTIONS.contains(&key) {
            return Err(Error::UnknownOption(key.to_string()));
        }
        self.options.insert(key.to_string(), value.trim().to_string());
        self.modified = true;
        Ok(())
    }
}

fn parse_option<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, Error> {
    value.parse().map_err(|_| Error::InvalidParameter {
        name,
        reason: format!("cannot parse {value:?}"),
    })
}

impl ConfigurationProvider for ParameterList {
    fn configuration(&self) -> Result<DecoderConfig, Error> {
        let mut config = DecoderConfig::default();
        for (key, value) in &self.options {
            match key.as_str() {
                "scheduling" => config.scheduling = value.parse()?,
                "check_node_algorithm" => config.check_node_algorithm = value.parse()?,
                "num_lambda_min" => config.num_lambda_min = parse_option("num_lambda_min", value)?,
                "scaling_factor" => config.scaling_factor = parse_option("scaling_factor", value)?,
                "fractional_bits" => {
                    config.fractional_bits = parse_option("fractional_bits", value)?
                }
                "extrinsic_bit_width" => {
                    config.extrinsic_bit_width = parse_option("extrinsic_bit_width", value)?
                }
                "app_bit_width" => config.app_bit_width = parse_option("app_bit_width", value)?,
                "num_iterations" => config.num_iterations = parse_option("num_iterations", value)?,
                "partition_count" => {
                    config.partition_count = parse_option("partition_count", value)?
                }
                "threshold" => config.threshold = parse_option("threshold", value)?,
                _ => return Err(Error::UnknownOption(key.clone())),
            }
        }
        Ok(config)
    }

    fn configuration_modified(&self) -> bool {
        self.modified
    }

    fn acknowledge_configuration(&mut self) {
        self.modified = false;
    }
}

impl std::str::FromStr for ParameterList {
    type Err = Error;

    fn from_str(s: &str) -> Result<ParameterList, Error> {
        let mut params = ParameterList::new();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (key, value) = item
                .split_once('=')
                .ok_or_else(|| Error::InvalidParameter {
                    name: "options",
                    reason: format!("{item:?} is not of the form key=value"),
                })?;
            params.set(key.trim(), value)?;
        }
        Ok(params)
    }
}
