//! LDPC decoder factory.
//!
//! This module contains routines to build an LDPC decoder generically over the
//! arithmetic implementation. Such decoders are represented by `Box<dyn
//! LdpcDecoder>`, using the trait [`LdpcDecoder`], which exchanges real-valued
//! LLRs regardless of the arithmetic used internally.

use super::{
    arithmetic::{DecoderArithmetic, FixedPoint, FloatingPoint},
    config::DecoderConfig,
    statistics::RunStatistics,
    Decoder, Error,
};
use crate::code::CodeStructure;
use clap::ValueEnum;
use enum_iterator::Sequence;

/// Result of decoding a frame with an [`LdpcDecoder`].
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeReport {
    /// Hard decisions of the last executed iteration.
    pub codeword: Vec<u8>,
    /// APP values of the last executed iteration, converted to real LLRs.
    pub app: Vec<f64>,
    /// Run statistics.
    pub statistics: RunStatistics,
}

/// Generic LDPC decoder.
///
/// This trait is used to form LDPC decoder trait objects, abstracting over the
/// implementation of the decoder arithmetic.
pub trait LdpcDecoder: std::fmt::Debug + Send {
    /// Decodes a codeword.
    ///
    /// The parameter holds the real-valued channel LLRs of the received
    /// codeword, which are quantized by the decoder arithmetic. A positive
    /// LLR favours a zero bit.
    ///
    /// # Errors
    /// Returns an error if the number of LLRs does not match the code length.
    fn decode(&mut self, llrs: &[f64]) -> Result<DecodeReport, Error>;

    /// Changes the decoder configuration.
    ///
    /// # Errors
    /// Returns an error if the configuration is not valid for the code.
    fn reconfigure(&mut self, config: DecoderConfig) -> Result<(), Error>;

    /// Returns the decoder configuration.
    fn config(&self) -> &DecoderConfig;

    /// Returns the code descriptor.
    fn code(&self) -> &CodeStructure;
}

impl<A: DecoderArithmetic> LdpcDecoder for Decoder<A> {
    fn decode(&mut self, llrs: &[f64]) -> Result<DecodeReport, Error> {
        let channel = llrs
            .iter()
            .map(|&x| self.arithmetic().input_llr_quantize(x))
            .collect::<Vec<_>>();
        let output = Decoder::decode(self, &channel)?;
        Ok(DecodeReport {
            codeword: output.codeword(),
            app: output.app_llrs(),
            statistics: output.statistics.clone(),
        })
    }

    fn reconfigure(&mut self, config: DecoderConfig) -> Result<(), Error> {
        Decoder::reconfigure(self, config)
    }

    fn config(&self) -> &DecoderConfig {
        Decoder::config(self)
    }

    fn code(&self) -> &CodeStructure {
        Decoder::code(self)
    }
}

/// LDPC decoder implementation.
///
/// This enum lists the LDPC decoder implementations corresponding to different
/// arithmetic rules.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Sequence, ValueEnum)]
#[clap(rename_all = "verbatim")]
pub enum DecoderImplementation {
    /// The [`FixedPoint`] implementation, which reproduces the hardware.
    Fixed,
    /// The [`FloatingPoint`] implementation, an unquantized reference.
    Float,
}

impl DecoderImplementation {
    /// Builds an LDPC decoder.
    ///
    /// Given a code descriptor and a configuration, this function builds an
    /// LDPC decoder corresponding to this decoder implementation.
    ///
    /// # Errors
    /// Returns an error if the configuration is not valid for the code or the
    /// decoder memories cannot be allocated.
    pub fn build_decoder(
        &self,
        code: CodeStructure,
        config: DecoderConfig,
    ) -> Result<Box<dyn LdpcDecoder>, Error> {
        Ok(match self {
            DecoderImplementation::Fixed => Box::new(Decoder::<FixedPoint>::new(code, config)?),
            DecoderImplementation::Float => {
                Box::new(Decoder::<FloatingPoint>::new(code, config)?)
            }
        })
    }
}

impl std::str::FromStr for DecoderImplementation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Fixed" => DecoderImplementation::Fixed,
            "Float" => DecoderImplementation::Float,
            _ => return Err(format!("invalid decoder implementation {s:?}")),
        })
    }
}

impl std::fmt::Display for DecoderImplementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                DecoderImplementation::Fixed => "Fixed",
                DecoderImplementation::Float => "Float",
            }
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::codes::ieee802_3an;

    #[test]
    fn build_all_decoders() {
        let n = ieee802_3an::NUM_VARIABLE_NODES;
        for implementation in enum_iterator::all::<DecoderImplementation>() {
            let mut decoder = implementation
                .build_decoder(ieee802_3an::code().unwrap(), DecoderConfig::default())
                .unwrap();
            let report = decoder.decode(&vec![2.0; n]).unwrap();
            assert!(report.statistics.decoding_successful, "{implementation}");
            assert_eq!(report.codeword, vec![0; n]);
            assert!(report.app.iter().all(|&x| x > 2.0));
            assert!(decoder.decode(&[1.0; 10]).is_err());
        }
    }

    #[test]
    fn fixed_point_app_is_dequantized() {
        let mut decoder = DecoderImplementation::Fixed
            .build_decoder(ieee802_3an::code().unwrap(), DecoderConfig::default())
            .unwrap();
        let report = decoder.decode(&[100.0; ieee802_3an::NUM_VARIABLE_NODES]).unwrap();
        // 8-bit APP values with 2 fractional bits saturate at 127 / 4
        assert!(report.app.iter().all(|&x| x == 31.75));
    }

    #[test]
    fn from_str() {
        for implementation in enum_iterator::all::<DecoderImplementation>() {
            assert_eq!(
                implementation
                    .to_string()
                    .parse::<DecoderImplementation>()
                    .unwrap(),
                implementation
            );
        }
        assert!("Double".parse::<DecoderImplementation>().is_err());
    }
}
