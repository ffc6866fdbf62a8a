//! LDPC decoder arithmetic.
//!
//! This module contains the trait [`DecoderArithmetic`], which defines the
//! numeric operations used by the decoder, and its two implementors:
//! [`FixedPoint`], which reproduces the saturating datapath of the hardware,
//! and [`FloatingPoint`], an unquantized reference that never clamps. The
//! [`Decoder`](super::Decoder) is generic over `DecoderArithmetic`, so the
//! scheduling and control logic is shared by both.
//!
//! # References
//!
//! [1] J. Chen, et al. “Reduced-Complexity Decoding of LDPC Codes.” IEEE
//! Transactions on Communications, vol. 53, no. 8, August 2005.
//!
//! [2] F. Guilloud, E. Boutillon, J.-L. Danger. “λ-Min Decoding Algorithm of
//! Regular and Irregular LDPC Codes.” 3rd International Symposium on Turbo
//! Codes, September 2003.

use super::{config::DecoderConfig, quantization::Quantization, Error};
use num_traits::{Signed, Zero};

/// LDPC decoder arithmetic.
///
/// This trait models the arithmetic of the decoder datapath: the data type
/// used for channel values, APP values and messages, how values saturate,
/// and the magnitude operations needed by the min-sum family of check node
/// rules.
pub trait DecoderArithmetic: std::fmt::Debug + Clone + Send + Sync + Sized {
    /// LLR.
    ///
    /// Defines the type used to represent channel values, APP values and
    /// check node messages.
    type Llr: std::fmt::Debug + Copy + Default + PartialOrd + Signed + Send + Sync;

    /// Builds the arithmetic for a decoder configuration.
    ///
    /// # Errors
    /// Returns an error if the quantization parameters are invalid.
    fn from_config(config: &DecoderConfig) -> Result<Self, Error>;

    /// Quantization function for input LLRs.
    ///
    /// Defines how real-valued channel LLRs are represented as a
    /// [`Self::Llr`].
    fn input_llr_quantize(&self, llr: f64) -> Self::Llr;

    /// Converts an LLR back to a real value.
    fn llr_to_f64(&self, llr: Self::Llr) -> f64;

    /// Saturates a value to the extrinsic message range.
    fn saturate_extrinsic(&self, x: Self::Llr) -> Self::Llr;

    /// Saturates a value to the APP range.
    fn saturate_app(&self, x: Self::Llr) -> Self::Llr;

    /// Normalizes a check node message magnitude by the scaling factor.
    fn normalize(&self, magnitude: Self::Llr) -> Self::Llr;

    /// Subtracts the offset from a check node message magnitude.
    ///
    /// The result is never negative.
    fn offset(&self, magnitude: Self::Llr) -> Self::Llr;

    /// Box-plus combination of two magnitudes.
    ///
    /// This is the exact check node rule for two inputs:
    /// `min(a, b) - log(1 + exp(-|a - b|)) + log(1 + exp(-(a + b)))`.
    fn boxplus(&self, a: Self::Llr, b: Self::Llr) -> Self::Llr;

    /// Hard decision on an LLR.
    ///
    /// Returns `true` (bit one) if the LLR is negative. This is the sign bit
    /// of the hardware representation.
    fn hard_decision(&self, llr: Self::Llr) -> bool {
        llr < Self::Llr::zero()
    }

    /// Saturating addition in the APP range.
    fn saturating_add_app(&self, a: Self::Llr, b: Self::Llr) -> Self::Llr {
        self.saturate_app(a + b)
    }

    /// Saturating subtraction in the APP range.
    fn saturating_sub_app(&self, a: Self::Llr, b: Self::Llr) -> Self::Llr {
        self.saturate_app(a - b)
    }
}

/// Fractional bits of the fixed-point normalization factor.
const NORMALIZATION_BITS: u32 = 4;

/// Fixed-point arithmetic.
///
/// Values are represented as `i32` and saturated to the bit widths of the
/// [`Quantization`]. The normalization factor is applied as a 4-bit
/// fixed-point multiplier, and the `log(1 + exp(-x))` corrections of the
/// box-plus operation are read from a lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPoint {
    quantization: Quantization,
    normalization: i32,
    offset: i32,
    table: Box<[i32]>,
}

impl FixedPoint {
    /// Creates a fixed-point arithmetic object.
    ///
    /// The `scaling_factor` is used both as the normalization factor and,
    /// converted to fixed point, as the offset of the offset min-sum rule.
    pub fn new(quantization: Quantization, scaling_factor: f64) -> FixedPoint {
        let one = f64::from(1u32 << quantization.fractional_bits());
        let table = (0..)
            .map_while(|t| {
                let x = (one * (-(f64::from(t) / one)).exp().ln_1p()).round() as i32;
                if x > 0 {
                    Some(x)
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .into_boxed_slice();
        FixedPoint {
            quantization,
            normalization: (scaling_factor * f64::from(1u32 << NORMALIZATION_BITS)).round()
                as i32,
            offset: (scaling_factor * one).round() as i32,
            table,
        }
    }

    /// Returns the quantization parameters.
    pub fn quantization(&self) -> &Quantization {
        &self.quantization
    }

    fn lookup(&self, x: i32) -> i32 {
        usize::try_from(x)
            .ok()
            .and_then(|x| self.table.get(x).copied())
            .unwrap_or(0)
    }
}

impl DecoderArithmetic for FixedPoint {
    type Llr = i32;

    fn from_config(config: &DecoderConfig) -> Result<FixedPoint, Error> {
        Ok(FixedPoint::new(config.quantization()?, config.scaling_factor))
    }

    fn input_llr_quantize(&self, llr: f64) -> i32 {
        self.quantization.quantize(llr)
    }

    fn llr_to_f64(&self, llr: i32) -> f64 {
        self.quantization.dequantize(llr)
    }

    fn saturate_extrinsic(&self, x: i32) -> i32 {
        self.quantization.saturate_extrinsic(x)
    }

    fn saturate_app(&self, x: i32) -> i32 {
        self.quantization.saturate_app(x)
    }

    fn normalize(&self, magnitude: i32) -> i32 {
        (magnitude * self.normalization) >> NORMALIZATION_BITS
    }

    fn offset(&self, magnitude: i32) -> i32 {
        (magnitude - self.offset).max(0)
    }

    fn boxplus(&self, a: i32, b: i32) -> i32 {
        // The output is clamped to 0 from below because the lookup table is
        // rounded, so the approximation could come out negative.
        (a.min(b) - self.lookup((a - b).abs()) + self.lookup(a + b)).max(0)
    }
}

/// Floating-point reference arithmetic.
///
/// Values are represented as `f32` and are never clamped. This gives the
/// unquantized reference decode with the same schedule as the hardware.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatingPoint {
    scaling_factor: f32,
}

impl FloatingPoint {
    /// Creates a floating-point arithmetic object.
    pub fn new(scaling_factor: f64) -> FloatingPoint {
        FloatingPoint {
            scaling_factor: scaling_factor as f32,
        }
    }
}

impl DecoderArithmetic for FloatingPoint {
    type Llr = f32;

    fn from_config(config: &DecoderConfig) -> Result<FloatingPoint, Error> {
        // The bit widths are validated even though they are not used, so that
        // a configuration is accepted or rejected regardless of the
        // arithmetic.
        config.quantization()?;
        Ok(FloatingPoint::new(config.scaling_factor))
    }

    fn input_llr_quantize(&self, llr: f64) -> f32 {
        llr as f32
    }

    fn llr_to_f64(&self, llr: f32) -> f64 {
        f64::from(llr)
    }

    fn saturate_extrinsic(&self, x: f32) -> f32 {
        x
    }

    fn saturate_app(&self, x: f32) -> f32 {
        x
    }

    fn normalize(&self, magnitude: f32) -> f32 {
        magnitude * self.scaling_factor
    }

    fn offset(&self, magnitude: f32) -> f32 {
        (magnitude - self.scaling_factor).max(0.0)
    }

    fn boxplus(&self, a: f32, b: f32) -> f32 {
        (a.min(b) - (-(a - b).abs()).exp().ln_1p() + (-(a + b)).exp().ln_1p()).max(0.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fixed() -> FixedPoint {
        FixedPoint::new(Quantization::new(6, 8, 2).unwrap(), 0.75)
    }

    #[test]
    fn fixed_point_saturation() {
        let a = fixed();
        assert_eq!(a.saturating_add_app(100, 100), 127);
        assert_eq!(a.saturating_sub_app(-100, 100), -128);
        assert_eq!(a.saturate_extrinsic(-100), -32);
        assert!(a.hard_decision(-1));
        assert!(!a.hard_decision(0));
    }

    #[test]
    fn fixed_point_scaling() {
        let a = fixed();
        // 0.75 is 12 / 16
        assert_eq!(a.normalize(8), 6);
        assert_eq!(a.normalize(5), 3);
        // 0.75 is 3 in units of 1/4
        assert_eq!(a.offset(5), 2);
        assert_eq!(a.offset(2), 0);
    }

    #[test]
    fn fixed_point_boxplus() {
        let a = fixed();
        // log(1 + exp(-t / 4)) * 4 rounded
        assert_eq!(&a.table[..4], &[3, 2, 2, 2]);
        // equal inputs: min - 3 + lookup(2 a)
        assert_eq!(a.boxplus(8, 8), 5);
        // very different inputs are close to the minimum
        assert_eq!(a.boxplus(2, 30), 2);
        assert_eq!(a.boxplus(0, 0), 0);
    }

    #[test]
    fn floating_point_no_clamping() {
        let a = FloatingPoint::new(0.75);
        assert_eq!(a.saturating_add_app(1000.0, 1000.0), 2000.0);
        assert_eq!(a.normalize(4.0), 3.0);
        assert_eq!(a.offset(0.5), 0.0);
        let x = a.boxplus(10.0, 10.0);
        assert!((x - (10.0 - 2f32.ln())).abs() < 1e-4);
    }
}
