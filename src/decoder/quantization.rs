//! Fixed-point quantization model.
//!
//! The decoder hardware stores extrinsic (check node) messages and APP values
//! with different bit widths. All the values are two's complement, so a
//! `b`-bit value lies in `[-2^(b-1), 2^(b-1) - 1]`. Every arithmetic operation
//! saturates its result to this range, as the hardware datapath does.

use super::Error;

/// Smallest supported bit width.
pub const MIN_BIT_WIDTH: u32 = 2;
/// Largest supported bit width.
pub const MAX_BIT_WIDTH: u32 = 16;

/// Quantization parameters.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Quantization {
    extrinsic_bit_width: u32,
    app_bit_width: u32,
    fractional_bits: u32,
    max_extrinsic: i32,
    max_app: i32,
}

impl Quantization {
    /// Creates the quantization model for the given bit widths.
    ///
    /// # Errors
    /// The bit widths must lie in `[2, 16]`, the APP bit width cannot be
    /// smaller than the extrinsic bit width, and the number of fractional
    /// bits must be smaller than the extrinsic bit width.
    ///
    /// # Examples
    /// ```
    /// # use ldpc_8023an::decoder::quantization::Quantization;
    /// let q = Quantization::new(6, 8, 2).unwrap();
    /// assert_eq!(q.max_extrinsic(), 31);
    /// assert_eq!(q.max_app(), 127);
    /// assert_eq!(q.saturate_extrinsic(-40), -32);
    /// ```
    pub fn new(
        extrinsic_bit_width: u32,
        app_bit_width: u32,
        fractional_bits: u32,
    ) -> Result<Quantization, Error> {
        for (name, width) in [
            ("extrinsic_bit_width", extrinsic_bit_width),
            ("app_bit_width", app_bit_width),
        ] {
            if !(MIN_BIT_WIDTH..=MAX_BIT_WIDTH).contains(&width) {
                return Err(Error::InvalidParameter {
                    name,
                    reason: format!(
                        "{width} is outside [{MIN_BIT_WIDTH}, {MAX_BIT_WIDTH}]"
                    ),
                });
            }
        }
        if app_bit_width < extrinsic_bit_width {
            return Err(Error::InvalidParameter {
                name: "app_bit_width",
                reason: format!(
                    "{app_bit_width} is smaller than the extrinsic bit width {extrinsic_bit_width}"
                ),
            });
        }
        if fractional_bits >= extrinsic_bit_width {
            return Err(Error::InvalidParameter {
                name: "fractional_bits",
                reason: format!(
                    "{fractional_bits} leaves no integer bits in {extrinsic_bit_width}-bit values"
                ),
            });
        }
        Ok(Quantization {
            extrinsic_bit_width,
            app_bit_width,
            fractional_bits,
            max_extrinsic: max_value(extrinsic_bit_width),
            max_app: max_value(app_bit_width),
        })
    }

    /// Returns the extrinsic message bit width.
    pub fn extrinsic_bit_width(&self) -> u32 {
        self.extrinsic_bit_width
    }

    /// Returns the APP value bit width.
    pub fn app_bit_width(&self) -> u32 {
        self.app_bit_width
    }

    /// Returns the number of fractional bits of the fixed-point values.
    pub fn fractional_bits(&self) -> u32 {
        self.fractional_bits
    }

    /// Returns the largest extrinsic message value.
    pub fn max_extrinsic(&self) -> i32 {
        self.max_extrinsic
    }

    /// Returns the largest APP value.
    pub fn max_app(&self) -> i32 {
        self.max_app
    }

    /// Saturates a value to the extrinsic message range.
    pub fn saturate_extrinsic(&self, x: i32) -> i32 {
        x.clamp(-self.max_extrinsic - 1, self.max_extrinsic)
    }

    /// Saturates a value to the APP range.
    pub fn saturate_app(&self, x: i32) -> i32 {
        x.clamp(-self.max_app - 1, self.max_app)
    }

    /// Converts a real-valued LLR to fixed point.
    ///
    /// The LLR is scaled by `2^fractional_bits`, rounded, and saturated to the
    /// extrinsic range, which is the width of the channel values.
    pub fn quantize(&self, llr: f64) -> i32 {
        let x = (llr * f64::from(1u32 << self.fractional_bits)).round();
        let max = f64::from(self.max_extrinsic);
        if x >= max {
            self.max_extrinsic
        } else if x <= -max - 1.0 {
            -self.max_extrinsic - 1
        } else {
            x as i32
        }
    }

    /// Converts a fixed-point value back to a real-valued LLR.
    pub fn dequantize(&self, x: i32) -> f64 {
        f64::from(x) / f64::from(1u32 << self.fractional_bits)
    }
}

fn max_value(bit_width: u32) -> i32 {
    (1 << (bit_width - 1)) - 1
}
