//! # Reproducible test vectors
//!
//! This module uses the [`ChaCha8Rng`] RNG from the [rand_chacha] crate to
//! synthesize reproducible decoder inputs.
//!
//! # Examples
//! ```
//! # use ldpc_8023an::vectors::*;
//! let mut rng = Rng::seed_from_u64(42);
//! let llrs = zero_codeword_llrs(2048, 5, 1.5, &mut rng);
//! assert_eq!(llrs.iter().filter(|&&x| x < 0.0).count(), 5);
//! ```
use rand::seq::index;
use rand_chacha::ChaCha8Rng;
pub use rand_chacha::rand_core::SeedableRng;
pub use rand_core::RngCore;

/// The RNG used throughout this crate to synthesize inputs.
pub type Rng = ChaCha8Rng;

/// Channel LLRs for the all-zero codeword with some bits in error.
///
/// All the LLRs have magnitude `magnitude`. The LLRs of `flips` distinct
/// positions chosen at random are negative (bit one), and the rest are
/// positive. The all-zero word is a codeword of every linear code, so this
/// gives a correctable input without an encoder.
///
/// # Panics
/// Panics if `flips > len`.
pub fn zero_codeword_llrs<R: RngCore>(
    len: usize,
    flips: usize,
    magnitude: f64,
    rng: &mut R,
) -> Vec<f64> {
    let mut llrs = vec![magnitude; len];
    for j in index::sample(rng, len, flips) {
        llrs[j] = -magnitude;
    }
    llrs
}
