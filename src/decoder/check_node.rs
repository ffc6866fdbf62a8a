//! Check node processing unit.
//!
//! A [`CheckNodeUnit`] gathers the variable-to-check messages of one check
//! node, computes the check-to-variable messages with the selected
//! [`CheckNodeAlgorithm`], and holds the scratch buffers needed to do so,
//! so that no allocation happens while decoding.

use super::{arithmetic::DecoderArithmetic, config::CheckNodeAlgorithm};
use crate::code::CodeStructure;
use num_traits::Signed;

/// Smallest magnitudes seen by a check node.
///
/// The entries are kept sorted by magnitude together with the index of the
/// edge they came from. On ties the earliest edge wins.
#[derive(Debug, Clone, PartialEq)]
pub struct Minima<T> {
    capacity: usize,
    entries: Vec<(T, usize)>,
}

impl<T: Copy + PartialOrd> Minima<T> {
    /// Creates an empty tracker for the `capacity` smallest magnitudes.
    pub fn new(capacity: usize) -> Minima<T> {
        Minima {
            capacity,
            entries: Vec::with_capacity(capacity + 1),
        }
    }

    /// Removes all the entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Offers the magnitude of an edge.
    pub fn insert(&mut self, magnitude: T, edge: usize) {
        if self.entries.len() == self.capacity {
            match self.entries.last() {
                Some(&(largest, _)) if magnitude < largest => (),
                _ => return,
            }
        }
        let position = self
            .entries
            .iter()
            .position(|&(m, _)| magnitude < m)
            .unwrap_or(self.entries.len());
        self.entries.insert(position, (magnitude, edge));
        self.entries.truncate(self.capacity);
    }

    /// Returns the tracked (magnitude, edge) pairs in increasing order.
    pub fn entries(&self) -> &[(T, usize)] {
        &self.entries
    }

    /// Returns the smallest magnitude of the edges other than `edge`.
    pub fn min_excluding(&self, edge: usize) -> Option<T> {
        self.entries
            .iter()
            .find(|&&(_, e)| e != edge)
            .map(|&(m, _)| m)
    }
}

/// Check node processing unit.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckNodeUnit<T> {
    algorithm: CheckNodeAlgorithm,
    /// Variable nodes of the current check node, in message slot order.
    pub variables: Vec<usize>,
    /// Variable-to-check messages, in APP range.
    pub inputs: Vec<T>,
    /// Check-to-variable messages, in extrinsic range.
    pub outputs: Vec<T>,
    minima: Minima<T>,
}

impl<T: Copy + PartialOrd + Signed> CheckNodeUnit<T> {
    /// Creates a unit for check nodes of degree up to `max_check_degree`.
    ///
    /// `num_lambda_min` is only used by [`CheckNodeAlgorithm::LambdaMin`];
    /// the other rules need the two smallest magnitudes.
    pub fn new(
        algorithm: CheckNodeAlgorithm,
        num_lambda_min: usize,
        max_check_degree: usize,
    ) -> CheckNodeUnit<T> {
        let tracked = match algorithm {
            CheckNodeAlgorithm::LambdaMin => num_lambda_min,
            _ => 2,
        };
        CheckNodeUnit {
            algorithm,
            variables: Vec::with_capacity(max_check_degree),
            inputs: Vec::with_capacity(max_check_degree),
            outputs: Vec::with_capacity(max_check_degree),
            minima: Minima::new(tracked),
        }
    }

    /// Loads the variable nodes of a check node.
    pub fn load(&mut self, code: &CodeStructure, check: usize) {
        self.variables.clear();
        self.variables.extend(code.check_neighbors(check));
        self.inputs.clear();
    }

    /// Computes the check-to-variable messages from the inputs.
    ///
    /// The inputs are first saturated to the extrinsic range. The outputs
    /// are saturated to the extrinsic range too.
    pub fn update<A: DecoderArithmetic<Llr = T>>(&mut self, arithmetic: &A) {
        let zero = T::zero();
        let mut negative = false;
        self.minima.clear();
        for (edge, &x) in self.inputs.iter().enumerate() {
            let q = arithmetic.saturate_extrinsic(x);
            negative ^= q < zero;
            self.minima.insert(q.abs(), edge);
        }
        self.outputs.clear();
        for (edge, &x) in self.inputs.iter().enumerate() {
            let magnitude = match self.algorithm {
                CheckNodeAlgorithm::MinSum => self.min_excluding(edge),
                CheckNodeAlgorithm::NormalizedMinSum => {
                    arithmetic.normalize(self.min_excluding(edge))
                }
                CheckNodeAlgorithm::OffsetMinSum => arithmetic.offset(self.min_excluding(edge)),
                CheckNodeAlgorithm::LambdaMin => self
                    .minima
                    .entries()
                    .iter()
                    .filter(|&&(_, e)| e != edge)
                    .map(|&(m, _)| m)
                    .reduce(|a, b| arithmetic.boxplus(a, b))
                    .unwrap_or(zero),
            };
            // the sign of the edge itself is removed from the product
            let r = if negative ^ (x < zero) {
                -magnitude
            } else {
                magnitude
            };
            self.outputs.push(arithmetic.saturate_extrinsic(r));
        }
    }

    fn min_excluding(&self, edge: usize) -> T {
        self.minima.min_excluding(edge).unwrap_or_else(T::zero)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::decoder::{
        arithmetic::{FixedPoint, FloatingPoint},
        quantization::Quantization,
    };

    fn fixed() -> FixedPoint {
        FixedPoint::new(Quantization::new(6, 8, 2).unwrap(), 0.75)
    }

    fn run<A: DecoderArithmetic>(
        arithmetic: &A,
        algorithm: CheckNodeAlgorithm,
        lambda: usize,
        inputs: &[A::Llr],
    ) -> Vec<A::Llr> {
        let mut unit = CheckNodeUnit::new(algorithm, lambda, inputs.len());
        unit.inputs.extend_from_slice(inputs);
        unit.update(arithmetic);
        unit.outputs
    }

    #[test]
    fn minima() {
        let mut m = Minima::new(3);
        for (edge, x) in [7, 2, 9, 2, 1, 5].into_iter().enumerate() {
            m.insert(x, edge);
        }
        assert_eq!(m.entries(), &[(1, 4), (2, 1), (2, 3)]);
        assert_eq!(m.min_excluding(4), Some(2));
        assert_eq!(m.min_excluding(1), Some(1));
    }

    #[test]
    fn min_sum() {
        let out = run(&fixed(), CheckNodeAlgorithm::MinSum, 2, &[5, -3, 8, 12]);
        assert_eq!(out, [-3, 5, -3, -3]);
    }

    #[test]
    fn normalized_min_sum() {
        let out = run(
            &fixed(),
            CheckNodeAlgorithm::NormalizedMinSum,
            2,
            &[5, -3, 8, 12],
        );
        // 3 * 12 >> 4 = 2 and 5 * 12 >> 4 = 3
        assert_eq!(out, [-2, 3, -2, -2]);
    }

    #[test]
    fn offset_min_sum() {
        let out = run(&fixed(), CheckNodeAlgorithm::OffsetMinSum, 2, &[5, -3, 8, 12]);
        assert_eq!(out, [0, 2, 0, 0]);
    }

    #[test]
    fn lambda_min() {
        let a = fixed();
        let out = run(&a, CheckNodeAlgorithm::LambdaMin, 3, &[8, 8, 8, 30]);
        let b = a.boxplus(8, 8);
        assert_eq!(out, [b, b, b, a.boxplus(b, 8)]);
        // only the two smallest magnitudes are tracked
        let out = run(&a, CheckNodeAlgorithm::LambdaMin, 2, &[8, -8, 8]);
        assert_eq!(out, [-8, 8, -b]);
    }

    #[test]
    fn saturation() {
        // inputs in APP range are saturated before the minimum is taken
        let out = run(&fixed(), CheckNodeAlgorithm::MinSum, 2, &[100, -120, 90]);
        assert_eq!(out, [-31, 31, -31]);
    }

    #[test]
    fn floating_point() {
        let a = FloatingPoint::new(0.5);
        let out = run(&a, CheckNodeAlgorithm::NormalizedMinSum, 2, &[1.0, -4.0, 2.0]);
        assert_eq!(out, [-1.0, 0.5, -0.5]);
    }
}
