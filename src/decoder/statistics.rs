//! Decoder statistics and per-iteration outputs.
//!
//! The decoder records the hard decisions and APP values at the end of each
//! iteration in an [`IterationHistory`]. When the loop stops early, the
//! remaining iterations are filled with the last executed one by
//! [`materialize`], so that the outputs have a fixed shape.

use super::{arithmetic::DecoderArithmetic, state, state::LaneStore, Error};
use crate::code::CodeStructure;
use ndarray::{Array2, ArrayView2, Axis};

/// Statistics of a decoder run.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default)]
pub struct RunStatistics {
    /// All the parity checks were satisfied at some iteration.
    pub decoding_successful: bool,
    /// Number of iterations executed, including the extra iteration
    /// performed after convergence.
    pub iterations_performed: usize,
    /// Number of unsatisfied parity checks in the last iteration.
    pub unsatisfied_parity_checks: usize,
    /// Number of systematic bits whose decoded value differs from the hard
    /// decision of the channel value.
    pub modified_systematic_bits: usize,
    /// Iteration counter.
    ///
    /// This has `num_iterations + 1` entries. Entry `i` holds the number of
    /// iterations executed when iteration `i` would have finished. It stays
    /// at `iterations_performed` for the iterations that were not executed.
    pub mean_iterations: Vec<usize>,
    /// Number of hard decisions that changed with respect to the previous
    /// iteration.
    ///
    /// This has `num_iterations` entries. The first one is always zero.
    pub flipped_bits: Vec<usize>,
}

impl RunStatistics {
    /// Allocates the statistics for a loop of `num_iterations` iterations.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the memory cannot be allocated.
    pub fn new(num_iterations: usize) -> Result<RunStatistics, Error> {
        let len = num_iterations.checked_add(1).ok_or(Error::Allocation {
            what: "iteration counters",
            rows: 1,
            cols: num_iterations,
        })?;
        Ok(RunStatistics {
            mean_iterations: state::try_vec(len, 0, "iteration counters")?,
            flipped_bits: state::try_vec(num_iterations, 0, "flipped bit counters")?,
            ..Default::default()
        })
    }

    /// Clears the statistics for a new run.
    pub fn reset(&mut self) {
        self.decoding_successful = false;
        self.iterations_performed = 0;
        self.unsatisfied_parity_checks = 0;
        self.modified_systematic_bits = 0;
        self.mean_iterations.fill(0);
        self.flipped_bits.fill(0);
    }
}

/// Hard decisions and APP values of each iteration.
///
/// Both arrays have one row per iteration and one column per codeword
/// position.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationHistory<T> {
    hard_decisions: Array2<u8>,
    app: Array2<T>,
}

impl<T: Copy + Default> IterationHistory<T> {
    /// Allocates the history of a loop of `num_iterations` iterations.
    ///
    /// # Errors
    /// Returns [`Error::Allocation`] if the memory cannot be allocated.
    pub fn new(
        num_iterations: usize,
        num_variable_nodes: usize,
    ) -> Result<IterationHistory<T>, Error> {
        Ok(IterationHistory {
            hard_decisions: state::try_array2(
                num_iterations,
                num_variable_nodes,
                0,
                "hard decision history",
            )?,
            app: state::try_array2(
                num_iterations,
                num_variable_nodes,
                T::default(),
                "APP history",
            )?,
        })
    }

    /// Reads the APP memory at the end of an iteration.
    ///
    /// The values are stored in codeword order, undoing the column twist of
    /// the parity part of IRA codes.
    pub fn record<A>(
        &mut self,
        iteration: usize,
        code: &CodeStructure,
        arithmetic: &A,
        app: &LaneStore<T>,
    ) where
        A: DecoderArithmetic<Llr = T>,
    {
        let mut bits = self.hard_decisions.row_mut(iteration);
        let mut values = self.app.row_mut(iteration);
        for (position, (bit, value)) in bits.iter_mut().zip(values.iter_mut()).enumerate() {
            let x = app.get(code.app_address(position));
            *value = x;
            *bit = u8::from(arithmetic.hard_decision(x));
        }
    }

    /// Returns the number of hard decisions of an iteration that differ from
    /// the previous iteration.
    pub fn flipped_bits(&self, iteration: usize) -> usize {
        self.hard_decisions
            .row(iteration)
            .iter()
            .zip(self.hard_decisions.row(iteration - 1).iter())
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Returns the hard decisions of all the iterations.
    pub fn hard_decisions(&self) -> ArrayView2<'_, u8> {
        self.hard_decisions.view()
    }

    /// Returns the APP values of all the iterations.
    pub fn app(&self) -> ArrayView2<'_, T> {
        self.app.view()
    }
}

/// Counts the systematic bits modified by the decoder.
///
/// The hard decisions of iteration `iterations - 1` are compared with the
/// hard decisions of the channel values.
pub fn modified_systematic_bits<A: DecoderArithmetic>(
    code: &CodeStructure,
    arithmetic: &A,
    channel: &[A::Llr],
    history: &IterationHistory<A::Llr>,
    iterations: usize,
) -> usize {
    history
        .hard_decisions
        .row(iterations - 1)
        .iter()
        .zip(channel)
        .take(code.num_systematic_bits())
        .filter(|&(&bit, &llr)| (bit != 0) != arithmetic.hard_decision(llr))
        .count()
}

/// Fills the iterations that were not executed.
///
/// Rows `iterations..` of the history are copied from row `iterations - 1`,
/// and the iteration counter stays at `iterations`.
pub fn materialize<T: Copy>(
    history: &mut IterationHistory<T>,
    statistics: &mut RunStatistics,
    iterations: usize,
) {
    let (executed, mut remaining) = history
        .hard_decisions
        .view_mut()
        .split_at(Axis(0), iterations);
    let last = executed.row(iterations - 1);
    for mut row in remaining.outer_iter_mut() {
        row.assign(&last);
    }
    let (executed, mut remaining) = history.app.view_mut().split_at(Axis(0), iterations);
    let last = executed.row(iterations - 1);
    for mut row in remaining.outer_iter_mut() {
        row.assign(&last);
    }
    for counter in statistics.mean_iterations[iterations + 1..].iter_mut() {
        *counter = iterations;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn flipped_bits() {
        let mut history = IterationHistory::<i32>::new(3, 4).unwrap();
        history.hard_decisions = array![[0, 1, 1, 0], [1, 1, 0, 0], [1, 1, 0, 0]];
        assert_eq!(history.flipped_bits(1), 2);
        assert_eq!(history.flipped_bits(2), 0);
    }

    #[test]
    fn materialize_replicates_last_iteration() {
        let mut history = IterationHistory::<i32>::new(4, 2).unwrap();
        history.hard_decisions = array![[1, 0], [0, 0], [1, 1], [1, 1]];
        history.app = array![[-3, 2], [4, 5], [9, 9], [9, 9]];
        let mut statistics = RunStatistics::new(4).unwrap();
        statistics.mean_iterations[1] = 1;
        statistics.mean_iterations[2] = 2;
        materialize(&mut history, &mut statistics, 2);
        assert_eq!(history.hard_decisions, array![[1, 0], [0, 0], [0, 0], [0, 0]]);
        assert_eq!(history.app, array![[-3, 2], [4, 5], [4, 5], [4, 5]]);
        assert_eq!(statistics.mean_iterations, [0, 1, 2, 2, 2]);
    }

    #[test]
    fn statistics_layout() {
        let mut statistics = RunStatistics::new(10).unwrap();
        assert_eq!(statistics.mean_iterations.len(), 11);
        assert_eq!(statistics.flipped_bits.len(), 10);
        statistics.flipped_bits[3] = 7;
        statistics.decoding_successful = true;
        statistics.reset();
        assert_eq!(statistics, RunStatistics::new(10).unwrap());
    }
}
