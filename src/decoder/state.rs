//! Decoder memories.
//!
//! The APP memory and the message memory are split into `partition_count`
//! lanes, which model the parallel memory banks of the hardware. Element `i`
//! of a memory lives in lane `i % P` at depth `i / P`. All the memories are
//! allocated fallibly, so that a configuration that asks for too much memory
//! is reported as an [`Error::Allocation`] instead of aborting.

use super::{
    arithmetic::DecoderArithmetic,
    config::{DecoderConfig, SchedulingMode},
    Error,
};
use crate::code::CodeStructure;
use ndarray::Array2;

/// Allocates a vector filled with `value`.
///
/// # Errors
/// Returns [`Error::Allocation`] if the memory cannot be reserved.
pub fn try_vec<T: Clone>(len: usize, value: T, what: &'static str) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::Allocation {
        what,
        rows: 1,
        cols: len,
    })?;
    v.resize(len, value);
    Ok(v)
}

/// Allocates a 2D array filled with `value`.
///
/// # Errors
/// Returns [`Error::Allocation`] if the number of elements overflows or the
/// memory cannot be reserved.
pub fn try_array2<T: Clone>(
    rows: usize,
    cols: usize,
    value: T,
    what: &'static str,
) -> Result<Array2<T>, Error> {
    let error = Error::Allocation { what, rows, cols };
    let len = rows.checked_mul(cols).ok_or_else(|| error.clone())?;
    let v = try_vec(len, value, what).map_err(|_| error.clone())?;
    Array2::from_shape_vec((rows, cols), v).map_err(|_| error)
}

/// Memory split in parallel lanes.
#[derive(Debug, Clone, PartialEq)]
pub struct LaneStore<T> {
    data: Array2<T>,
}

impl<T: Copy + Default> LaneStore<T> {
    /// Allocates a memory of `len` elements split in `lanes` lanes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if the number of lanes is zero or
    /// does not divide `len`, and [`Error::Allocation`] if the memory cannot
    /// be allocated.
    pub fn new(len: usize, lanes: usize, what: &'static str) -> Result<LaneStore<T>, Error> {
        if lanes == 0 || len % lanes != 0 {
            return Err(Error::InvalidParameter {
                name: "partition_count",
                reason: format!("{lanes} lanes cannot hold the {len} elements of the {what}"),
            });
        }
        Ok(LaneStore {
            data: try_array2(lanes, len / lanes, T::default(), what)?,
        })
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the memory has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of lanes.
    pub fn lanes(&self) -> usize {
        self.data.nrows()
    }

    /// Reads an element.
    pub fn get(&self, index: usize) -> T {
        let lanes = self.lanes();
        self.data[[index % lanes, index / lanes]]
    }

    /// Writes an element.
    pub fn set(&mut self, index: usize, value: T) {
        let lanes = self.lanes();
        self.data[[index % lanes, index / lanes]] = value;
    }

    /// Sets all the elements to `value`.
    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }

    /// Copies the contents of a memory with the same layout.
    pub fn copy_from(&mut self, other: &LaneStore<T>) {
        self.data.assign(&other.data);
    }
}

/// State of a decoder run.
#[derive(Debug, Clone, PartialEq)]
pub struct StateStore<T> {
    /// APP values, addressed by variable node.
    pub app: LaneStore<T>,
    /// Check node messages, addressed by `check * max_check_degree + slot`.
    pub messages: LaneStore<T>,
    /// Snapshot of the APP values taken at the start of a two-phase
    /// iteration.
    ///
    /// This is empty for the layered schedule.
    pub app_parity_check: LaneStore<T>,
    /// Accumulated message updates of a two-phase iteration.
    ///
    /// This is empty for the layered schedule.
    pub accumulator: Vec<T>,
}

impl<T: Copy + Default> StateStore<T> {
    /// Allocates the memories for a code and configuration.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameter`] if the partition count does not
    /// split the memories evenly, and [`Error::Allocation`] if a memory
    /// cannot be allocated.
    pub fn new(code: &CodeStructure, config: &DecoderConfig) -> Result<StateStore<T>, Error> {
        let n = code.num_variable_nodes();
        let lanes = config.partition_count;
        let snapshot_len = match config.scheduling {
            SchedulingMode::Layered => 0,
            SchedulingMode::TwoPhase => n,
        };
        Ok(StateStore {
            app: LaneStore::new(n, lanes, "APP memory")?,
            messages: LaneStore::new(
                code.num_check_nodes() * code.max_check_degree(),
                lanes,
                "message memory",
            )?,
            app_parity_check: LaneStore::new(snapshot_len, lanes, "APP snapshot memory")?,
            accumulator: try_vec(snapshot_len, T::default(), "message accumulator")?,
        })
    }

    /// Returns the number of lanes.
    pub fn lanes(&self) -> usize {
        self.app.lanes()
    }

    /// Initializes the memories for a new run.
    ///
    /// The channel values are saturated to the extrinsic range and written
    /// to the APP memory, and all the messages are cleared.
    pub fn load_channel<A>(&mut self, code: &CodeStructure, arithmetic: &A, channel: &[T])
    where
        A: DecoderArithmetic<Llr = T>,
    {
        for (position, &llr) in channel.iter().enumerate() {
            self.app
                .set(code.app_address(position), arithmetic.saturate_extrinsic(llr));
        }
        self.messages.fill(T::default());
    }
}
