//! Decoder input and output collaborators.
//!
//! [`Decoder::run`](super::Decoder::run) reads the channel values from an
//! [`InputSource`] and writes its results to an [`OutputSink`], so that the
//! decoder can be embedded in a larger simulation or processing chain.

use super::{statistics::RunStatistics, Error};
use ndarray::ArrayView1;

/// Source of channel values.
pub trait InputSource<T> {
    /// Fills `channel` with the channel values of the next frame.
    ///
    /// # Errors
    /// Returns an error if the values cannot be read, for instance because
    /// the source does not hold one value per variable node.
    fn read_channel(&mut self, channel: &mut [T]) -> Result<(), Error>;
}

fn copy_channel<T: Copy>(source: &[T], channel: &mut [T]) -> Result<(), Error> {
    if source.len() != channel.len() {
        return Err(Error::InputLength {
            expected: channel.len(),
            got: source.len(),
        });
    }
    channel.copy_from_slice(source);
    Ok(())
}

impl<T: Copy> InputSource<T> for &[T] {
    fn read_channel(&mut self, channel: &mut [T]) -> Result<(), Error> {
        copy_channel(self, channel)
    }
}

impl<T: Copy> InputSource<T> for Vec<T> {
    fn read_channel(&mut self, channel: &mut [T]) -> Result<(), Error> {
        copy_channel(self, channel)
    }
}

/// Destination of the decoder results.
pub trait OutputSink<T> {
    /// Receives the hard decisions and APP values of an iteration.
    ///
    /// This is called once per iteration, including the iterations that were
    /// filled with the results of the last executed iteration.
    fn write_iteration(
        &mut self,
        iteration: usize,
        hard_decisions: ArrayView1<'_, u8>,
        app: ArrayView1<'_, T>,
    );

    /// Receives the statistics of the run.
    fn write_statistics(&mut self, statistics: &RunStatistics);
}

/// Output sink that keeps copies of all the results.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectingSink<T> {
    /// Hard decisions of each iteration.
    pub hard_decisions: Vec<Vec<u8>>,
    /// APP values of each iteration.
    pub app: Vec<Vec<T>>,
    /// Run statistics.
    pub statistics: Option<RunStatistics>,
}

impl<T> Default for CollectingSink<T> {
    fn default() -> CollectingSink<T> {
        CollectingSink {
            hard_decisions: Vec::new(),
            app: Vec::new(),
            statistics: None,
        }
    }
}

impl<T: Clone> OutputSink<T> for CollectingSink<T> {
    fn write_iteration(
        &mut self,
        _iteration: usize,
        hard_decisions: ArrayView1<'_, u8>,
        app: ArrayView1<'_, T>,
    ) {
        self.hard_decisions.push(hard_decisions.to_vec());
        self.app.push(app.to_vec());
    }

    fn write_statistics(&mut self, statistics: &RunStatistics) {
        self.statistics = Some(statistics.clone());
    }
}
