//! Convergence monitor.
//!
//! The hardware does not stop as soon as all the parity checks are
//! satisfied: it performs one more iteration and stops after it. The
//! [`ConvergenceMonitor`] tracks this, together with the iteration cap.

/// State of the iteration loop.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum ConvergenceState {
    /// Parity checks not satisfied yet.
    Running,
    /// All the parity checks have been satisfied. One more iteration is
    /// performed.
    PendingExtraIteration,
    /// The loop has finished.
    Done,
}

/// Convergence monitor.
///
/// # Examples
/// ```
/// # use ldpc_8023an::decoder::convergence::{ConvergenceMonitor, ConvergenceState};
/// let mut monitor = ConvergenceMonitor::new(10);
/// assert_eq!(monitor.iteration_completed(false), ConvergenceState::Running);
/// assert_eq!(
///     monitor.iteration_completed(true),
///     ConvergenceState::PendingExtraIteration
/// );
/// assert_eq!(monitor.iteration_completed(true), ConvergenceState::Done);
/// assert_eq!(monitor.iterations(), 3);
/// assert!(monitor.successful());
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct ConvergenceMonitor {
    state: ConvergenceState,
    iterations: usize,
    max_iterations: usize,
    successful: bool,
}

impl ConvergenceMonitor {
    /// Creates a monitor for a loop of at most `max_iterations` iterations.
    pub fn new(max_iterations: usize) -> ConvergenceMonitor {
        ConvergenceMonitor {
            state: ConvergenceState::Running,
            iterations: 0,
            max_iterations,
            successful: false,
        }
    }

    /// Records the end of an iteration.
    ///
    /// `all_checks_satisfied` tells if all the parity checks were satisfied
    /// in this iteration. Returns the new state.
    pub fn iteration_completed(&mut self, all_checks_satisfied: bool) -> ConvergenceState {
        let extra_iteration_done = self.state == ConvergenceState::PendingExtraIteration;
        if all_checks_satisfied && self.state == ConvergenceState::Running {
            self.successful = true;
            self.state = ConvergenceState::PendingExtraIteration;
        }
        self.iterations += 1;
        if extra_iteration_done || self.iterations >= self.max_iterations {
            self.state = ConvergenceState::Done;
        }
        self.state
    }

    /// Returns the current state.
    pub fn state(&self) -> ConvergenceState {
        self.state
    }

    /// Returns the number of completed iterations.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Returns `true` if all the parity checks were satisfied at some
    /// iteration.
    pub fn successful(&self) -> bool {
        self.successful
    }

    /// Returns `true` if the loop has finished.
    pub fn is_done(&self) -> bool {
        self.state == ConvergenceState::Done
    }
}
