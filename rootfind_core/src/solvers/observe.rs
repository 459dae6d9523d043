//! Per-iteration observation and cooperative cancellation.
//!
//! Solvers call [`Observer::observe`] once at the top of every loop
//! iteration, before any work for that step. Returning
//! [`Control::Stop`] ends the run with `Cancelled` and keeps the history
//! collected so far.
//!
//! ```rust
//! use std::sync::atomic::AtomicBool;
//! use rootfind_core::solvers::{newton, Control, Step};
//!
//! let input = newton::NewtonInput::new("x^2 - 4", 3.0);
//!
//! // Closure observer: stop after two steps
//! let result = newton::solve_observed(&input, |step: &Step| {
//!     (step.iteration >= 2).then_some(Control::Stop)
//! })
//! .unwrap();
//! assert!(!result.converged);
//!
//! // Flag observer, set from another thread
//! let cancel = AtomicBool::new(false);
//! let result = newton::solve_observed(&input, &cancel).unwrap();
//! assert!(result.converged);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use super::Method;

/// State at the top of one loop iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub method: Method,
    pub iteration: usize,
    /// Current iterate
    pub x: f64,
    /// `f(x)` at the current iterate
    pub fx: f64,
}

/// Requests an observer can make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    /// End the run now.
    Stop,
}

/// Watches a running solver.
pub trait Observer {
    fn observe(&mut self, step: &Step) -> Option<Control>;
}

impl<F> Observer for F
where
    F: FnMut(&Step) -> Option<Control>,
{
    fn observe(&mut self, step: &Step) -> Option<Control> {
        self(step)
    }
}

/// No-op observer.
impl Observer for () {
    fn observe(&mut self, _step: &Step) -> Option<Control> {
        None
    }
}

/// Stop once the flag is set.
impl Observer for &AtomicBool {
    fn observe(&mut self, _step: &Step) -> Option<Control> {
        self.load(Ordering::Relaxed).then_some(Control::Stop)
    }
}
