//! Shared control loop for the iterative solvers.
//!
//! Lasso and logistic regression both run "update every parameter, stop when the
//! largest change drops below a tolerance or the iteration cap is hit". Reaching
//! the cap is a normal outcome, reported through [`Convergence`], never an error.
//! Long fits can be stopped cooperatively through an [`Interrupt`], which is
//! checked once per outer iteration.

use crate::error::{RegressionError, Result};
use crate::params::Parameters;
use crate::Vector;
use log::{debug, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cooperative cancellation handle for long-running fits.
#[derive(Clone, Debug, Default)]
pub struct Interrupt {
    deadline: Option<Instant>,
    cancelled: Option<Arc<AtomicBool>>,
}

impl Interrupt {
    /// An interrupt that never fires.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Watch a flag that another thread may set to request cancellation.
    pub fn with_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancelled = Some(flag);
        self
    }

    pub fn check(&self) -> Result<()> {
        if let Some(flag) = &self.cancelled {
            if flag.load(Ordering::Relaxed) {
                return Err(RegressionError::Interrupted("cancelled".to_string()));
            }
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(RegressionError::Interrupted("deadline exceeded".to_string()));
            }
        }
        Ok(())
    }
}

/// How an iterative fit terminated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Convergence {
    /// Number of completed passes.
    pub iterations: usize,
    /// Largest absolute parameter change in the final pass.
    pub max_delta: f64,
    pub converged: bool,
}

impl Convergence {
    pub(crate) fn write_to(&self, params: &mut Parameters) {
        params.insert("n_iter", self.iterations);
        params.insert("converged", self.converged);
        // JSON has no infinity; a run with zero passes simply omits it.
        if self.max_delta.is_finite() {
            params.insert("max_delta", self.max_delta);
        }
    }

    pub(crate) fn read_from(params: &Parameters) -> Result<Self> {
        Ok(Self {
            iterations: params.integer_or("n_iter", 0)?,
            max_delta: params.scalar_or("max_delta", f64::INFINITY)?,
            converged: params.flag_or("converged", false)?,
        })
    }
}

/// Run `step` on `params` until the largest absolute change in a pass falls
/// below `tolerance`, or `max_iter` passes have run.
///
/// `step` updates the parameters in place. The interrupt is checked before each
/// pass; an interrupted run returns the error and the caller discards `params`.
pub fn descend<F>(
    params: &mut Vector,
    max_iter: usize,
    tolerance: f64,
    interrupt: &Interrupt,
    mut step: F,
) -> Result<Convergence>
where
    F: FnMut(&mut Vector),
{
    let mut max_delta = f64::INFINITY;

    for iteration in 0..max_iter {
        interrupt.check()?;

        let previous = params.clone();
        step(params);
        max_delta = max_abs_diff(params, &previous);

        if max_delta < tolerance {
            debug!(
                "converged after {} iterations (max delta {:e})",
                iteration + 1,
                max_delta
            );
            return Ok(Convergence {
                iterations: iteration + 1,
                max_delta,
                converged: true,
            });
        }
    }

    warn!(
        "stopped at the iteration cap ({}) without converging (max delta {:e}, tolerance {:e})",
        max_iter, max_delta, tolerance
    );
    Ok(Convergence {
        iterations: max_iter,
        max_delta,
        converged: false,
    })
}

pub(crate) fn max_abs_diff(a: &Vector, b: &Vector) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_descend_converges() {
        // Fixed-point iteration x <- x / 2 towards zero.
        let mut params = array![1.0, -4.0];
        let report = descend(&mut params, 1000, 1e-6, &Interrupt::none(), |p| {
            p.mapv_inplace(|v| v / 2.0)
        })
        .unwrap();

        assert!(report.converged);
        assert!(report.iterations < 1000);
        assert!(report.max_delta < 1e-6);
        assert!(params.iter().all(|v| v.abs() < 1e-5));
    }

    #[test]
    fn test_descend_hits_cap_without_error() {
        let mut params = array![0.0];
        let report = descend(&mut params, 5, 1e-6, &Interrupt::none(), |p| p[0] += 1.0).unwrap();

        assert!(!report.converged);
        assert_eq!(report.iterations, 5);
        assert_eq!(params[0], 5.0);
    }

    #[test]
    fn test_descend_zero_iterations() {
        let mut params = array![3.0];
        let report = descend(&mut params, 0, 1e-6, &Interrupt::none(), |p| p[0] = 0.0).unwrap();

        assert!(!report.converged);
        assert_eq!(report.iterations, 0);
        assert_eq!(params[0], 3.0);
    }

    #[test]
    fn test_interrupt_flag() {
        let flag = Arc::new(AtomicBool::new(false));
        let interrupt = Interrupt::none().with_flag(flag.clone());
        assert!(interrupt.check().is_ok());

        flag.store(true, Ordering::Relaxed);
        let mut params = array![1.0];
        let result = descend(&mut params, 10, 1e-6, &interrupt, |p| p[0] += 1.0);
        assert!(matches!(result, Err(RegressionError::Interrupted(_))));
    }

    #[test]
    fn test_interrupt_deadline_in_past() {
        let interrupt = Interrupt::none().with_timeout(Duration::ZERO);
        assert!(matches!(
            interrupt.check(),
            Err(RegressionError::Interrupted(_))
        ));
    }
}
