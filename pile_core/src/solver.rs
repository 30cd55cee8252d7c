//! # Scalar Root Finding
//!
//! The equilibrium equations of the load-transfer engine are scalar
//! fixed-point conditions solved by a one-dimensional root finder. The
//! finder is kept behind the [`RootFinder`] trait so the strategy (Newton,
//! bisection, Brent) can be swapped without touching slice semantics.
//!
//! ## Algorithm
//!
//! [`NewtonRaphson`] iterates `x_{k+1} = x_k - f(x_k) / f'(x_k)` with a
//! central-difference derivative, safeguarded for the saturating residuals
//! this engine produces:
//!
//! - every evaluated point updates a sign-change bracket; a Newton step
//!   falling outside the bracket is replaced by its midpoint (bisection);
//! - on a plateau (vanishing derivative, no bracket yet) the iterate is
//!   pulled back toward zero by halving instead of aborting, since the
//!   mobilization laws are saturating and the informative region lies near
//!   the origin;
//! - when the bracket collapses below `bracket_tolerance` the iterate is
//!   accepted: the residual of a nested solve carries the truncation noise
//!   of its inner solves, so the sign change localizes the root better
//!   than the residual magnitude does;
//! - a non-finite residual or iterate is reported as divergence.
//!
//! The iteration budget is hard; a function with no root (a head load above
//! the ultimate resistance) exhausts it and returns an error instead of
//! looping.

use thiserror::Error;

/// Maximum iterations for the default Newton-Raphson finder
const MAX_ITERATIONS: usize = 100;

/// Residual convergence tolerance for the default finder
const TOLERANCE: f64 = 1.0e-9;

/// Step used for the central-difference derivative
const DERIVATIVE_STEP: f64 = 1.0e-8;

/// Bracket width below which the iterate is accepted as the root
const BRACKET_TOLERANCE: f64 = 1.0e-12;

/// Result type alias for root-finding operations
pub type SolverResult<T> = Result<T, SolverError>;

/// Failure taxonomy of a scalar root search.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The residual did not fall below tolerance within the iteration budget
    #[error("No convergence after {iterations} iterations (last residual {residual:e})")]
    MaxIterationsExceeded { iterations: usize, residual: f64 },

    /// The derivative vanished with no way to make progress
    #[error("Zero derivative at x = {at}")]
    ZeroDerivative { at: f64 },

    /// The iterate or the residual became non-finite
    #[error("Iteration diverged")]
    Diverged,
}

/// A deterministic scalar root finder: given `f` and an initial guess,
/// return an `x` with `f(x) ~ 0` or a failure.
pub trait RootFinder {
    /// Find a root of `f` starting from `x0`.
    ///
    /// A non-finite residual returned by `f` must surface as
    /// [`SolverError::Diverged`], never be swallowed.
    fn find_root<F>(&self, f: F, x0: f64) -> SolverResult<f64>
    where
        F: Fn(f64) -> f64;
}

/// Newton-Raphson iteration with a central-difference derivative, a
/// bisection safeguard and plateau pull-back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonRaphson {
    /// Convergence tolerance on |f(x)|
    pub tolerance: f64,
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Half-width of the central-difference stencil
    pub derivative_step: f64,
    /// Sign-change bracket width accepted as converged
    pub bracket_tolerance: f64,
}

impl NewtonRaphson {
    /// Create a finder with explicit tolerance and iteration budget.
    pub fn new(tolerance: f64, max_iterations: usize) -> Self {
        NewtonRaphson {
            tolerance,
            max_iterations,
            derivative_step: DERIVATIVE_STEP,
            bracket_tolerance: BRACKET_TOLERANCE,
        }
    }
}

impl Default for NewtonRaphson {
    fn default() -> Self {
        NewtonRaphson::new(TOLERANCE, MAX_ITERATIONS)
    }
}

/// Sign-change bracket maintained from all evaluated points.
#[derive(Clone, Copy)]
struct Bracket {
    negative: Option<f64>,
    positive: Option<f64>,
}

impl Bracket {
    fn new() -> Self {
        Bracket {
            negative: None,
            positive: None,
        }
    }

    fn record(&mut self, x: f64, residual: f64) {
        if residual < 0.0 {
            self.negative = Some(x);
        } else {
            self.positive = Some(x);
        }
    }

    fn interval(&self) -> Option<(f64, f64)> {
        match (self.negative, self.positive) {
            (Some(a), Some(b)) => Some((a.min(b), a.max(b))),
            _ => None,
        }
    }
}

impl RootFinder for NewtonRaphson {
    fn find_root<F>(&self, f: F, x0: f64) -> SolverResult<f64>
    where
        F: Fn(f64) -> f64,
    {
        let mut x = x0;
        let mut residual = f(x);
        let mut bracket = Bracket::new();

        for _ in 0..self.max_iterations {
            if !residual.is_finite() || !x.is_finite() {
                return Err(SolverError::Diverged);
            }
            if residual.abs() < self.tolerance {
                return Ok(x);
            }
            bracket.record(x, residual);
            if let Some((lo, hi)) = bracket.interval() {
                if hi - lo < self.bracket_tolerance {
                    return Ok(x);
                }
            }

            let h = self.derivative_step;
            let derivative = (f(x + h) - f(x - h)) / (2.0 * h);
            if !derivative.is_finite() {
                return Err(SolverError::Diverged);
            }

            let newton = if derivative.abs() > f64::EPSILON {
                Some(x - residual / derivative)
            } else {
                None
            };

            x = match (newton, bracket.interval()) {
                // A Newton step inside the bracket is accepted; outside it
                // is replaced by a bisection of the bracket.
                (Some(step), Some((lo, hi))) => {
                    if step > lo && step < hi {
                        step
                    } else {
                        (lo + hi) / 2.0
                    }
                }
                (Some(step), None) => step,
                (None, Some((lo, hi))) => (lo + hi) / 2.0,
                // Plateau with no bracket: pull the iterate back toward
                // zero, where saturating laws still carry slope.
                (None, None) => {
                    if x.abs() <= self.derivative_step {
                        return Err(SolverError::ZeroDerivative { at: x });
                    }
                    x / 2.0
                }
            };
            residual = f(x);
        }

        if residual.is_finite() && residual.abs() < self.tolerance {
            Ok(x)
        } else {
            Err(SolverError::MaxIterationsExceeded {
                iterations: self.max_iterations,
                residual,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_root() {
        let finder = NewtonRaphson::default();
        let root = finder.find_root(|x| 2.0 * x - 3.0, 0.0).unwrap();
        assert!((root - 1.5).abs() < 1e-8);
    }

    #[test]
    fn test_nonlinear_root() {
        let finder = NewtonRaphson::default();
        let root = finder.find_root(|x| x * x - 2.0, 1.0).unwrap();
        assert!((root - 2.0_f64.sqrt()).abs() < 1e-7);
    }

    #[test]
    fn test_piecewise_linear_root() {
        // Saturating residual, the shape the slice equation takes.
        let finder = NewtonRaphson::default();
        let f = |x: f64| 0.002 + 0.5 * x.min(0.004) - x;
        let root = finder.find_root(f, 0.0).unwrap();
        assert!(f(root).abs() < 1e-9);
        assert!((root - 0.004).abs() < 1e-8);
    }

    #[test]
    fn test_plateau_seed_recovers() {
        // Saturating function seeded far out on its plateau, the shape the
        // head-load solve takes with its force-valued seed.
        let finder = NewtonRaphson::default();
        let f = |x: f64| 5.0 * x.clamp(-0.1, 0.1) - 0.3;
        let root = finder.find_root(f, 2.0).unwrap();
        assert!((root - 0.06).abs() < 1e-8);
    }

    #[test]
    fn test_determinism() {
        let finder = NewtonRaphson::default();
        let a = finder.find_root(|x| x * x * x - 5.0, 2.0).unwrap();
        let b = finder.find_root(|x| x * x * x - 5.0, 2.0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rootless_function_fails() {
        let finder = NewtonRaphson::new(1e-9, 40);
        // Saturating, strictly positive: no root anywhere.
        let result = finder.find_root(|x| 1.0 + 0.1 * x.abs().min(0.5), 2.0);
        assert!(result.is_err());
    }

    #[test]
    fn test_non_finite_residual_is_divergence() {
        let finder = NewtonRaphson::default();
        let result = finder.find_root(|_| f64::NAN, 0.0);
        assert_eq!(result, Err(SolverError::Diverged));
    }

    #[test]
    fn test_zero_derivative_at_origin_detected() {
        let finder = NewtonRaphson::default();
        let result = finder.find_root(|_| 1.0, 0.0);
        assert_eq!(result, Err(SolverError::ZeroDerivative { at: 0.0 }));
    }
}
