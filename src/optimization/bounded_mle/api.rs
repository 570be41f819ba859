//! High-level entry point for maximizing a user-provided `LogLikelihood`
//! under box constraints.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`
//! with clamping and gradient projection), and delegates the run to
//! `run_lbfgs`.
use crate::optimization::{
    bounded_mle::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        bounds::Bounds,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
    },
    errors::{OptError, OptResult},
};

/// Maximize a log-likelihood `ℓ(θ)` over a box using L-BFGS with the chosen
/// line search.
///
/// # Behavior
/// - Checks that `bounds` matches the dimension of `theta0` and clamps the
///   starting point into the box.
/// - Validates the initial guess via `f.check(theta0, data)`.
/// - Wraps `(f, data, bounds)` in an `ArgMinAdapter` that exposes a
///   *minimization* problem `c(θ) = -ℓ(θ)` to `argmin`, clamping every
///   trial point and projecting gradients at active bounds.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, optional observers) and returns an `OptimOutcome`.
/// - Clamps the reported best point back into the box; the executor tracks
///   raw line-search iterates, but every evaluation happened at the
///   clamped point.
///
/// # Parameters
/// - `f`: Your model implementing [`LogLikelihood`].
/// - `theta0`: Initial parameter vector.
/// - `data`: Model data passed through to `value`/`grad`.
/// - `bounds`: Feasible box; use [`Bounds::unbounded`] for an
///   unconstrained run.
/// - `opts`: Optimizer options (tolerances, line search choice, verbosity, etc.).
///
/// # Errors
/// - [`OptError::BoundsDimMismatch`] when `bounds.len() != theta0.len()`.
/// - Propagates any error from `f.check`.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures).
///
/// # Returns
/// An [`OptimOutcome`] containing `theta_hat`, best value `ℓ(θ̂)`,
/// termination status, iteration counts, function evaluation counts, and
/// optionally the gradient norm.
///
/// # Example
/// ```ignore
/// use ndarray::array;
/// use sizefreq::optimization::bounded_mle::{
///     maximize, Bounds, MLEOptions, LogLikelihood,
/// };
///
/// // Concave log-likelihood: -(θ·θ), maximized at the origin.
/// struct MyLL;
/// impl LogLikelihood for MyLL {
///     type Data = ();
///     fn value(&self, theta: &ndarray::Array1<f64>, _: &()) -> sizefreq::optimization::errors::OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &ndarray::Array1<f64>, _: &()) -> sizefreq::optimization::errors::OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let bounds = Bounds::new(array![0.5, -1.0], array![2.0, 1.0])?;
/// let out = maximize(&MyLL, array![1.0, 0.3], &(), &bounds, &MLEOptions::default())?;
/// assert!((out.theta_hat[0] - 0.5).abs() < 1e-4); // pinned to the lower bound
/// ```
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, bounds: &Bounds, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    if bounds.len() != theta0.len() {
        return Err(OptError::BoundsDimMismatch {
            expected: theta0.len(),
            found: bounds.len(),
        });
    }
    let theta0 = bounds.clamped(&theta0);
    f.check(&theta0, data)?;
    let problem = ArgMinAdapter::new(f, data, bounds);
    let mut outcome = match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)
        }
    }?;
    // The executor tracks raw line-search iterates; the best value was
    // evaluated at the clamped point, so report that point.
    let theta_feasible = bounds.clamped(&outcome.theta_hat);
    outcome.theta_hat = theta_feasible;
    Ok(outcome)
}
