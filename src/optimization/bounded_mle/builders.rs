//! bounded_mle::builders — L-BFGS solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the L-BFGS solvers used by the
//! bounded log-likelihood optimizer. These helpers hide Argmin’s generic
//! wiring and apply crate-level options (e.g., tolerances, memory size) so
//! that higher-level code can request a configured solver without touching
//! Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct L-BFGS solvers with either Hager–Zhang or More–Thuente
//!   line search based on crate-level aliases.
//! - Apply optional gradient and cost-change tolerances from
//!   [`MLEOptions`] via a shared configuration helper.
//! - Leave the initial parameter vector and maximum iterations to the
//!   runner/executor layer, keeping these builders side-effect free.
//!
//! Invariants & assumptions
//! ------------------------
//! - All solvers operate on the canonical optimizer numeric types
//!   [`Theta`], [`Grad`], and [`Cost`] as defined in
//!   [`bounded_mle::types`](super::types).
//! - The L-BFGS memory (`m`) is either provided via `opts.lbfgs_mem` or
//!   defaults to [`DEFAULT_LBFGS_MEM`].
//! - Any invalid tolerance passed into Argmin’s
//!   `with_tolerance_grad` / `with_tolerance_cost` is surfaced as an
//!   `OptError` via the crate’s `From<Error>` implementations; callers
//!   are expected to handle these with [`OptResult`].
//!
//! Conventions
//! -----------
//! - [`HagerZhangLS`] and [`MoreThuenteLS`] are the crate’s canonical
//!   line-search aliases; [`LbfgsHagerZhang`] and
//!   [`LbfgsMoreThuente`] pair these with the standard `(Theta, Grad,
//!   Cost)` triple.
//! - The builders do **not** set an initial parameter vector (`theta0`)
//!   or `max_iters`; these are treated as runtime concerns and are
//!   applied by the runner (e.g., `run_lbfgs`).
//! - Box constraints never reach the solver: clamping and projection live
//!   in the adapter, so these builders stay identical for bounded and
//!   unbounded problems.
//!
//! Downstream usage
//! ----------------
//! - The high-level entry point calls [`build_optimizer_hager_zhang`] or
//!   [`build_optimizer_more_thuente`] based on a configured
//!   `LineSearcher` enum in [`MLEOptions`].
//! - The returned solver is passed to a runner (e.g., `run_lbfgs`) along
//!   with an adapted problem and initial parameters.
//! - [`configure_lbfgs`] is the shared wiring function that applies
//!   tolerances; it is generic over the line-search type and can be
//!   reused by future L-BFGS variants if needed.
//!
//! Testing notes
//! -------------
//! - Unit tests for this module verify correct propagation of
//!   `lbfgs_mem` / `DEFAULT_LBFGS_MEM` and tolerance settings into the
//!   solver configuration.
//! - Integration tests in the optimizer layer exercise these builders
//!   indirectly by running full L-BFGS solves with different line-search
//!   and tolerance configurations.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    bounded_mle::{
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta,
        },
    },
    errors::OptResult,
};

/// build_optimizer_hager_zhang — construct L-BFGS with Hager–Zhang line search.
///
/// Purpose
/// -------
/// Build an [`LbfgsHagerZhang`] solver configured with the crate’s
/// standard numeric types and optional tolerances from [`MLEOptions`],
/// leaving initial parameters and iteration limits to the caller.
///
/// Parameters
/// ----------
/// - `opts`: `&MLEOptions`
///   Optimizer options. This builder consults:
///   - `opts.lbfgs_mem`: optional L-BFGS history size (`m`); when
///     `None`, [`DEFAULT_LBFGS_MEM`] is used.
///   - `opts.tols.tol_grad` and `opts.tols.tol_cost`: optional
///     gradient-norm and cost-change tolerances wired into the solver
///     via Argmin’s `with_tolerance_grad` / `with_tolerance_cost`.
///
/// Returns
/// -------
/// `OptResult<LbfgsHagerZhang>`
///   - `Ok(solver)` containing an L-BFGS instance with Hager–Zhang line
///     search and any configured tolerances.
///   - `Err(e)` if Argmin rejects any of the tolerance settings.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`)
///   Returned when `with_tolerance_grad` or `with_tolerance_cost`
///   encounters an invalid tolerance or other internal configuration
///   error.
///
/// Notes
/// -----
/// - This function does not set `theta0` or `max_iters`; these must be
///   configured by the caller when running the solver.
///
/// Examples
/// --------
/// ```ignore
/// let solver = build_optimizer_hager_zhang(&opts)?;
/// let outcome = run_lbfgs(theta0, &opts, problem, solver)?;
/// ```
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let hager_zhang = HagerZhangLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(hager_zhang, mem);
    configure_lbfgs(lbfgs, opts)
}

/// build_optimizer_more_thuente — construct L-BFGS with More–Thuente line search.
///
/// Purpose
/// -------
/// Build an [`LbfgsMoreThuente`] solver configured with the crate’s
/// standard numeric types and optional tolerances from [`MLEOptions`],
/// using the More–Thuente line-search strategy.
///
/// Parameters
/// ----------
/// - `opts`: `&MLEOptions`
///   Optimizer options; consulted exactly as in
///   [`build_optimizer_hager_zhang`] (`lbfgs_mem`, `tol_grad`,
///   `tol_cost`).
///
/// Returns
/// -------
/// `OptResult<LbfgsMoreThuente>`
///   - `Ok(solver)` containing an L-BFGS instance with More–Thuente line
///     search and any configured tolerances.
///   - `Err(e)` if Argmin rejects any of the tolerance settings.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`)
///   Returned when `with_tolerance_grad` or `with_tolerance_cost`
///   fails due to invalid tolerances or other internal configuration
///   issues.
///
/// Notes
/// -----
/// - As with [`build_optimizer_hager_zhang`], this builder only configures
///   the solver; initial parameters and iteration limits are applied by
///   the runner.
///
/// Examples
/// --------
/// ```ignore
/// let solver = build_optimizer_more_thuente(&opts)?;
/// let outcome = run_lbfgs(theta0, &opts, problem, solver)?;
/// ```
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let more_thuente = MoreThuenteLS::new();
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(more_thuente, mem);
    configure_lbfgs(lbfgs, opts)
}

/// configure_lbfgs — apply optional tolerances to an L-BFGS solver.
///
/// Purpose
/// -------
/// Generic helper that wires crate-level tolerance options from
/// [`MLEOptions`] into an existing L-BFGS solver, regardless of the
/// line-search type. This centralizes tolerance handling so builder
/// functions remain thin.
///
/// Parameters
/// ----------
/// - `solver`: `LBFGS<L, Theta, Grad, Cost>`
///   Pre-constructed L-BFGS solver using some line-search type `L`.
/// - `opts`: `&MLEOptions`
///   Source of the optional `tol_grad` / `tol_cost` settings.
///
/// Returns
/// -------
/// `OptResult<LBFGS<L, Theta, Grad, Cost>>`
///   - `Ok(solver)` with any present tolerances applied.
///   - `Err(e)` if any tolerance configuration fails inside Argmin.
///
/// Notes
/// -----
/// - When a tolerance is `None`, the corresponding `with_tolerance_*`
///   method is not called; Argmin’s defaults remain in effect.
/// - This helper does not touch the solver’s initial parameter vector,
///   maximum iteration count, or line-search settings.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
