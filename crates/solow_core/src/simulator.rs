//! Fixed-point iteration of a transition map until both coordinates settle.

use crate::error::SimulationError;
use crate::params::{ModelParameters, SimulationSettings};
use crate::production::TransitionMap;
use crate::state::{ConvergenceResult, State, Trajectory};
use tracing::{debug, warn};

/// Iterates `map` from `initial` until successive states differ by less than
/// `settings.tolerance` in both coordinates, or until `settings.max_iterations`
/// steps have been taken.
///
/// The returned trajectory holds the initial state and every state computed,
/// so its length is between 2 and `max_iterations + 1`.
///
/// # Errors
///
/// - [`SimulationError::Parameter`] if the parameters, the map's own requirements
///   or the initial state are invalid. The map is never applied in that case.
/// - [`SimulationError::InvalidSettings`] for a non-positive tolerance or zero
///   iteration budget.
/// - [`SimulationError::NumericDomain`] as soon as the map produces a
///   non-finite coordinate.
pub fn run<M>(
    map: &M,
    initial: State,
    params: &ModelParameters,
    settings: &SimulationSettings,
) -> Result<ConvergenceResult, SimulationError>
where
    M: TransitionMap + ?Sized,
{
    params.validate()?;
    map.validate(params)?;
    initial.validate_initial()?;
    settings
        .validate()
        .map_err(|reason| SimulationError::InvalidSettings { reason })?;

    debug!(
        k0 = initial.k,
        h0 = initial.h,
        tolerance = settings.tolerance,
        max_iterations = settings.max_iterations,
        "starting growth simulation"
    );

    let mut trajectory = Trajectory::new(initial);
    let mut current = initial;

    for iteration in 1..=settings.max_iterations {
        let next = map.transition(current, params);
        if !next.is_finite() {
            warn!(
                iteration,
                k = current.k,
                h = current.h,
                "transition map produced a non-finite state"
            );
            return Err(SimulationError::NumericDomain {
                state: current,
                next,
                iteration,
            });
        }

        trajectory.push(next);

        if next.max_abs_diff(&current) < settings.tolerance {
            debug!(iterations = iteration, k = next.k, h = next.h, "simulation converged");
            return Ok(ConvergenceResult::Converged(trajectory));
        }

        current = next;
    }

    warn!(
        max_iterations = settings.max_iterations,
        k = current.k,
        h = current.h,
        "simulation did not converge"
    );
    Ok(ConvergenceResult::NotConverged(trajectory))
}

/// [`run`] with a tolerance of 1e-5 and at most 10 000 iterations.
pub fn run_default<M>(
    map: &M,
    initial: State,
    params: &ModelParameters,
) -> Result<ConvergenceResult, SimulationError>
where
    M: TransitionMap + ?Sized,
{
    run(map, initial, params, &SimulationSettings::default())
}
