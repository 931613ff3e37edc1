use crate::{
    autodiff::jacobian,
    error::ParameterError,
    params::ModelParameters,
    production::{GrowthSystem, Technology, TransitionMap},
    state::State,
};
use anyhow::{anyhow, bail, Context, Result};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Closed-form Cobb-Douglas steady state:
///
/// k̃* = (s_K^(1−φ) s_H^φ / a)^(1/(1−α−φ)),  h̃* = (s_K^α s_H^(1−α) / a)^(1/(1−α−φ)),
///
/// with a = n + g + δ + ng.
pub fn steady_state(params: &ModelParameters) -> Result<State, ParameterError> {
    params.validate()?;
    let rate = params.adjustment_rate();
    let exponent = 1.0 / params.labor_share();
    let k = (params.s_k.powf(1.0 - params.phi) * params.s_h.powf(params.phi) / rate).powf(exponent);
    let h =
        (params.s_k.powf(params.alpha) * params.s_h.powf(1.0 - params.alpha) / rate).powf(exponent);
    Ok(State::new(k, h))
}

/// Steady-state output per effective worker under Cobb-Douglas technology.
pub fn steady_state_output(params: &ModelParameters) -> Result<f64, ParameterError> {
    let state = steady_state(params)?;
    Ok(Technology::CobbDouglas.output(state.k, state.h, params))
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NewtonSettings {
    pub max_steps: usize,
    pub damping: f64,
    pub tolerance: f64,
}

impl Default for NewtonSettings {
    fn default() -> Self {
        Self {
            max_steps: 25,
            damping: 1.0,
            tolerance: 1e-9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SteadyStateResult {
    pub state: State,
    pub residual_norm: f64,
    pub iterations: usize,
}

/// Finds a fixed point of the technology's law of motion with Newton's method on
/// F(x) = f(x) − x. Works for CES, where no closed form is used.
pub fn solve_steady_state(
    technology: Technology,
    params: &ModelParameters,
    initial_guess: State,
    settings: NewtonSettings,
) -> Result<SteadyStateResult> {
    params.validate().context("Invalid model parameters.")?;
    technology
        .validate(params)
        .context("Invalid model parameters.")?;
    if settings.max_steps == 0 {
        bail!("max_steps must be greater than zero.");
    }
    if !settings.damping.is_finite() || settings.damping <= 0.0 {
        bail!("damping must be positive and finite.");
    }
    if !settings.tolerance.is_finite() || settings.tolerance <= 0.0 {
        bail!("tolerance must be positive and finite.");
    }
    if !initial_guess.is_finite() || initial_guess.k <= 0.0 || initial_guess.h <= 0.0 {
        bail!(
            "Initial guess must be positive, got ({}, {}).",
            initial_guess.k,
            initial_guess.h
        );
    }

    let system = GrowthSystem::new(technology, *params);
    let mut state: [f64; 2] = initial_guess.into();
    let mut residual = evaluate_residual(&system, &state);
    let mut residual_norm = l2_norm(&residual);
    let mut iterations = 0usize;

    loop {
        if !residual_norm.is_finite() {
            bail!(
                "Residual is not finite at ({}, {}).",
                state[0],
                state[1]
            );
        }
        if residual_norm <= settings.tolerance {
            break;
        }

        if iterations >= settings.max_steps {
            bail!(
                "Newton solver failed to converge in {} steps (‖f(x) − x‖ = {}).",
                settings.max_steps,
                residual_norm
            );
        }

        let jac = fixed_point_jacobian(&system, &state);
        let delta = solve_linear_system(&jac, &residual)
            .context("Failed to solve linear system during Newton iteration.")?;

        for i in 0..2 {
            state[i] -= settings.damping * delta[i];
        }
        if state[0] <= 0.0 || state[1] <= 0.0 {
            bail!(
                "Newton iterate left the positive orthant at ({}, {}); try a closer guess or more damping.",
                state[0],
                state[1]
            );
        }

        iterations += 1;
        residual = evaluate_residual(&system, &state);
        residual_norm = l2_norm(&residual);
        debug!(iterations, residual_norm, "newton step");
    }

    Ok(SteadyStateResult {
        state: state.into(),
        residual_norm,
        iterations,
    })
}

fn evaluate_residual(system: &GrowthSystem, state: &[f64; 2]) -> [f64; 2] {
    let next = system
        .technology
        .transition(State::from(*state), &system.params);
    [next.k - state[0], next.h - state[1]]
}

/// Jacobian of f(x) − x, row-major.
fn fixed_point_jacobian(system: &GrowthSystem, state: &[f64; 2]) -> Vec<f64> {
    let mut jac = jacobian(system, state);
    jac[0] -= 1.0;
    jac[3] -= 1.0;
    jac
}

fn solve_linear_system(jacobian: &[f64], residual: &[f64; 2]) -> Result<Vec<f64>> {
    let j_matrix = DMatrix::from_row_slice(2, 2, jacobian);
    let rhs = DVector::from_column_slice(residual);
    j_matrix
        .lu()
        .solve(&rhs)
        .map(|v| v.iter().cloned().collect())
        .ok_or_else(|| anyhow!("Jacobian is singular."))
}

fn l2_norm(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stability {
    /// Every eigenvalue lies strictly inside the unit circle.
    Stable,
    /// Some eigenvalue lies on the unit circle, within tolerance.
    Marginal,
    Unstable,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StabilityReport {
    pub state: State,
    /// Jacobian of the map, row-major.
    pub jacobian: Vec<f64>,
    pub eigenvalues: Vec<Complex<f64>>,
    pub spectral_radius: f64,
    pub stability: Stability,
    /// Periods for the slowest mode to halve its distance to the steady state.
    pub half_life: Option<f64>,
}

const UNIT_CIRCLE_TOLERANCE: f64 = 1e-9;

/// Linearizes the law of motion at `state` and classifies it by the spectral
/// radius of the Jacobian.
pub fn analyze_stability(
    technology: Technology,
    params: &ModelParameters,
    state: State,
) -> Result<StabilityReport> {
    params.validate().context("Invalid model parameters.")?;
    technology
        .validate(params)
        .context("Invalid model parameters.")?;
    if !state.is_finite() {
        bail!("State must be finite.");
    }

    let system = GrowthSystem::new(technology, *params);
    let point: [f64; 2] = state.into();
    let jac = jacobian(&system, &point);
    if jac.iter().any(|v| !v.is_finite()) {
        bail!(
            "Jacobian is not finite at ({}, {}).",
            state.k,
            state.h
        );
    }

    let matrix = DMatrix::from_row_slice(2, 2, &jac);
    let eigenvalues: Vec<Complex<f64>> = matrix.complex_eigenvalues().iter().cloned().collect();
    let spectral_radius = eigenvalues
        .iter()
        .map(|lambda| lambda.norm())
        .fold(0.0, f64::max);

    let stability = if (spectral_radius - 1.0).abs() <= UNIT_CIRCLE_TOLERANCE {
        Stability::Marginal
    } else if spectral_radius < 1.0 {
        Stability::Stable
    } else {
        Stability::Unstable
    };
    let half_life = match stability {
        Stability::Stable if spectral_radius > 0.0 => Some(0.5f64.ln() / spectral_radius.ln()),
        _ => None,
    };

    Ok(StabilityReport {
        state,
        jacobian: jac,
        eigenvalues,
        spectral_radius,
        stability,
        half_life,
    })
}
