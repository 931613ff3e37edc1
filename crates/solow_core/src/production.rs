//! Production technologies and the laws of motion they induce.

use crate::error::ParameterError;
use crate::params::ModelParameters;
use crate::state::State;
use crate::traits::{DynamicalSystem, Scalar};
use serde::{Deserialize, Serialize};

/// A one-step map from the current state to the next.
///
/// Closures `Fn(State, &ModelParameters) -> State` implement this directly.
pub trait TransitionMap {
    /// Extra parameter requirements of this map, on top of `ModelParameters::validate`.
    fn validate(&self, _params: &ModelParameters) -> Result<(), ParameterError> {
        Ok(())
    }

    fn transition(&self, state: State, params: &ModelParameters) -> State;
}

impl<F> TransitionMap for F
where
    F: Fn(State, &ModelParameters) -> State,
{
    fn transition(&self, state: State, params: &ModelParameters) -> State {
        self(state, params)
    }
}

/// Production function used to produce output per effective worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technology {
    /// ỹ = k̃^α h̃^φ
    CobbDouglas,
    /// ỹ = [α k̃^ρ + φ h̃^ρ + (1 − α − φ)]^(1/ρ), ρ = (σ − 1)/σ
    Ces,
}

impl Technology {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "cobb_douglas" | "cobb-douglas" | "cd" => Some(Technology::CobbDouglas),
            "ces" => Some(Technology::Ces),
            _ => None,
        }
    }

    /// Output per effective worker.
    pub fn output<T: Scalar>(&self, k: T, h: T, params: &ModelParameters) -> T {
        match self {
            Technology::CobbDouglas => k.powf(params.alpha) * h.powf(params.phi),
            Technology::Ces => {
                // Unchecked sigma turns into NaN and surfaces as a numeric-domain failure.
                let sigma = params.sigma.unwrap_or(f64::NAN);
                let rho = (sigma - 1.0) / sigma;
                let z = T::constant(params.alpha) * k.powf(rho)
                    + T::constant(params.phi) * h.powf(rho)
                    + T::constant(params.labor_share());
                z.powf(1.0 / rho)
            }
        }
    }

    /// Applies the law of motion once:
    /// x' = x + [s_x ỹ − (n + g + δ + ng) x] / [(1 + n)(1 + g)] for x ∈ {k̃, h̃}.
    pub fn advance<T: Scalar>(&self, k: T, h: T, params: &ModelParameters) -> (T, T) {
        let y = self.output(k, h, params);
        let rate = T::constant(params.adjustment_rate());
        let growth = T::constant(params.growth_factor());
        let k_next = k + (T::constant(params.s_k) * y - rate * k) / growth;
        let h_next = h + (T::constant(params.s_h) * y - rate * h) / growth;
        (k_next, h_next)
    }

    /// Change in k̃ over one period, scaled by (1 + n)(1 + g).
    pub(crate) fn capital_gap(&self, k: f64, h: f64, params: &ModelParameters) -> f64 {
        params.s_k * self.output(k, h, params) - params.adjustment_rate() * k
    }

    /// Change in h̃ over one period, scaled by (1 + n)(1 + g).
    pub(crate) fn human_capital_gap(&self, k: f64, h: f64, params: &ModelParameters) -> f64 {
        params.s_h * self.output(k, h, params) - params.adjustment_rate() * h
    }
}

impl TransitionMap for Technology {
    fn validate(&self, params: &ModelParameters) -> Result<(), ParameterError> {
        match self {
            Technology::CobbDouglas => Ok(()),
            Technology::Ces => params.validate_elasticity().map(|_| ()),
        }
    }

    fn transition(&self, state: State, params: &ModelParameters) -> State {
        let (k, h) = self.advance(state.k, state.h, params);
        State::new(k, h)
    }
}

/// A technology bound to its parameters, viewed as a two-dimensional map.
#[derive(Debug, Clone, Copy)]
pub struct GrowthSystem {
    pub technology: Technology,
    pub params: ModelParameters,
}

impl GrowthSystem {
    pub fn new(technology: Technology, params: ModelParameters) -> Self {
        Self { technology, params }
    }
}

impl<T: Scalar> DynamicalSystem<T> for GrowthSystem {
    fn dimension(&self) -> usize {
        2
    }

    fn apply(&self, x: &[T], out: &mut [T]) {
        let (k, h) = self.technology.advance(x[0], x[1], &self.params);
        out[0] = k;
        out[1] = h;
    }
}
