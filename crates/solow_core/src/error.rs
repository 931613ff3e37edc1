use crate::state::State;
use thiserror::Error;

/// A violated invariant on model parameters or initial conditions.
/// Raised before any iteration takes place.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("parameter {name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("savings rate {name} must be positive, got {value}")]
    SavingsRate { name: &'static str, value: f64 },

    #[error("savings rates must sum to less than one (s_k = {s_k}, s_h = {s_h})")]
    SavingsSum { s_k: f64, s_h: f64 },

    #[error("factor share {name} must be positive, got {value}")]
    FactorShare { name: &'static str, value: f64 },

    #[error("factor shares must sum to less than one (alpha = {alpha}, phi = {phi})")]
    FactorShareSum { alpha: f64, phi: f64 },

    #[error("n + g + delta + n*g must be positive, got {rate}")]
    AdjustmentRate { rate: f64 },

    #[error("CES technology requires an elasticity of substitution sigma")]
    MissingElasticity,

    #[error("elasticity of substitution must be positive, finite and different from one, got {sigma}")]
    Elasticity { sigma: f64 },

    #[error("initial state must be finite and positive (k = {k}, h = {h})")]
    InitialState { k: f64, h: f64 },
}

/// Failure modes of the convergence simulator.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("invalid simulation settings: {reason}")]
    InvalidSettings { reason: String },

    /// `state` is the last finite state; applying the map to it at step
    /// `iteration` produced `next`.
    #[error(
        "transition map left the numeric domain at iteration {iteration}: (k = {}, h = {}) -> (k = {}, h = {})",
        .state.k, .state.h, .next.k, .next.h
    )]
    NumericDomain {
        state: State,
        next: State,
        iteration: usize,
    },
}
