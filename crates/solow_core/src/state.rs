use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Physical and human capital per effective unit of labor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    /// Physical capital per effective worker, k̃.
    pub k: f64,
    /// Human capital per effective worker, h̃.
    pub h: f64,
}

impl State {
    pub fn new(k: f64, h: f64) -> Self {
        Self { k, h }
    }

    pub fn is_finite(&self) -> bool {
        self.k.is_finite() && self.h.is_finite()
    }

    /// Largest absolute coordinate change between `self` and `other`.
    pub fn max_abs_diff(&self, other: &State) -> f64 {
        (self.k - other.k).abs().max((self.h - other.h).abs())
    }

    pub(crate) fn validate_initial(&self) -> Result<(), ParameterError> {
        if !self.is_finite() || self.k <= 0.0 || self.h <= 0.0 {
            return Err(ParameterError::InitialState {
                k: self.k,
                h: self.h,
            });
        }
        Ok(())
    }
}

impl From<[f64; 2]> for State {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<State> for [f64; 2] {
    fn from(value: State) -> Self {
        [value.k, value.h]
    }
}

/// States visited by the simulator, in iteration order.
/// Always starts at the initial state, so it is never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trajectory {
    states: Vec<State>,
}

impl Trajectory {
    pub(crate) fn new(initial: State) -> Self {
        Self {
            states: vec![initial],
        }
    }

    pub(crate) fn push(&mut self, state: State) {
        self.states.push(state);
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn initial(&self) -> State {
        self.states[0]
    }

    pub fn last(&self) -> State {
        self.states[self.states.len() - 1]
    }

    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Physical capital path, for plotting.
    pub fn capital(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.k).collect()
    }

    /// Human capital path, for plotting.
    pub fn human_capital(&self) -> Vec<f64> {
        self.states.iter().map(|s| s.h).collect()
    }

    pub fn into_states(self) -> Vec<State> {
        self.states
    }
}

/// Outcome of a simulation run. Both variants carry every state computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "trajectory", rename_all = "snake_case")]
pub enum ConvergenceResult {
    Converged(Trajectory),
    NotConverged(Trajectory),
}

impl ConvergenceResult {
    pub fn is_converged(&self) -> bool {
        matches!(self, ConvergenceResult::Converged(_))
    }

    pub fn trajectory(&self) -> &Trajectory {
        match self {
            ConvergenceResult::Converged(trajectory) | ConvergenceResult::NotConverged(trajectory) => {
                trajectory
            }
        }
    }

    pub fn into_trajectory(self) -> Trajectory {
        match self {
            ConvergenceResult::Converged(trajectory) | ConvergenceResult::NotConverged(trajectory) => {
                trajectory
            }
        }
    }

    pub fn final_state(&self) -> State {
        self.trajectory().last()
    }

    /// Number of map applications performed.
    pub fn iterations(&self) -> usize {
        self.trajectory().len() - 1
    }
}
