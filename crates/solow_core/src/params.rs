//! Model parameters and simulation settings.

use crate::error::ParameterError;
use serde::{Deserialize, Serialize};

/// Structural parameters of the Solow model with human capital.
///
/// Shares and rates are per period. `sigma` is only read by the CES technology.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Physical capital share, α.
    pub alpha: f64,
    /// Human capital share, φ.
    pub phi: f64,
    /// Elasticity of substitution, σ.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sigma: Option<f64>,
    /// Savings rate into physical capital.
    pub s_k: f64,
    /// Savings rate into human capital.
    pub s_h: f64,
    /// Depreciation rate, δ.
    pub delta: f64,
    /// Population growth rate.
    pub n: f64,
    /// Technology growth rate.
    pub g: f64,
}

impl ModelParameters {
    /// Builds a validated parameter set without an elasticity. Use
    /// [`with_sigma`](Self::with_sigma) to add one for the CES technology.
    pub fn new(
        alpha: f64,
        phi: f64,
        s_k: f64,
        s_h: f64,
        delta: f64,
        n: f64,
        g: f64,
    ) -> Result<Self, ParameterError> {
        let params = Self {
            alpha,
            phi,
            sigma: None,
            s_k,
            s_h,
            delta,
            n,
            g,
        };
        params.validate()?;
        Ok(params)
    }

    /// α = φ = 1/3, δ = 0.05, g = n = 0.02, s_K = 0.1, s_H = 0.15.
    pub fn standard() -> Self {
        Self {
            alpha: 1.0 / 3.0,
            phi: 1.0 / 3.0,
            sigma: None,
            s_k: 0.1,
            s_h: 0.15,
            delta: 0.05,
            n: 0.02,
            g: 0.02,
        }
    }

    /// σ is checked by [`validate_elasticity`](Self::validate_elasticity) when a
    /// CES map is run, since Cobb-Douglas callers never read it.
    pub fn with_sigma(self, sigma: f64) -> Self {
        Self {
            sigma: Some(sigma),
            ..self
        }
    }

    /// n + g + δ + n·g, the rate at which per-effective-worker stocks are diluted.
    pub fn adjustment_rate(&self) -> f64 {
        self.n + self.g + self.delta + self.n * self.g
    }

    /// (1 + n)(1 + g).
    pub fn growth_factor(&self) -> f64 {
        (1.0 + self.n) * (1.0 + self.g)
    }

    /// Share of raw labor, 1 − α − φ.
    pub fn labor_share(&self) -> f64 {
        1.0 - self.alpha - self.phi
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        let fields = [
            ("alpha", self.alpha),
            ("phi", self.phi),
            ("s_k", self.s_k),
            ("s_h", self.s_h),
            ("delta", self.delta),
            ("n", self.n),
            ("g", self.g),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(ParameterError::NonFinite { name, value });
            }
        }

        for (name, value) in [("s_k", self.s_k), ("s_h", self.s_h)] {
            if value <= 0.0 {
                return Err(ParameterError::SavingsRate { name, value });
            }
        }
        if self.s_k + self.s_h >= 1.0 {
            return Err(ParameterError::SavingsSum {
                s_k: self.s_k,
                s_h: self.s_h,
            });
        }

        for (name, value) in [("alpha", self.alpha), ("phi", self.phi)] {
            if value <= 0.0 {
                return Err(ParameterError::FactorShare { name, value });
            }
        }
        if self.alpha + self.phi >= 1.0 {
            return Err(ParameterError::FactorShareSum {
                alpha: self.alpha,
                phi: self.phi,
            });
        }

        let rate = self.adjustment_rate();
        if rate <= 0.0 {
            return Err(ParameterError::AdjustmentRate { rate });
        }

        Ok(())
    }

    /// Checks `sigma` for use with the CES technology.
    pub fn validate_elasticity(&self) -> Result<f64, ParameterError> {
        let sigma = self.sigma.ok_or(ParameterError::MissingElasticity)?;
        if !sigma.is_finite() || sigma <= 0.0 || sigma == 1.0 {
            return Err(ParameterError::Elasticity { sigma });
        }
        Ok(sigma)
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self::standard()
    }
}

/// Stopping rules for the convergence simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Both coordinates must move by less than this to count as converged.
    pub tolerance: f64,
    pub max_iterations: usize,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tolerance: 1e-5,
            max_iterations: 10_000,
        }
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), String> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(format!(
                "tolerance must be positive and finite, got {}",
                self.tolerance
            ));
        }
        if self.max_iterations == 0 {
            return Err("max_iterations must be greater than zero".to_string());
        }
        Ok(())
    }
}
