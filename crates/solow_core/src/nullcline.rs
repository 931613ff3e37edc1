//! Δk̃ = 0 and Δh̃ = 0 loci for phase diagrams.

use crate::{
    params::ModelParameters,
    production::{Technology, TransitionMap},
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    pub min: f64,
    pub max: f64,
    pub samples: usize,
}

impl AxisSpec {
    fn values(&self) -> Vec<f64> {
        let step = (self.max - self.min) / (self.samples - 1) as f64;
        (0..self.samples)
            .map(|i| self.min + step * i as f64)
            .collect()
    }
}

/// Sampled nullclines over a k̃ axis. `None` marks a k̃ with no positive h̃ on the locus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nullclines {
    pub k: Vec<f64>,
    /// h̃ such that k̃ is unchanged.
    pub capital: Vec<Option<f64>>,
    /// h̃ such that h̃ is unchanged.
    pub human_capital: Vec<Option<f64>>,
}

pub fn compute_nullclines(
    technology: Technology,
    params: &ModelParameters,
    axis: &AxisSpec,
) -> Result<Nullclines> {
    params.validate().context("Invalid model parameters.")?;
    technology
        .validate(params)
        .context("Invalid model parameters.")?;
    if !axis.min.is_finite() || !axis.max.is_finite() || axis.max <= axis.min {
        bail!("Axis range must be finite with max > min.");
    }
    if axis.min <= 0.0 {
        bail!("Axis must start at a positive capital stock.");
    }
    if axis.samples < 2 {
        bail!("Axis needs at least 2 samples.");
    }

    let k = axis.values();
    let capital = k
        .iter()
        .map(|&k| bisect_positive(|h| technology.capital_gap(k, h, params), k))
        .collect();
    let human_capital = k
        .iter()
        .map(|&k| bisect_positive(|h| technology.human_capital_gap(k, h, params), k))
        .collect();

    Ok(Nullclines {
        k,
        capital,
        human_capital,
    })
}

const LOWER_BOUND: f64 = 1e-12;
const UPPER_LIMIT: f64 = 1e12;
const MAX_BISECTIONS: usize = 200;

/// Finds a positive root of `f` by growing an upper bracket from `scale` and bisecting.
fn bisect_positive(f: impl Fn(f64) -> f64, scale: f64) -> Option<f64> {
    let mut left = LOWER_BOUND;
    let left_value = f(left);
    if !left_value.is_finite() {
        return None;
    }
    if left_value == 0.0 {
        return Some(left);
    }

    let mut right = scale.max(1.0);
    let mut right_value = f(right);
    while right_value.is_finite() && right_value.signum() == left_value.signum() {
        if right >= UPPER_LIMIT {
            return None;
        }
        right *= 2.0;
        right_value = f(right);
    }
    if !right_value.is_finite() {
        return None;
    }

    let left_sign = left_value.signum();
    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (left + right);
        let mid_value = f(mid);
        if !mid_value.is_finite() {
            return None;
        }
        if mid_value == 0.0 || (right - left) <= 1e-14 * mid.max(1.0) {
            return Some(mid);
        }
        if mid_value.signum() == left_sign {
            left = mid;
        } else {
            right = mid;
        }
    }
    Some(0.5 * (left + right))
}

#[cfg(test)]
mod tests {
    use super::{bisect_positive, compute_nullclines, AxisSpec};
    use crate::params::ModelParameters;
    use crate::production::Technology;
    use crate::steady_state::steady_state;
    use approx::assert_relative_eq;

    fn assert_err_contains<T: std::fmt::Debug>(result: anyhow::Result<T>, needle: &str) {
        let err = result.expect_err("expected error");
        let message = format!("{err:#}");
        assert!(
            message.contains(needle),
            "expected error to contain \"{needle}\", got \"{message}\""
        );
    }

    #[test]
    fn cobb_douglas_nullclines_match_closed_forms() {
        let params = ModelParameters::standard();
        let axis = AxisSpec {
            min: 0.5,
            max: 4.0,
            samples: 8,
        };
        let lines =
            compute_nullclines(Technology::CobbDouglas, &params, &axis).expect("nullclines");
        assert_eq!(lines.k.len(), 8);
        assert_relative_eq!(lines.k[0], 0.5);
        assert_relative_eq!(lines.k[7], 4.0);

        let a = params.adjustment_rate();
        for (i, &k) in lines.k.iter().enumerate() {
            let capital = (a * k.powf(1.0 - params.alpha) / params.s_k).powf(1.0 / params.phi);
            let human = (params.s_h * k.powf(params.alpha) / a).powf(1.0 / (1.0 - params.phi));
            assert_relative_eq!(lines.capital[i].expect("root"), capital, max_relative = 1e-9);
            assert_relative_eq!(
                lines.human_capital[i].expect("root"),
                human,
                max_relative = 1e-9
            );
        }
    }

    #[test]
    fn nullclines_cross_at_steady_state() {
        let params = ModelParameters::standard();
        let star = steady_state(&params).expect("steady state");
        let axis = AxisSpec {
            min: star.k,
            max: star.k + 1.0,
            samples: 2,
        };
        let lines =
            compute_nullclines(Technology::CobbDouglas, &params, &axis).expect("nullclines");
        assert_relative_eq!(lines.capital[0].expect("root"), star.h, max_relative = 1e-9);
        assert_relative_eq!(lines.human_capital[0].expect("root"), star.h, max_relative = 1e-9);
    }

    #[test]
    fn ces_nullclines_are_computed() {
        let params = ModelParameters::standard().with_sigma(0.5);
        let axis = AxisSpec {
            min: 0.5,
            max: 3.0,
            samples: 6,
        };
        let lines = compute_nullclines(Technology::Ces, &params, &axis).expect("nullclines");
        assert_eq!(lines.human_capital.len(), 6);
        assert!(lines.human_capital.iter().all(Option::is_some));
    }

    #[test]
    fn bisection_reports_missing_roots() {
        assert_eq!(bisect_positive(|h| h + 1.0, 1.0), None);
        let root = bisect_positive(|h| h * h - 2.0, 1.0).expect("root");
        assert_relative_eq!(root, 2f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn rejects_invalid_axes() {
        let params = ModelParameters::standard();
        assert_err_contains(
            compute_nullclines(
                Technology::CobbDouglas,
                &params,
                &AxisSpec {
                    min: 1.0,
                    max: 1.0,
                    samples: 4,
                },
            ),
            "max > min",
        );
        assert_err_contains(
            compute_nullclines(
                Technology::CobbDouglas,
                &params,
                &AxisSpec {
                    min: 0.0,
                    max: 1.0,
                    samples: 4,
                },
            ),
            "positive",
        );
        assert_err_contains(
            compute_nullclines(
                Technology::CobbDouglas,
                &params,
                &AxisSpec {
                    min: 0.1,
                    max: 1.0,
                    samples: 1,
                },
            ),
            "2 samples",
        );
        assert_err_contains(
            compute_nullclines(
                Technology::Ces,
                &params,
                &AxisSpec {
                    min: 0.1,
                    max: 1.0,
                    samples: 4,
                },
            ),
            "sigma",
        );
    }
}
