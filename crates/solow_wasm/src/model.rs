//! Growth model wrapper: simulation, steady states, stability and nullclines.

use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use solow_core::nullcline::{compute_nullclines, AxisSpec};
use solow_core::steady_state::{analyze_stability, solve_steady_state, NewtonSettings};
use solow_core::{
    run, steady_state, ConvergenceResult, ModelParameters, SimulationSettings, State, Technology,
};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmGrowthModel {
    params: ModelParameters,
}

/// Plot-ready simulation payload.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SimulationWire {
    pub converged: bool,
    pub iterations: usize,
    pub k: Vec<f64>,
    pub h: Vec<f64>,
}

impl From<ConvergenceResult> for SimulationWire {
    fn from(result: ConvergenceResult) -> Self {
        let converged = result.is_converged();
        let iterations = result.iterations();
        let trajectory = result.into_trajectory();
        Self {
            converged,
            iterations,
            k: trajectory.capital(),
            h: trajectory.human_capital(),
        }
    }
}

pub(crate) fn technology_from_name(name: &str) -> Result<Technology, String> {
    Technology::parse(name).ok_or_else(|| format!("Unknown technology: {}", name))
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn serialize<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| js_error("Serialization error", e))
}

#[wasm_bindgen]
impl WasmGrowthModel {
    #[wasm_bindgen(constructor)]
    pub fn new(params_val: JsValue) -> Result<WasmGrowthModel, JsValue> {
        console_error_panic_hook::set_once();

        let params = parse_parameters(params_val)?;
        Ok(WasmGrowthModel { params })
    }

    /// α = φ = 1/3, δ = 0.05, g = n = 0.02, s_K = 0.1, s_H = 0.15.
    pub fn standard() -> WasmGrowthModel {
        console_error_panic_hook::set_once();
        WasmGrowthModel {
            params: ModelParameters::standard(),
        }
    }

    pub fn set_parameters(&mut self, params_val: JsValue) -> Result<(), JsValue> {
        self.params = parse_parameters(params_val)?;
        Ok(())
    }

    pub fn get_parameters(&self) -> Result<JsValue, JsValue> {
        serialize(&self.params)
    }

    /// Runs the convergence simulator. `settings_val` may be `undefined` for the defaults.
    pub fn simulate(
        &self,
        technology: &str,
        k0: f64,
        h0: f64,
        settings_val: JsValue,
    ) -> Result<JsValue, JsValue> {
        let technology = technology_from_name(technology).map_err(|e| JsValue::from_str(&e))?;
        let settings: SimulationSettings = if settings_val.is_undefined() || settings_val.is_null()
        {
            SimulationSettings::default()
        } else {
            from_value(settings_val).map_err(|e| js_error("Invalid simulation settings", e))?
        };

        let result = run(&technology, State::new(k0, h0), &self.params, &settings)
            .map_err(|e| js_error("Simulation failed", e))?;
        serialize(&SimulationWire::from(result))
    }

    /// Closed-form Cobb-Douglas steady state.
    pub fn steady_state(&self) -> Result<JsValue, JsValue> {
        let state = steady_state(&self.params).map_err(|e| js_error("Steady state failed", e))?;
        serialize(&state)
    }

    pub fn solve_steady_state(
        &self,
        technology: &str,
        guess_k: f64,
        guess_h: f64,
        max_steps: u32,
        damping: f64,
    ) -> Result<JsValue, JsValue> {
        let technology = technology_from_name(technology).map_err(|e| JsValue::from_str(&e))?;
        let settings = NewtonSettings {
            max_steps: max_steps as usize,
            damping,
            ..NewtonSettings::default()
        };

        let result = solve_steady_state(
            technology,
            &self.params,
            State::new(guess_k, guess_h),
            settings,
        )
        .map_err(|e| JsValue::from_str(&format!("Steady state solve failed: {:#}", e)))?;
        serialize(&result)
    }

    pub fn stability(&self, technology: &str, k: f64, h: f64) -> Result<JsValue, JsValue> {
        let technology = technology_from_name(technology).map_err(|e| JsValue::from_str(&e))?;
        let report = analyze_stability(technology, &self.params, State::new(k, h))
            .map_err(|e| JsValue::from_str(&format!("Stability analysis failed: {:#}", e)))?;
        serialize(&report)
    }

    pub fn nullclines(&self, technology: &str, axis_val: JsValue) -> Result<JsValue, JsValue> {
        let technology = technology_from_name(technology).map_err(|e| JsValue::from_str(&e))?;
        let axis: AxisSpec =
            from_value(axis_val).map_err(|e| js_error("Invalid axis specification", e))?;
        let lines = compute_nullclines(technology, &self.params, &axis)
            .map_err(|e| JsValue::from_str(&format!("Nullcline computation failed: {:#}", e)))?;
        serialize(&lines)
    }
}

fn parse_parameters(params_val: JsValue) -> Result<ModelParameters, JsValue> {
    let params: ModelParameters =
        from_value(params_val).map_err(|e| js_error("Invalid model parameters", e))?;
    params
        .validate()
        .map_err(|e| js_error("Invalid model parameters", e))?;
    Ok(params)
}


// These go through JsValue, so they only run under wasm-bindgen-test.
#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::{SimulationWire, WasmGrowthModel};
    use serde_wasm_bindgen::{from_value, to_value};
    use solow_core::nullcline::{AxisSpec, Nullclines};
    use solow_core::{ModelParameters, State};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    #[wasm_bindgen_test]
    fn constructor_rejects_invalid_parameters() {
        let params = ModelParameters {
            s_k: 0.6,
            s_h: 0.5,
            ..ModelParameters::standard()
        };
        let result = WasmGrowthModel::new(to_value(&params).expect("params"));
        let message = result
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("Invalid model parameters"));
    }

    #[wasm_bindgen_test]
    fn simulate_returns_plot_ready_paths() {
        let model = WasmGrowthModel::standard();
        let value = model
            .simulate("cobb_douglas", 1.0, 1.0, JsValue::UNDEFINED)
            .expect("simulate");
        let wire: SimulationWire = from_value(value).expect("wire");

        assert!(wire.converged);
        assert_eq!(wire.k.len(), wire.iterations + 1);
        assert_eq!(wire.h.len(), wire.k.len());
        assert_eq!(wire.k[0], 1.0);
    }

    #[wasm_bindgen_test]
    fn simulate_reports_missing_sigma() {
        let model = WasmGrowthModel::standard();
        let message = model
            .simulate("ces", 1.0, 1.0, JsValue::UNDEFINED)
            .err()
            .and_then(|err| err.as_string())
            .unwrap_or_default();
        assert!(message.contains("Simulation failed"));
        assert!(message.contains("sigma"));
    }

    #[wasm_bindgen_test]
    fn steady_state_and_nullclines_agree() {
        let model = WasmGrowthModel::standard();
        let star: State = from_value(model.steady_state().expect("steady state")).expect("state");

        let axis = AxisSpec {
            min: star.k,
            max: star.k * 2.0,
            samples: 2,
        };
        let lines: Nullclines = from_value(
            model
                .nullclines("cobb_douglas", to_value(&axis).expect("axis"))
                .expect("nullclines"),
        )
        .expect("lines");
        let h = lines.capital[0].expect("root");
        assert!((h - star.h).abs() < 1e-8);
    }
}
