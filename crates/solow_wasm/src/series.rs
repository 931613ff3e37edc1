//! Time-series transforms for the data-exploration view.

use serde_wasm_bindgen::to_value;
use solow_core::series::{CategoryTable, TimeSeries};
use wasm_bindgen::prelude::*;

/// Computes the six named transforms and the summary of one series.
#[wasm_bindgen]
pub fn transform_series(periods: Vec<String>, values: Vec<f64>) -> Result<JsValue, JsValue> {
    let series = TimeSeries::new(periods, values)
        .map_err(|e| JsValue::from_str(&format!("Invalid series: {}", e)))?;
    let payload = SeriesPayload::from(&series);
    to_value(&payload).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[derive(serde::Serialize)]
struct SeriesPayload {
    summary: solow_core::series::Summary,
    transforms: solow_core::series::SeriesTransforms,
}

impl From<&TimeSeries> for SeriesPayload {
    fn from(series: &TimeSeries) -> Self {
        Self {
            summary: series.summary(),
            transforms: series.transforms(),
        }
    }
}

/// One series per category, filled in by the frontend after it fetches the data.
#[wasm_bindgen]
#[derive(Default)]
pub struct WasmCategoryTable {
    table: CategoryTable,
}

#[wasm_bindgen]
impl WasmCategoryTable {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmCategoryTable {
        console_error_panic_hook::set_once();
        WasmCategoryTable::default()
    }

    pub fn insert(
        &mut self,
        category: String,
        periods: Vec<String>,
        values: Vec<f64>,
    ) -> Result<(), JsValue> {
        let series = TimeSeries::new(periods, values)
            .map_err(|e| JsValue::from_str(&format!("Invalid series for {}: {}", category, e)))?;
        self.table.insert(category, series);
        Ok(())
    }

    pub fn categories(&self) -> Vec<String> {
        self.table.names().map(str::to_string).collect()
    }

    pub fn transform(&self, category: &str) -> Result<JsValue, JsValue> {
        let series = self
            .table
            .get(category)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_value(&SeriesPayload::from(series))
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
    }
}
