//! WASM bindings for `solow_core`.
//!
//! The frontend owns rendering and sliders; everything here converts between
//! `JsValue` and core types and forwards to the core library.

mod model;
mod series;

pub use model::WasmGrowthModel;
pub use series::{transform_series, WasmCategoryTable};
