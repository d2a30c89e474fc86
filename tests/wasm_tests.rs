//! Browser-side checks, run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing, clippy::panic)]

use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use xlgrid::state::ActiveRange;
use xlgrid::types::CellArea;
use xlgrid::{GridConfig, GridError};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn version_is_exported() {
    assert_eq!(xlgrid::version(), env!("CARGO_PKG_VERSION"));
}

#[wasm_bindgen_test]
fn errors_cross_into_js() {
    let error = GridConfig::from_json("{not json").unwrap_err();
    assert!(matches!(error, GridError::Config(_)));
    let value = JsValue::from(error);
    assert!(value.as_string().is_some_and(|s| !s.is_empty()));
}

#[wasm_bindgen_test]
fn active_ranges_deserialize_from_js() {
    let json = r##"[{"sheet":0,"area":{"rowStart":2,"columnStart":2,"rowEnd":4,"columnEnd":3},"color":"#4F81BD"}]"##;
    let value = js_sys::JSON::parse(json).unwrap();
    let ranges: Vec<ActiveRange> = serde_wasm_bindgen::from_value(value).unwrap();
    assert_eq!(ranges[0].area, CellArea::from_corners(2, 2, 4, 3));
}
