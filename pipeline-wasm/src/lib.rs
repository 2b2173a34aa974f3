//! Bridge WASM <-> JavaScript trung lập framework.

use pipeline_core::{PipelineError, PipelineSettings, PipelineSnapshot};
use pipeline_dataview::{bundle_from_value, settings_from_value};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Dựng snapshot render được từ một update payload của host. `settings`
/// truyền riêng (nếu có) thay cho blob settings nằm trong payload.
#[wasm_bindgen]
pub fn build_snapshot(
    update_payload: JsValue,
    settings: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let payload_value = from_value::<serde_json::Value>(update_payload)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON payload: {err}")))?;

    let mut bundle = bundle_from_value(&payload_value)
        .map_err(|err| JsValue::from_str(&format_pipeline_error(err)))?;

    if let Some(js_settings) = settings {
        let raw = from_value::<serde_json::Value>(js_settings)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được settings: {err}")))?;
        bundle.settings = settings_from_value(Some(&raw));
    }

    let snapshot = PipelineSnapshot::build(&bundle.settings, bundle.records);

    to_value(&snapshot)
        .map_err(|err| JsValue::from_str(&format!("Không serialize snapshot: {err}")))
}

/// Liệt kê các bộ (object, property, value) cho khung property của host.
#[wasm_bindgen]
pub fn enumerate_settings(
    settings: Option<JsValue>,
    object_name: &str,
) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let resolved = match settings {
        Some(js_settings) => {
            let raw = from_value::<serde_json::Value>(js_settings)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được settings: {err}")))?;
            settings_from_value(Some(&raw))
        }
        None => PipelineSettings::default(),
    };

    to_value(&resolved.enumerate_properties(object_name))
        .map_err(|err| JsValue::from_str(&format!("Không serialize danh sách thuộc tính: {err}")))
}

fn format_pipeline_error(err: PipelineError) -> String {
    format!("Pipeline error: {err}")
}
