use js_sys::Reflect;
use rider_dash_core::config::resolve_api_base;
use rider_dash_core::DashboardConfig;
use wasm_bindgen::JsValue;

/// Global the hosting page may set before the module loads.
pub const API_URL_GLOBAL: &str = "__API_URL__";

fn runtime_override() -> Option<String> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(API_URL_GLOBAL))
        .ok()?
        .as_string()
}

pub fn load() -> DashboardConfig {
    let api_base = resolve_api_base(
        option_env!("RIDER_DASH_API_URL"),
        runtime_override().as_deref(),
    );
    DashboardConfig::new(api_base)
}
