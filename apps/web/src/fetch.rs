//! Executes [`FetchRequest`]s with the browser's `fetch`.

use rider_dash_core::api::Method;
use rider_dash_core::{ApiError, FetchOutcome, FetchRequest};
use serde_json::Value;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

fn describe(error: &JsValue) -> String {
    error.as_string().unwrap_or_else(|| format!("{error:?}"))
}

pub async fn execute(base: &str, request: &FetchRequest) -> FetchOutcome {
    match send(base, request).await {
        Ok(outcome) => outcome,
        Err(error) => FetchOutcome::Failed(ApiError::Transport(describe(&error))),
    }
}

async fn send(base: &str, request: &FetchRequest) -> Result<FetchOutcome, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;

    let opts = RequestInit::new();
    opts.set_mode(RequestMode::Cors);
    match &request.method {
        Method::Get => opts.set_method("GET"),
        Method::Post(body) => {
            opts.set_method("POST");
            let headers = Headers::new()?;
            headers.set("Content-Type", "application/json")?;
            opts.set_headers(&headers);
            if let Some(body) = body {
                opts.set_body(&JsValue::from_str(&body.to_string()));
            }
        }
    }

    let url = request.url(base);
    let js_request = Request::new_with_str_and_init(&url, &opts)?;
    let response: Response = JsFuture::from(window.fetch_with_request(&js_request))
        .await?
        .dyn_into()?;
    let code = response.status();

    if request.wants_raw_body() {
        let body = JsFuture::from(response.text()?)
            .await?
            .as_string()
            .unwrap_or_default();
        return Ok(FetchOutcome::Status { code, body });
    }

    if !response.ok() {
        log::debug!("{url}: status {code}");
        return Ok(FetchOutcome::Failed(ApiError::Status(code)));
    }

    let outcome = match JsFuture::from(response.json()?).await {
        Ok(json) => match serde_wasm_bindgen::from_value::<Value>(json) {
            Ok(value) => FetchOutcome::Json(value),
            Err(error) => FetchOutcome::Failed(ApiError::Decode(error.to_string())),
        },
        Err(error) => FetchOutcome::Failed(ApiError::Decode(describe(&error))),
    };
    Ok(outcome)
}
