//! # pay-wasm
//!
//! WebAssembly bindings for dropin-cart.
//!
//! The checkout page uses these to pick the result page after an in-page
//! payment, with the same classification the server applies on redirect-return.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { classify_result_code, result_path, redirect_target } from '/pkg/pay_wasm.js';
//!
//! await init();
//!
//! classify_result_code('Received'); // "pending"
//! result_path('Refused');           // "/result/failed"
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web --out-dir ../../public/pkg
//! ```

use pay_core::{classify, PaymentResponse};
use wasm_bindgen::prelude::*;

/// Outcome bucket for a result code: `success`, `pending`, `failed` or `error`
#[wasm_bindgen]
pub fn classify_result_code(result_code: &str) -> String {
    classify(result_code).as_str().to_string()
}

/// Result page path for a result code
#[wasm_bindgen]
pub fn result_path(result_code: &str) -> String {
    classify(result_code).path().to_string()
}

/// Where to send the shopper after a `/api/initiatePayment` or
/// `/api/submitAdditionalDetails` response.
///
/// Returns `undefined` when the response carries an action the Drop-in must
/// handle first. Unparseable responses go to the error page.
#[wasm_bindgen]
pub fn redirect_target(response_json: &str) -> Option<String> {
    match serde_json::from_str::<PaymentResponse>(response_json) {
        Ok(response) if response.action.is_some() => None,
        Ok(response) => Some(response.bucket().path().to_string()),
        Err(_) => Some(classify("").path().to_string()),
    }
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
