//! Construction-time failures.
//!
//! Gameplay itself never fails: ignored clicks, missing speech support and
//! oversized rounds are handled in place. The errors below only come out of
//! building a pool, a config or the browser front end.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KarutaError {
    #[error("poem pool is empty")]
    EmptyPool,
    #[error("duplicate poem id {0} in pool")]
    DuplicatePoemId(u32),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[cfg(feature = "serde_json")]
    #[error("config is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("browser setup failed: {0}")]
    Dom(String),
}

impl From<KarutaError> for wasm_bindgen::JsValue {
    fn from(err: KarutaError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
