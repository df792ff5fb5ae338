use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Invalid number in {attribute}: {value:?}")]
    InvalidNumber { attribute: String, value: String },

    #[error("Browser API error: {0}")]
    Js(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Audio unavailable: {0}")]
    AudioUnavailable(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        match value.as_string() {
            Some(message) => Error::Js(message),
            None => Error::Js(format!("{:?}", value)),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
