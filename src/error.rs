use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid config json: {0}")]
    Config(#[from] serde_json::Error),

    #[error("config field `{field}` out of range: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("failed to load model: {0}")]
    Model(#[from] gltf::Error),

    #[error("model has no usable geometry: {0}")]
    EmptyModel(&'static str),

    #[error("model has {0} vertices, more than 16-bit indices can address")]
    ModelTooLarge(usize),

    #[error("webgl: {0}")]
    Graphics(String),

    #[error("missing dom element `{0}`")]
    Dom(&'static str),

    #[error("browser call failed: {0}")]
    Js(String),
}

impl GameError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        GameError::InvalidConfig { field, reason: reason.into() }
    }

    /// Wraps an error thrown by a browser API.
    pub fn js(value: JsValue) -> Self {
        GameError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
