//! Structured error types for tripane.
//!
//! Replaces `Result<T, String>` throughout the codebase with proper error types.

/// All errors that can occur while building or driving the grid.
#[derive(Debug, thiserror::Error)]
pub enum TripaneError {
    /// A required DOM node could not be found or created.
    #[error("DOM: {0}")]
    Dom(String),

    /// Invalid options passed at construction or reconfiguration.
    #[error("Invalid options: {0}")]
    Options(String),

    /// Invalid column definitions.
    #[error("Invalid columns: {0}")]
    Columns(String),

    /// Event payload serialization failure.
    #[error("Serialization: {0}")]
    Serialize(String),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TripaneError>;

impl From<String> for TripaneError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for TripaneError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<TripaneError> for wasm_bindgen::JsValue {
    fn from(e: TripaneError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
