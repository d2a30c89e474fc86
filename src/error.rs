//! Structured error types for xlgrid.
//!
//! Almost nothing in the grid engine can fail: coordinate walks clamp and
//! gesture commits degrade to no-ops. What remains lives here.

/// All errors that can surface from the grid engine.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The canvas refused to hand out a 2D context.
    #[error("Canvas has no 2D rendering context")]
    MissingContext,

    /// Malformed configuration or model JSON.
    #[error("Config: {0}")]
    Config(#[from] serde_json::Error),

    /// A call into the spreadsheet model failed.
    #[error("Model call failed: {0}")]
    Model(String),

    /// Rendering error.
    #[error("Render error: {0}")]
    Render(String),

    /// Unparseable A1-style reference.
    #[error("Invalid cell reference: {0}")]
    InvalidReference(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_convert_from_serde() {
        let err: GridError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, GridError::Config(_)));
        assert!(err.to_string().starts_with("Config:"));
    }

    #[test]
    fn string_errors_become_other() {
        let err: GridError = "boom".into();
        assert_eq!(err.to_string(), "boom");
    }
}
