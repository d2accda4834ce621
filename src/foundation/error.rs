/// Convenience result type used across foldnote.
pub type FoldResult<T> = Result<T, FoldError>;

/// Top-level error taxonomy.
///
/// Conditions the core recovers from on its own (nodes not attached yet, a glyph layout computed
/// for an old message) never surface as errors; they are silent no-ops that retry later.
#[derive(thiserror::Error, Debug)]
pub enum FoldError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while building or driving an animation timeline.
    #[error("animation error: {0}")]
    Animation(String),

    /// Errors raised by the text measurement pass.
    #[error("layout error: {0}")]
    Layout(String),

    /// Faults raised by the render boundary (frame sinks).
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FoldError {
    /// Build a [`FoldError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FoldError::Animation`] value.
    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Build a [`FoldError::Layout`] value.
    pub fn layout(msg: impl Into<String>) -> Self {
        Self::Layout(msg.into())
    }

    /// Build a [`FoldError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`FoldError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FoldError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
