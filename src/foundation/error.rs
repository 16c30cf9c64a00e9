/// Convenience result type used across packshot.
pub type PackshotResult<T> = Result<T, PackshotError>;

/// Top-level error taxonomy used by packshot APIs.
///
/// Expected failure paths (stale loads, missing live surface, unsupported delivery targets) are
/// reported through outcome values instead; these variants cover genuine errors.
#[derive(thiserror::Error, Debug)]
pub enum PackshotError {
    /// Invalid user-provided parameters or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors while rasterizing a composition.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while fetching or decoding a product photo.
    #[error("decode error: {0}")]
    Decode(String),

    /// Errors while encoding an exported image.
    #[error("encode error: {0}")]
    Encode(String),

    /// Errors raised by a delivery target.
    #[error("delivery error: {0}")]
    Delivery(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PackshotError {
    /// Build a [`PackshotError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PackshotError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`PackshotError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PackshotError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`PackshotError::Delivery`] value.
    pub fn delivery(msg: impl Into<String>) -> Self {
        Self::Delivery(msg.into())
    }

    /// Build a [`PackshotError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for PackshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
