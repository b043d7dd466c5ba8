/// Convenience result type used across dispmap.
pub type DispResult<T> = Result<T, DispError>;

/// Error taxonomy shared by the filter, the compositor and the preview driver.
#[derive(thiserror::Error, Debug)]
pub enum DispError {
    /// An input image is missing or cannot be decoded.
    #[error("load error: {0}")]
    Load(String),

    /// Pixel format or dimensions do not satisfy an operation's contract.
    #[error("format error: {0}")]
    Format(String),

    /// A caller-supplied parameter is outside its legal set.
    #[error("parameter error: {0}")]
    Parameter(String),

    /// Errors when reading or parsing a preset file.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DispError {
    /// Build a [`DispError::Load`] value.
    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    /// Build a [`DispError::Format`] value.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Build a [`DispError::Parameter`] value.
    pub fn parameter(msg: impl Into<String>) -> Self {
        Self::Parameter(msg.into())
    }

    /// Build a [`DispError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for failures that the preview binary reports with the startup exit status.
    pub fn is_startup_fatal(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Format(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
