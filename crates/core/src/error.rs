use thiserror::Error;

/// The only failures the extraction boundary reports. Fields that simply
/// could not be found are expressed as sentinels, never as errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("The document contains no extractable text.")]
    EmptyInput,
    #[error("Failed to decode document: {0}")]
    DecodeFailure(String),
}

impl ExtractError {
    /// Whether the caller sent something unusable (400) rather than the
    /// service failing to process it (500).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ExtractError::EmptyInput)
    }
}
