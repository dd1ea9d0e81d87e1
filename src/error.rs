use thiserror::Error;

/// User-facing conditions raised before or around a practice session.
///
/// None of these are fatal: each one leaves engine state untouched and is
/// shown to the user as a message or a disabled action.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PracticeError {
    /// Normalization left nothing (or too little) to type.
    #[error("Text content is too short or unsupported.")]
    EmptyContent,

    /// Confirm was attempted with no paragraphs chosen.
    #[error("Select at least one paragraph to practice.")]
    EmptySelection,

    /// Upstream extraction failed; the message is shown verbatim.
    #[error("{0}")]
    Extraction(String),
}

impl From<crate::extract::ExtractError> for PracticeError {
    fn from(err: crate::extract::ExtractError) -> Self {
        PracticeError::Extraction(err.to_string())
    }
}
