use crate::error::AppError;
use crate::infrastructure::engine::EngineError;

#[derive(Debug, thiserror::Error)]
pub enum SpeechServiceError {
    /// No voice model is loaded for the requested language code.
    /// The message is the exact text returned to the client.
    #[error("Language {0} not supported")]
    UnsupportedLanguage(String),
    #[error("{0}")]
    SpeakerResolution(String),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl From<SpeechServiceError> for AppError {
    fn from(err: SpeechServiceError) -> Self {
        match &err {
            SpeechServiceError::UnsupportedLanguage(_) => AppError::BadRequest(err.to_string()),
            SpeechServiceError::SpeakerResolution(_) | SpeechServiceError::Engine(_) => {
                AppError::Internal(err.to_string())
            }
        }
    }
}
