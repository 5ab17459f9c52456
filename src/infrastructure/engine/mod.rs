pub mod piper;
pub mod registry;

pub use piper::PiperVoice;
pub use registry::ModelRegistry;

use async_trait::async_trait;

use crate::domain::speech::{LanguageCode, SpeakerId, SpeakerMap};

/// Failures raised by voice model loading and synthesis
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("voice model not found: {0}")]
    ModelNotFound(String),

    #[error("invalid voice config {path}: {reason}")]
    InvalidConfig { path: String, reason: String },

    #[error("synthesis process failed to run: {0}")]
    Process(#[from] std::io::Error),

    #[error("synthesis failed: {0}")]
    Synthesis(String),

    #[error("synthesis produced no audio")]
    EmptyAudio,

    #[error("speed {0} is out of range")]
    InvalidSpeed(f32),
}

/// A loaded text-to-speech model for one language.
/// Abstracts the underlying synthesis engine.
///
/// Implementations are responsible for:
/// - Exposing the model's speaker table (name to numeric id)
/// - Rendering text into a complete in-memory WAV file
/// - Applying the speed factor (1.0 is normal speed)
#[async_trait]
pub trait SpeechModel: Send + Sync {
    /// The language this model was loaded for
    fn language(&self) -> LanguageCode;

    /// Voice name the model was loaded from
    fn voice_name(&self) -> &str;

    /// Output sample rate in Hz
    fn sample_rate(&self) -> u32;

    /// The model's speaker table
    fn speakers(&self) -> &SpeakerMap;

    /// Speaker the model falls back to when a requested name is unknown
    fn default_speaker(&self) -> Option<&str>;

    /// Synthesize text with the given speaker and speed
    ///
    /// Returns a complete WAV file ready to stream to the client
    ///
    /// # Errors
    /// Returns an error if the synthesis process fails or produces no audio
    async fn synthesize(
        &self,
        text: &str,
        speaker: SpeakerId,
        speed: f32,
    ) -> Result<Vec<u8>, EngineError>;
}
