pub mod dto;
pub mod error;
pub mod language;
pub mod service;
pub mod speaker;

pub use dto::{SynthesizeRequest, VoiceInfo, VoicesResponse, DEFAULT_SPEAKER};
pub use error::SpeechServiceError;
pub use language::LanguageCode;
pub use service::{SpeechAudio, SpeechService, SpeechServiceApi};
pub use speaker::{SpeakerId, SpeakerMap};
