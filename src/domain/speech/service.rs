use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;

use super::dto::{SynthesizeRequest, VoiceInfo, VoicesResponse, DEFAULT_SPEAKER};
use super::error::SpeechServiceError;
use super::language::LanguageCode;
use super::speaker::SpeakerId;
use crate::infrastructure::engine::{ModelRegistry, SpeechModel};

/// Synthesized audio along with the metadata the HTTP layer reports back
#[derive(Debug, Clone)]
pub struct SpeechAudio {
    pub wav: Vec<u8>,
    pub language: LanguageCode,
    pub speaker: String,
}

/// Cache key covering every request field that affects the audio.
/// Speed is keyed by its bit pattern so f32 stays out of the Hash impl.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    text: String,
    language: LanguageCode,
    speaker: String,
    speed_bits: u32,
}

impl CacheKey {
    fn from_request(request: &SynthesizeRequest, language: LanguageCode) -> Self {
        Self {
            text: request.text.clone(),
            language,
            speaker: request.speaker.clone(),
            speed_bits: request.speed.to_bits(),
        }
    }
}

pub struct SpeechService {
    registry: Arc<ModelRegistry>,
    cache: Option<Cache<CacheKey, SpeechAudio>>,
}

impl SpeechService {
    pub fn new(registry: Arc<ModelRegistry>, cache_enabled: bool) -> Self {
        // Initialize cache if enabled
        let cache = if cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(256)
                    .time_to_idle(Duration::from_secs(15 * 60)) // 15 minutes, refreshes on access
                    .build(),
            )
        } else {
            None
        };

        Self { registry, cache }
    }
}

#[async_trait]
pub trait SpeechServiceApi: Send + Sync {
    /// Synthesize speech for a request
    ///
    /// This operation:
    /// - Resolves the language code against the loaded models
    /// - Resolves the requested speaker against the model's speaker table
    /// - Renders the text through the model into an in-memory WAV file
    ///
    /// Returns audio data along with the language and speaker actually used
    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<SpeechAudio, SpeechServiceError>;
}

#[async_trait]
impl SpeechServiceApi for SpeechService {
    async fn synthesize(
        &self,
        request: SynthesizeRequest,
    ) -> Result<SpeechAudio, SpeechServiceError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            language = %request.language,
            speaker = %request.speaker,
            speed = request.speed,
            text_length = request.text.len(),
            "Speech synthesis request"
        );

        // 1. Find the model for the requested language. Unknown codes and
        //    codes with no loaded model are the same failure.
        let model = LanguageCode::from_code(&request.language)
            .and_then(|code| self.registry.get(code))
            .ok_or_else(|| SpeechServiceError::UnsupportedLanguage(request.language.clone()))?;
        let language = model.language();

        // 2. Check cache first (if enabled)
        let cache_key = CacheKey::from_request(&request, language);
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key).await {
                tracing::info!(
                    language = %language,
                    cached_audio_size = cached.wav.len(),
                    "Synthesis cache hit - returning cached audio"
                );
                return Ok(cached);
            }
        }

        // 3. Resolve the speaker name to a numeric id
        let (speaker, speaker_id) = Self::resolve_speaker(model.as_ref(), &request.speaker)?;

        // 4. Render the audio
        let wav = model
            .synthesize(&request.text, speaker_id, request.speed)
            .await?;

        tracing::info!(
            language = %language,
            speaker = %speaker,
            speaker_id = %speaker_id,
            audio_size = wav.len(),
            latency_ms = start_time.elapsed().as_millis() as u64,
            "Speech synthesized"
        );

        let audio = SpeechAudio {
            wav,
            language,
            speaker,
        };

        // 5. Cache the result if caching is enabled
        if let Some(cache) = &self.cache {
            cache.insert(cache_key, audio.clone()).await;
        }

        Ok(audio)
    }
}

impl SpeechService {
    /// Apply the speaker rules.
    ///
    /// English honors a requested speaker that exists in the table and falls
    /// back to the default for unknown names. Every other language uses its
    /// first speaker and ignores the request entirely.
    fn resolve_speaker(
        model: &dyn SpeechModel,
        requested: &str,
    ) -> Result<(String, SpeakerId), SpeechServiceError> {
        let speakers = model.speakers();

        if model.language() == LanguageCode::English {
            if let Some(id) = speakers.get(requested) {
                return Ok((requested.to_string(), id));
            }

            let fallback = model.default_speaker().unwrap_or(DEFAULT_SPEAKER);
            let id = speakers.get(fallback).ok_or_else(|| {
                SpeechServiceError::SpeakerResolution(format!(
                    "Default speaker {} missing from {} voice",
                    fallback,
                    model.language()
                ))
            })?;
            Ok((fallback.to_string(), id))
        } else {
            let (name, id) = speakers.first().ok_or_else(|| {
                SpeechServiceError::SpeakerResolution(format!(
                    "Voice for {} has no speakers",
                    model.language()
                ))
            })?;
            Ok((name.to_string(), id))
        }
    }

    /// Snapshot of every loaded voice for GET /voices
    pub fn voices(&self) -> VoicesResponse {
        let languages = self
            .registry
            .models()
            .map(|(language, model)| {
                (
                    language.as_str().to_string(),
                    VoiceInfo {
                        voice: model.voice_name().to_string(),
                        sample_rate: model.sample_rate(),
                        speakers: model
                            .speakers()
                            .names()
                            .into_iter()
                            .map(str::to_string)
                            .collect(),
                        default_speaker: model.default_speaker().map(str::to_string),
                    },
                )
            })
            .collect();

        VoicesResponse { languages }
    }
}
