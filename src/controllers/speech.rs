use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::sync::Arc;

use crate::{
    domain::speech::{SpeechService, SpeechServiceApi, SynthesizeRequest, VoicesResponse},
    error::{AppError, AppResult},
};

pub struct SpeechController {
    speech_service: Arc<SpeechService>,
}

impl SpeechController {
    pub fn new(speech_service: Arc<SpeechService>) -> Self {
        Self { speech_service }
    }

    /// POST /synthesize - Convert text to speech
    ///
    /// Responds with a complete WAV file as an attachment download
    pub async fn synthesize(
        State(controller): State<Arc<SpeechController>>,
        Json(request): Json<SynthesizeRequest>,
    ) -> AppResult<(StatusCode, HeaderMap, Body)> {
        let audio = controller
            .speech_service
            .synthesize(request)
            .await
            .map_err(AppError::from)?;

        // Build headers
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, "audio/wav".parse().unwrap());
        headers.insert(
            header::CONTENT_DISPOSITION,
            "attachment; filename=\"speech.wav\"".parse().unwrap(),
        );
        headers.insert("X-Language", audio.language.as_str().parse().unwrap());
        headers.insert("X-Speaker-Used", audio.speaker.parse().unwrap());

        Ok((StatusCode::OK, headers, Body::from(audio.wav)))
    }

    /// GET /voices - List loaded languages and their speakers
    pub async fn list_voices(
        State(controller): State<Arc<SpeechController>>,
    ) -> AppResult<Json<VoicesResponse>> {
        Ok(Json(controller.speech_service.voices()))
    }
}
