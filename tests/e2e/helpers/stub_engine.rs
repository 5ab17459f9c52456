use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use polyvox_server::domain::speech::{LanguageCode, SpeakerId, SpeakerMap};
use polyvox_server::infrastructure::engine::{EngineError, SpeechModel};

/// One recorded synthesis call
#[derive(Debug, Clone)]
pub struct SynthCall {
    pub language: LanguageCode,
    pub text: String,
    pub speaker: SpeakerId,
    pub speed: f32,
}

/// In-memory voice model for exercising the HTTP surface without piper
pub struct StubModel {
    language: LanguageCode,
    speakers: SpeakerMap,
    default_speaker: Option<String>,
    fail_with: Option<String>,
    calls: Arc<Mutex<Vec<SynthCall>>>,
    wav: Vec<u8>,
}

impl StubModel {
    pub fn new(language: LanguageCode, speakers: &[(&str, i64)]) -> Self {
        Self {
            language,
            speakers: speakers
                .iter()
                .map(|(name, id)| (name.to_string(), SpeakerId(*id)))
                .collect(),
            default_speaker: None,
            fail_with: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            wav: wav_fixture(44100),
        }
    }

    pub fn with_default_speaker(mut self, name: &str) -> Self {
        self.default_speaker = Some(name.to_string());
        self
    }

    /// Share a call recorder owned by the test context
    pub fn with_calls(mut self, calls: Arc<Mutex<Vec<SynthCall>>>) -> Self {
        self.calls = calls;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }
}

#[async_trait]
impl SpeechModel for StubModel {
    fn language(&self) -> LanguageCode {
        self.language
    }

    fn voice_name(&self) -> &str {
        "stub"
    }

    fn sample_rate(&self) -> u32 {
        44100
    }

    fn speakers(&self) -> &SpeakerMap {
        &self.speakers
    }

    fn default_speaker(&self) -> Option<&str> {
        self.default_speaker.as_deref()
    }

    async fn synthesize(
        &self,
        text: &str,
        speaker: SpeakerId,
        speed: f32,
    ) -> Result<Vec<u8>, EngineError> {
        self.calls.lock().push(SynthCall {
            language: self.language,
            text: text.to_string(),
            speaker,
            speed,
        });

        match &self.fail_with {
            Some(message) => Err(EngineError::Synthesis(message.clone())),
            None => Ok(self.wav.clone()),
        }
    }
}

/// A short 16-bit mono sine burst as a complete WAV file
pub fn wav_fixture(sample_rate: u32) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for n in 0..(sample_rate / 10) {
            let t = n as f32 / sample_rate as f32;
            let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
            writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
    }

    cursor.into_inner()
}
