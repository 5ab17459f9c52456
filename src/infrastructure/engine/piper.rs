use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::{EngineError, SpeechModel};
use crate::domain::speech::{LanguageCode, SpeakerId, SpeakerMap};

/// The subset of a piper voice's `.onnx.json` config the server reads
#[derive(Debug, Deserialize)]
struct VoiceConfig {
    audio: AudioConfig,
    #[serde(default = "default_num_speakers")]
    num_speakers: usize,
    #[serde(default)]
    speaker_id_map: BTreeMap<String, SpeakerId>,
}

#[derive(Debug, Deserialize)]
struct AudioConfig {
    sample_rate: u32,
}

fn default_num_speakers() -> usize {
    1
}

/// Piper implementation of a speech model
///
/// Drives the `piper` binary as a subprocess: text goes in on stdin and a
/// complete WAV file comes back on stdout (`--output_file -`).
pub struct PiperVoice {
    language: LanguageCode,
    voice_name: String,
    piper_bin: String,
    model_path: PathBuf,
    config_path: PathBuf,
    sample_rate: u32,
    multi_speaker: bool,
    speakers: SpeakerMap,
    default_speaker: Option<String>,
}

impl PiperVoice {
    /// Load a voice from `<voices_dir>/<voice_name>.onnx` and its
    /// `.onnx.json` config
    pub fn load(
        language: LanguageCode,
        voices_dir: &Path,
        voice_name: &str,
        default_speaker: Option<String>,
        piper_bin: &str,
    ) -> Result<Self, EngineError> {
        let model_path = voices_dir.join(format!("{}.onnx", voice_name));
        let config_path = voices_dir.join(format!("{}.onnx.json", voice_name));

        if !model_path.exists() {
            return Err(EngineError::ModelNotFound(
                model_path.display().to_string(),
            ));
        }

        let raw = std::fs::read_to_string(&config_path).map_err(|e| EngineError::InvalidConfig {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config: VoiceConfig =
            serde_json::from_str(&raw).map_err(|e| EngineError::InvalidConfig {
                path: config_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let speakers = if config.speaker_id_map.is_empty() {
            // Single-speaker voices carry no speaker table. Expose one entry
            // named after the language so speaker resolution always has a
            // first speaker to land on.
            SpeakerMap::from_iter([(language.as_str().to_string(), SpeakerId(0))])
        } else {
            SpeakerMap::new(config.speaker_id_map)
        };

        Ok(Self {
            language,
            voice_name: voice_name.to_string(),
            piper_bin: piper_bin.to_string(),
            model_path,
            config_path,
            sample_rate: config.audio.sample_rate,
            multi_speaker: config.num_speakers > 1,
            speakers,
            default_speaker,
        })
    }
}

#[async_trait]
impl SpeechModel for PiperVoice {
    fn language(&self) -> LanguageCode {
        self.language
    }

    fn voice_name(&self) -> &str {
        &self.voice_name
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
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
        if !speed.is_finite() || speed <= 0.0 {
            return Err(EngineError::InvalidSpeed(speed));
        }

        // Piper scales duration, not rate: length_scale is the reciprocal of
        // the requested speed.
        let length_scale = 1.0 / speed;

        tracing::debug!(
            voice = %self.voice_name,
            speaker = %speaker,
            speed = speed,
            length_scale = length_scale,
            text_length = text.len(),
            "Spawning piper"
        );

        let mut command = Command::new(&self.piper_bin);
        command
            .arg("--model")
            .arg(&self.model_path)
            .arg("--config")
            .arg(&self.config_path)
            .arg("--length_scale")
            .arg(length_scale.to_string())
            .arg("--output_file")
            .arg("-");

        if self.multi_speaker {
            command.arg("--speaker").arg(speaker.to_string());
        }

        let mut child = command
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // piper renders line by line and starts emitting audio before it has
        // consumed all of its input, so stdin is fed while the output is
        // collected. Writing the whole text first can fill both pipes on
        // long texts and stall the child.
        let stdin = child.stdin.take();
        let feed_stdin = async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(text.as_bytes()).await?;
                stdin.write_all(b"\n").await?;
                // stdin is dropped here, closing the pipe
            }
            Ok::<(), std::io::Error>(())
        };

        let (write_result, output) = tokio::join!(feed_stdin, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(EngineError::Synthesis(stderr.trim().to_string()));
        }

        // The child exited cleanly; a failed write means it stopped reading
        // the text early.
        write_result?;

        if output.stdout.is_empty() {
            return Err(EngineError::EmptyAudio);
        }

        Ok(output.stdout)
    }
}
