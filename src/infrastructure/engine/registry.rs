use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Deserialize;

use super::{EngineError, PiperVoice, SpeechModel};
use crate::domain::speech::LanguageCode;
use crate::infrastructure::config::Config;

/// One entry of the `voices.json` manifest: which voice files serve a language
#[derive(Debug, Clone, Deserialize)]
pub struct VoiceManifestEntry {
    pub voice: String,
    #[serde(default)]
    pub default_speaker: Option<String>,
}

/// Process-wide language to model table, built once at startup
pub struct ModelRegistry {
    models: HashMap<LanguageCode, Arc<dyn SpeechModel>>,
}

impl ModelRegistry {
    pub fn new(models: HashMap<LanguageCode, Arc<dyn SpeechModel>>) -> Self {
        Self { models }
    }

    /// Load every voice named in `<voices_dir>/voices.json`
    ///
    /// Manifest keys are language codes; a key that is not one fails the
    /// parse. Startup is all or nothing: a manifest entry that cannot be
    /// loaded fails the whole call.
    pub fn load(config: &Config) -> Result<Self, EngineError> {
        let manifest_path = config.voices_dir.join("voices.json");
        let raw =
            std::fs::read_to_string(&manifest_path).map_err(|e| EngineError::InvalidConfig {
                path: manifest_path.display().to_string(),
                reason: e.to_string(),
            })?;
        let manifest: BTreeMap<LanguageCode, VoiceManifestEntry> =
            serde_json::from_str(&raw).map_err(|e| EngineError::InvalidConfig {
                path: manifest_path.display().to_string(),
                reason: e.to_string(),
            })?;

        let mut models: HashMap<LanguageCode, Arc<dyn SpeechModel>> = HashMap::new();

        for (language, entry) in manifest {
            let voice = PiperVoice::load(
                language,
                &config.voices_dir,
                &entry.voice,
                entry.default_speaker.clone(),
                &config.piper_bin,
            )?;

            tracing::info!(
                language = %language,
                voice = %entry.voice,
                speakers = voice.speakers().len(),
                sample_rate = voice.sample_rate(),
                "Voice model loaded"
            );

            models.insert(language, Arc::new(voice));
        }

        Ok(Self { models })
    }

    /// Look up the model for a language
    pub fn get(&self, language: LanguageCode) -> Option<Arc<dyn SpeechModel>> {
        self.models.get(&language).cloned()
    }

    /// Loaded language codes, sorted for stable output
    pub fn languages(&self) -> Vec<LanguageCode> {
        let mut languages: Vec<LanguageCode> = self.models.keys().copied().collect();
        languages.sort_by_key(|l| l.as_str());
        languages
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Iterate over all loaded models
    pub fn models(&self) -> impl Iterator<Item = (LanguageCode, &Arc<dyn SpeechModel>)> {
        self.models.iter().map(|(language, model)| (*language, model))
    }
}
