use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Speaker used when the request omits one, and the fallback for unknown
/// English speaker names
pub const DEFAULT_SPEAKER: &str = "EN-US";

/// Request for POST /synthesize
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizeRequest {
    pub text: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_speaker")]
    pub speaker: String,
    #[serde(default = "default_speed")]
    pub speed: f32,
}

fn default_language() -> String {
    "EN".to_string()
}

fn default_speaker() -> String {
    DEFAULT_SPEAKER.to_string()
}

fn default_speed() -> f32 {
    1.0
}

/// Response for GET /voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub languages: BTreeMap<String, VoiceInfo>,
}

/// One loaded voice model as reported by GET /voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice: String,
    pub sample_rate: u32,
    pub speakers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_speaker: Option<String>,
}
