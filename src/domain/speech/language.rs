use serde::{Deserialize, Serialize};

/// Language codes the synthesis service can load voices for.
///
/// The serde renames carry the wire spelling: voice manifests are keyed by
/// these codes and the readiness endpoint reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LanguageCode {
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "ES")]
    Spanish,
    #[serde(rename = "FR")]
    French,
    #[serde(rename = "ZH")]
    Chinese,
    #[serde(rename = "JP")]
    Japanese,
    #[serde(rename = "KR")]
    Korean,
}

impl LanguageCode {
    /// Get the wire code as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageCode::English => "EN",
            LanguageCode::Spanish => "ES",
            LanguageCode::French => "FR",
            LanguageCode::Chinese => "ZH",
            LanguageCode::Japanese => "JP",
            LanguageCode::Korean => "KR",
        }
    }

    /// Parse a wire code. Matching is exact and case sensitive: "en" is not "EN".
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "EN" => Some(LanguageCode::English),
            "ES" => Some(LanguageCode::Spanish),
            "FR" => Some(LanguageCode::French),
            "ZH" => Some(LanguageCode::Chinese),
            "JP" => Some(LanguageCode::Japanese),
            "KR" => Some(LanguageCode::Korean),
            _ => None,
        }
    }
}

impl std::fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
