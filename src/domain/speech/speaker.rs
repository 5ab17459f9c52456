use std::collections::BTreeMap;

use serde::Deserialize;

/// Numeric speaker id inside a voice model. Deserializes from the bare
/// integer a voice config's `speaker_id_map` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct SpeakerId(pub i64);

impl std::fmt::Display for SpeakerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A voice model's speaker table, mapping speaker names to numeric ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeakerMap {
    entries: BTreeMap<String, SpeakerId>,
}

impl SpeakerMap {
    pub fn new(entries: BTreeMap<String, SpeakerId>) -> Self {
        Self { entries }
    }

    /// Look up a speaker by its exact name
    pub fn get(&self, name: &str) -> Option<SpeakerId> {
        self.entries.get(name).copied()
    }

    /// The speaker with the lowest id. Stable regardless of name ordering.
    pub fn first(&self) -> Option<(&str, SpeakerId)> {
        self.entries
            .iter()
            .min_by_key(|(_, id)| **id)
            .map(|(name, id)| (name.as_str(), *id))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Speaker names ordered by id, lowest first
    pub fn names(&self) -> Vec<&str> {
        let mut pairs: Vec<(&str, SpeakerId)> = self
            .entries
            .iter()
            .map(|(name, id)| (name.as_str(), *id))
            .collect();
        pairs.sort_by_key(|(_, id)| *id);
        pairs.into_iter().map(|(name, _)| name).collect()
    }
}

impl FromIterator<(String, SpeakerId)> for SpeakerMap {
    fn from_iter<T: IntoIterator<Item = (String, SpeakerId)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
