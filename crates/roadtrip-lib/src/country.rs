//! Country identity helpers shared by every data source.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

/// Minimum Jaro-Winkler similarity for a name to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Normalized identity string for a country.
///
/// Keys are trimmed, lower-cased and have internal whitespace runs collapsed
/// to a single space, so `"  United   States "` and `"united states"` compare
/// equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CountryKey(String);

impl CountryKey {
    pub fn new(name: &str) -> Self {
        let normalized = name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        Self(normalized)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CountryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CountryKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Normalize a country code (`"usa "` becomes `"USA"`).
pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

/// Existence index of every name a query may use.
#[derive(Debug, Clone, Default)]
pub struct ValidCountrySet {
    keys: HashSet<CountryKey>,
}

impl ValidCountrySet {
    pub fn new(keys: impl IntoIterator<Item = CountryKey>) -> Self {
        Self {
            keys: keys.into_iter().filter(|key| !key.is_empty()).collect(),
        }
    }

    /// Check a raw, user-supplied name against the set.
    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&CountryKey::new(name))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Return up to `limit` known names that closely resemble `name`,
    /// best match first.
    pub fn suggestions(&self, name: &str, limit: usize) -> Vec<String> {
        let wanted = CountryKey::new(name);
        let mut scored: Vec<(f64, &str)> = self
            .keys
            .iter()
            .map(|key| (strsim::jaro_winkler(wanted.as_str(), key.as_str()), key.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, key)| key.to_string())
            .collect()
    }
}
