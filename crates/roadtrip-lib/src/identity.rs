//! Country identity reconciliation.
//!
//! The registry maps stable country codes to their most recent display name
//! and indexes every historical spelling so older names still resolve to a
//! code. Alias overrides let callers bridge names that no dataset agrees on.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::country::{normalize_code, CountryKey};
use crate::error::Error;
use crate::sources::RegistryRecord;

/// The registry row retained for a code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryEntry {
    pub code: String,
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Country code registry resolved to the most temporally current names.
#[derive(Debug, Clone, Default)]
pub struct CountryRegistry {
    current: BTreeMap<String, RegistryEntry>,
    name_index: HashMap<CountryKey, String>,
}

impl CountryRegistry {
    /// Build the registry, keeping for each code the row with the latest end
    /// date. Ties keep the row seen first.
    pub fn from_records(records: &[RegistryRecord]) -> Self {
        let mut current: BTreeMap<String, RegistryEntry> = BTreeMap::new();
        let mut name_index: HashMap<CountryKey, String> = HashMap::new();

        for record in records {
            for key in name_variants(&record.name) {
                name_index.entry(key).or_insert_with(|| record.code.clone());
            }

            let replace = current
                .get(&record.code)
                .map(|existing| record.end > existing.end)
                .unwrap_or(true);
            if replace {
                current.insert(
                    record.code.clone(),
                    RegistryEntry {
                        code: record.code.clone(),
                        name: record.name.clone(),
                        start: record.start,
                        end: record.end,
                    },
                );
            }
        }

        // Current names win over historical spellings shared between codes,
        // and a full current name wins over another code's short form.
        for entry in current.values() {
            for key in name_variants(&entry.name).into_iter().skip(1) {
                name_index.insert(key, entry.code.clone());
            }
        }
        for entry in current.values() {
            name_index.insert(CountryKey::new(&entry.name), entry.code.clone());
        }

        debug!(
            codes = current.len(),
            names = name_index.len(),
            "built country registry"
        );
        Self {
            current,
            name_index,
        }
    }

    /// Most recent display name recorded for `code`.
    pub fn current_name(&self, code: &str) -> Option<&str> {
        self.entry(code).map(|entry| entry.name.as_str())
    }

    pub fn entry(&self, code: &str) -> Option<&RegistryEntry> {
        self.current.get(&normalize_code(code))
    }

    pub fn contains_code(&self, code: &str) -> bool {
        self.current.contains_key(&normalize_code(code))
    }

    /// Code for any current or historical spelling of a country name.
    pub fn code_for_name(&self, key: &CountryKey) -> Option<&str> {
        self.name_index.get(key).map(String::as_str)
    }

    /// Every normalized name the registry knows about.
    pub fn names(&self) -> impl Iterator<Item = &CountryKey> {
        self.name_index.keys()
    }

    /// Retained entries ordered by code.
    pub fn entries(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.current.values()
    }

    pub fn len(&self) -> usize {
        self.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }
}

/// Full name plus the short form before any `" ("` qualifier or `/` variant,
/// e.g. `"Yemen (Arab Republic of Yemen)"` also yields `"yemen"`.
fn name_variants(name: &str) -> Vec<CountryKey> {
    let full = CountryKey::new(name);
    let short_text = name.split(" (").next().unwrap_or(name);
    let short_text = short_text.split('/').next().unwrap_or(short_text);
    let short = CountryKey::new(short_text);

    let mut variants = vec![full];
    if !short.is_empty() && !variants.contains(&short) {
        variants.push(short);
    }
    variants
}

/// A caller-supplied alias, written `NAME=CANONICAL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AliasOverride {
    pub alias: CountryKey,
    pub canonical: CountryKey,
}

impl AliasOverride {
    pub fn new(alias: &str, canonical: &str) -> Self {
        Self {
            alias: CountryKey::new(alias),
            canonical: CountryKey::new(canonical),
        }
    }
}

impl FromStr for AliasOverride {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidAlias {
            value: value.to_string(),
        };
        let (alias, canonical) = value.split_once('=').ok_or_else(invalid)?;
        let parsed = Self::new(alias, canonical);
        if parsed.alias.is_empty() || parsed.canonical.is_empty() {
            return Err(invalid());
        }
        Ok(parsed)
    }
}

impl fmt::Display for AliasOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.alias, self.canonical)
    }
}
