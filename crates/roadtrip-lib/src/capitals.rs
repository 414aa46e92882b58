use std::collections::HashMap;

use tracing::debug;

use crate::country::normalize_code;
use crate::sources::CapitalDistanceRecord;

/// Unordered pair of country codes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CodePair(String, String);

impl CodePair {
    fn new(a: &str, b: &str) -> Self {
        let a = normalize_code(a);
        let b = normalize_code(b);
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// Symmetric capital-to-capital distances in kilometres.
///
/// The source lists each pair once per direction at most, so a value inserted
/// for `A, B` is returned for `B, A` as well. A later row for the same pair
/// replaces the earlier value.
#[derive(Debug, Clone, Default)]
pub struct CapitalDistanceTable {
    distances: HashMap<CodePair, u32>,
}

impl CapitalDistanceTable {
    pub fn from_records(records: &[CapitalDistanceRecord]) -> Self {
        let mut table = Self::default();
        for record in records {
            table.insert(&record.from, &record.to, record.distance_km);
        }
        debug!(pairs = table.len(), "built capital distance table");
        table
    }

    pub fn insert(&mut self, a: &str, b: &str, distance_km: u32) {
        self.distances.insert(CodePair::new(a, b), distance_km);
    }

    /// Distance between the capitals of two codes, in either order.
    pub fn get(&self, a: &str, b: &str) -> Option<u32> {
        self.distances.get(&CodePair::new(a, b)).copied()
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}
