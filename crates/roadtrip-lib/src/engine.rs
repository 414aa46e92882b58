//! Query interface over the loaded country datasets.

use std::collections::HashMap;
use std::io::Read;

use tracing::{debug, info, warn};

use crate::capitals::CapitalDistanceTable;
use crate::country::{normalize_code, CountryKey, ValidCountrySet};
use crate::dataset::DatasetPaths;
use crate::error::{Error, Result};
use crate::graph::{build_graph, BuildOptions, Graph, NodeId};
use crate::identity::CountryRegistry;
use crate::routing::{plan_route, RoutePlan};
use crate::sources::{read_borders, read_capital_distances, read_registry, LoadReport};

/// Number of fuzzy suggestions attached to an unknown country error.
const MAX_SUGGESTIONS: usize = 3;

/// Immutable country graph plus the lookup tables built alongside it.
///
/// Everything is built once by [`RoadTrip::load`] or
/// [`RoadTrip::from_readers`] and never mutated afterwards, so a single
/// instance can be shared between threads.
#[derive(Debug, Clone)]
pub struct RoadTrip {
    graph: Graph,
    capitals: CapitalDistanceTable,
    registry: CountryRegistry,
    valid: ValidCountrySet,
    redirects: HashMap<CountryKey, CountryKey>,
}

impl RoadTrip {
    /// Load the three dataset files and build the graph.
    ///
    /// A missing or unreadable file is fatal. Malformed records are skipped and
    /// listed in the returned [`LoadReport`].
    pub fn load(paths: &DatasetPaths, options: &BuildOptions) -> Result<(Self, LoadReport)> {
        let (borders, capdist, registry) = paths.open()?;
        info!(
            borders = %paths.borders.display(),
            capdist = %paths.capdist.display(),
            registry = %paths.registry.display(),
            "loading country datasets"
        );
        Self::from_readers(borders, capdist, registry, options)
    }

    /// Build from any readers holding the three dataset formats.
    pub fn from_readers<B: Read, C: Read, R: Read>(
        borders: B,
        capdist: C,
        registry: R,
        options: &BuildOptions,
    ) -> Result<(Self, LoadReport)> {
        let mut report = LoadReport::default();
        let border_records = read_borders(borders, &mut report)?;
        let capital_records = read_capital_distances(capdist, &mut report)?;
        let registry_records = read_registry(registry, &mut report)?;

        let registry = CountryRegistry::from_records(&registry_records);
        let capitals = CapitalDistanceTable::from_records(&capital_records);
        let graph = build_graph(&border_records, &registry, &capitals, options, &mut report);

        let redirects: HashMap<CountryKey, CountryKey> = options
            .aliases
            .iter()
            .map(|alias| (alias.alias.clone(), alias.canonical.clone()))
            .collect();

        let known = |key: &CountryKey| {
            graph.node_id(key).is_some() || registry.code_for_name(key).is_some()
        };
        let redirected: Vec<CountryKey> = redirects
            .iter()
            .filter(|(_, canonical)| known(canonical))
            .map(|(alias, _)| alias.clone())
            .collect();
        let valid = ValidCountrySet::new(
            graph
                .keys()
                .chain(registry.names())
                .cloned()
                .chain(redirected),
        );

        if !report.is_clean() {
            warn!(
                issues = report.issues.len(),
                "some dataset records were skipped or patched"
            );
        }
        info!(
            countries = valid.len(),
            graph_nodes = graph.len(),
            capital_pairs = capitals.len(),
            registry_codes = registry.len(),
            "datasets loaded"
        );

        Ok((
            Self {
                graph,
                capitals,
                registry,
                valid,
                redirects,
            },
            report,
        ))
    }

    /// Whether `name` (any case, surrounding whitespace ignored) is a known
    /// country.
    pub fn is_valid_country(&self, name: &str) -> bool {
        self.valid.contains(name)
    }

    /// Recorded capital-to-capital distance between two countries, in either
    /// order.
    ///
    /// Returns `Ok(None)` when no distance is recorded for the pair. This never
    /// consults the border graph.
    pub fn direct_distance(&self, a: &str, b: &str) -> Result<Option<u32>> {
        let from = self.resolve_code(a)?;
        let to = self.resolve_code(b)?;
        let distance = match (&from, &to) {
            (Some(from), Some(to)) => self.capitals.get(from, to),
            _ => None,
        };
        debug!(?from, ?to, ?distance, "direct distance lookup");
        Ok(distance)
    }

    /// Lowest-total-distance overland route between two countries.
    ///
    /// Returns `Ok(None)` when both names are valid but no chain of borders
    /// connects them.
    pub fn shortest_route(&self, a: &str, b: &str) -> Result<Option<RoutePlan>> {
        let start_key = self.require_valid(a)?;
        let goal_key = self.require_valid(b)?;

        let (Some(start), Some(goal)) = (self.node_for(&start_key), self.node_for(&goal_key))
        else {
            debug!(start = %start_key, goal = %goal_key, "country has no land borders recorded");
            return Ok(None);
        };

        let plan = plan_route(&self.graph, start, goal);
        if plan.is_none() {
            debug!(start = %start_key, goal = %goal_key, "no border route");
        }
        Ok(plan)
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn registry(&self) -> &CountryRegistry {
        &self.registry
    }

    pub fn capitals(&self) -> &CapitalDistanceTable {
        &self.capitals
    }

    pub fn valid_countries(&self) -> &ValidCountrySet {
        &self.valid
    }

    fn require_valid(&self, name: &str) -> Result<CountryKey> {
        if self.valid.contains(name) {
            return Ok(CountryKey::new(name));
        }
        Err(Error::UnknownCountry {
            name: name.trim().to_string(),
            suggestions: self.valid.suggestions(name, MAX_SUGGESTIONS),
        })
    }

    /// Graph node for any accepted spelling: a border name or alias, an alias
    /// override, or a registry name whose code belongs to a node.
    fn node_for(&self, key: &CountryKey) -> Option<NodeId> {
        let canonical = self.redirects.get(key);
        self.graph
            .node_id(key)
            .or_else(|| canonical.and_then(|canonical| self.graph.node_id(canonical)))
            .or_else(|| {
                self.registry
                    .code_for_name(key)
                    .or_else(|| canonical.and_then(|canonical| self.registry.code_for_name(canonical)))
                    .and_then(|code| self.graph.node_for_code(code))
            })
    }

    /// Resolve a country name, alias or bare registry code to a registry code.
    fn resolve_code(&self, name: &str) -> Result<Option<String>> {
        if !self.valid.contains(name) && self.registry.contains_code(name) {
            return Ok(Some(normalize_code(name)));
        }

        let key = self.require_valid(name)?;
        let from_graph = self
            .node_for(&key)
            .and_then(|id| self.graph.node(id))
            .and_then(|node| node.code.as_deref());
        let code = from_graph
            .or_else(|| self.registry.code_for_name(&key))
            .or_else(|| {
                self.redirects
                    .get(&key)
                    .and_then(|canonical| self.registry.code_for_name(canonical))
            });
        Ok(code.map(str::to_string))
    }
}
