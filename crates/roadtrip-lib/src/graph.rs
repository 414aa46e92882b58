use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::capitals::CapitalDistanceTable;
use crate::country::{normalize_code, CountryKey};
use crate::error::Error;
use crate::identity::{AliasOverride, CountryRegistry};
use crate::sources::{BorderRecord, LoadReport, RecordProblem, SourceKind};

/// Index of a country node within a [`Graph`].
pub type NodeId = usize;

/// How to weight a border entry that has no usable distance.
///
/// A distance recorded on the neighbour's own record for the same border is
/// always preferred over any of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackPolicy {
    /// Use the capital-to-capital distance, otherwise drop the edge.
    #[default]
    CapitalOrDrop,
    /// Use the capital-to-capital distance, otherwise weight the edge 0.
    CapitalOrZero,
    /// Weight every such edge 0.
    Zero,
    /// Drop every such edge.
    Drop,
}

impl fmt::Display for FallbackPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            FallbackPolicy::CapitalOrDrop => "capital-or-drop",
            FallbackPolicy::CapitalOrZero => "capital-or-zero",
            FallbackPolicy::Zero => "zero",
            FallbackPolicy::Drop => "drop",
        };
        f.write_str(value)
    }
}

impl FromStr for FallbackPolicy {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "capital-or-drop" => Ok(FallbackPolicy::CapitalOrDrop),
            "capital-or-zero" => Ok(FallbackPolicy::CapitalOrZero),
            "zero" => Ok(FallbackPolicy::Zero),
            "drop" => Ok(FallbackPolicy::Drop),
            _ => Err(Error::UnknownFallbackPolicy {
                value: value.to_string(),
            }),
        }
    }
}

/// Where an edge's weight came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Border length recorded in the border dataset.
    Border,
    /// Capital-to-capital distance standing in for a missing border length.
    CapitalFallback,
    /// Zero weight standing in for a missing border length.
    ZeroFallback,
}

/// Edge within the routing graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    pub target: NodeId,
    pub kind: EdgeKind,
    pub distance_km: u32,
}

/// A country node. Aliases point at the same node rather than copying its
/// edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub key: CountryKey,
    /// Spelling as first seen in the border dataset.
    pub name: String,
    pub aliases: Vec<CountryKey>,
    /// Registry code, when the name could be reconciled with the registry.
    pub code: Option<String>,
}

/// Options controlling graph construction.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub fallback: FallbackPolicy,
    pub aliases: Vec<AliasOverride>,
}

/// Undirected, weighted country graph used by the route engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Graph {
    policy: FallbackPolicy,
    nodes: Vec<Node>,
    adjacency: Vec<Vec<Edge>>,
    index: HashMap<CountryKey, NodeId>,
    by_code: HashMap<String, NodeId>,
}

impl Graph {
    /// Fallback policy that produced this graph.
    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    /// Return the neighbours for a given node.
    pub fn neighbours(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(node)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Resolve a primary name or alias to its node.
    pub fn node_id(&self, key: &CountryKey) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    /// Node carrying a registry code. When several nodes share a code the
    /// lowest id wins.
    pub fn node_for_code(&self, code: &str) -> Option<NodeId> {
        self.by_code.get(&normalize_code(code)).copied()
    }

    /// Canonical key of a node, as shown in route hops.
    pub fn key(&self, node: NodeId) -> Option<&CountryKey> {
        self.nodes.get(node).map(|node| &node.key)
    }

    /// Every key (primary names and aliases) that resolves to a node.
    pub fn keys(&self) -> impl Iterator<Item = &CountryKey> {
        self.index.keys()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of directed edges (each border counts twice).
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }
}

/// Build the routing graph from parsed border records.
///
/// Construction runs in two passes: every record's country and alias are
/// registered first so neighbour names resolve to the same node whatever the
/// line order. Edges missing a distance are weighted according to
/// `options.fallback`, and every edge is mirrored onto its neighbour. When both
/// records give a length for the same border the smaller one wins.
pub fn build_graph(
    records: &[BorderRecord],
    registry: &CountryRegistry,
    capitals: &CapitalDistanceTable,
    options: &BuildOptions,
    report: &mut LoadReport,
) -> Graph {
    let mut builder = GraphBuilder::default();

    // Pass 1: origins and their aliases.
    let mut origins: Vec<(NodeId, &BorderRecord)> = Vec::new();
    let mut origin_slots: HashMap<NodeId, usize> = HashMap::new();
    for record in records {
        let id = builder.intern(&record.country);
        if let Some(alias) = &record.alias {
            builder.add_alias(id, CountryKey::new(alias));
        }

        if let Some(&slot) = origin_slots.get(&id) {
            warn!(line = record.line, country = %record.country, "duplicate border record");
            report.record(
                SourceKind::Borders,
                record.line,
                RecordProblem::DuplicateCountry {
                    name: record.country.clone(),
                },
            );
            origins[slot] = (id, record);
        } else {
            origin_slots.insert(id, origins.len());
            origins.push((id, record));
        }
    }

    // Overrides naming an origin join its key table before neighbours are
    // interned, so a neighbour spelled with the override lands on that origin.
    builder.apply_overrides(&options.aliases);

    // Pass 2: neighbours.
    let mut raw_edges: Vec<RawEdge> = Vec::new();
    for &(origin, record) in &origins {
        for entry in &record.entries {
            let target = builder.intern(&entry.neighbour);
            if target == origin {
                debug!(country = %record.country, "ignoring border with itself");
                continue;
            }
            raw_edges.push(RawEdge {
                from: origin,
                to: target,
                distance_km: entry.distance_km,
            });
        }
    }

    builder.apply_overrides(&options.aliases);
    builder.resolve_codes(registry, &options.aliases);

    let recorded: HashMap<(NodeId, NodeId), u32> = raw_edges
        .iter()
        .filter_map(|edge| edge.distance_km.map(|km| ((edge.from, edge.to), km)))
        .collect();

    let mut adjacency: Vec<Vec<Edge>> = vec![Vec::new(); builder.nodes.len()];
    let mut stats = WeightStats::default();
    for edge in &raw_edges {
        let weighted = match edge.distance_km {
            Some(km) => Some((km, EdgeKind::Border)),
            None => recorded
                .get(&(edge.to, edge.from))
                .map(|&km| (km, EdgeKind::Border))
                .or_else(|| {
                    fallback_weight(
                        options.fallback,
                        capitals,
                        &builder.nodes[edge.from],
                        &builder.nodes[edge.to],
                    )
                }),
        };

        let Some((distance_km, kind)) = weighted else {
            debug!(
                from = %builder.nodes[edge.from].key,
                to = %builder.nodes[edge.to].key,
                policy = %options.fallback,
                "dropping border without distance"
            );
            stats.dropped += 1;
            continue;
        };
        stats.count(kind);
        insert_edge(
            &mut adjacency[edge.from],
            Edge {
                target: edge.to,
                kind,
                distance_km,
            },
        );
    }

    // Both directions of a border end up with the same (smallest) weight.
    let mut reverse = Vec::new();
    let mut mirrored_count = 0usize;
    for (from, edges) in adjacency.iter().enumerate() {
        for edge in edges {
            if !adjacency[edge.target].iter().any(|back| back.target == from) {
                mirrored_count += 1;
            }
            reverse.push((
                edge.target,
                Edge {
                    target: from,
                    kind: edge.kind,
                    distance_km: edge.distance_km,
                },
            ));
        }
    }
    for (from, edge) in reverse {
        insert_edge(&mut adjacency[from], edge);
    }

    let mut by_code: HashMap<String, NodeId> = HashMap::new();
    for node in &builder.nodes {
        if let Some(code) = &node.code {
            by_code.entry(code.clone()).or_insert(node.id);
        }
    }

    let graph = Graph {
        policy: options.fallback,
        nodes: builder.nodes,
        adjacency,
        index: builder.index,
        by_code,
    };

    info!(
        countries = graph.len(),
        edges = graph.edge_count(),
        border = stats.border,
        capital_fallback = stats.capital_fallback,
        zero_fallback = stats.zero_fallback,
        dropped = stats.dropped,
        mirrored = mirrored_count,
        policy = %options.fallback,
        "built border graph"
    );
    graph
}

#[derive(Debug, Default)]
struct GraphBuilder {
    nodes: Vec<Node>,
    index: HashMap<CountryKey, NodeId>,
}

impl GraphBuilder {
    fn intern(&mut self, name: &str) -> NodeId {
        let key = CountryKey::new(name);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node {
            id,
            key: key.clone(),
            name: name.trim().to_string(),
            aliases: Vec::new(),
            code: None,
        });
        self.index.insert(key, id);
        id
    }

    /// Attach every override whose canonical name is already a node.
    fn apply_overrides(&mut self, overrides: &[AliasOverride]) {
        for alias in overrides {
            if let Some(id) = self.index.get(&alias.canonical).copied() {
                self.add_alias(id, alias.alias.clone());
            }
        }
    }

    fn add_alias(&mut self, id: NodeId, alias: CountryKey) {
        if alias.is_empty() {
            return;
        }
        match self.index.get(&alias) {
            Some(&existing) if existing == id => {}
            Some(&existing) => {
                warn!(
                    alias = %alias,
                    country = %self.nodes[id].key,
                    existing = %self.nodes[existing].key,
                    "alias already names another country; keeping the first"
                );
            }
            None => {
                self.index.insert(alias.clone(), id);
                self.nodes[id].aliases.push(alias);
            }
        }
    }

    fn resolve_codes(&mut self, registry: &CountryRegistry, overrides: &[AliasOverride]) {
        let redirects: HashMap<&CountryKey, &CountryKey> = overrides
            .iter()
            .map(|alias| (&alias.alias, &alias.canonical))
            .collect();

        let mut unresolved = 0usize;
        for node in &mut self.nodes {
            let code = std::iter::once(&node.key)
                .chain(node.aliases.iter())
                .find_map(|key| {
                    registry.code_for_name(key).or_else(|| {
                        redirects
                            .get(key)
                            .and_then(|canonical| registry.code_for_name(canonical))
                    })
                });
            if code.is_none() {
                unresolved += 1;
            }
            node.code = code.map(str::to_string);
        }

        if unresolved > 0 {
            debug!(unresolved, "countries without a registry code");
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct RawEdge {
    from: NodeId,
    to: NodeId,
    distance_km: Option<u32>,
}

#[derive(Debug, Default)]
struct WeightStats {
    border: usize,
    capital_fallback: usize,
    zero_fallback: usize,
    dropped: usize,
}

impl WeightStats {
    fn count(&mut self, kind: EdgeKind) {
        match kind {
            EdgeKind::Border => self.border += 1,
            EdgeKind::CapitalFallback => self.capital_fallback += 1,
            EdgeKind::ZeroFallback => self.zero_fallback += 1,
        }
    }
}

fn fallback_weight(
    policy: FallbackPolicy,
    capitals: &CapitalDistanceTable,
    from: &Node,
    to: &Node,
) -> Option<(u32, EdgeKind)> {
    let capital = || {
        from.code
            .as_deref()
            .zip(to.code.as_deref())
            .and_then(|(a, b)| capitals.get(a, b))
            .map(|km| (km, EdgeKind::CapitalFallback))
    };

    match policy {
        FallbackPolicy::CapitalOrDrop => capital(),
        FallbackPolicy::CapitalOrZero => capital().or(Some((0, EdgeKind::ZeroFallback))),
        FallbackPolicy::Zero => Some((0, EdgeKind::ZeroFallback)),
        FallbackPolicy::Drop => None,
    }
}

/// Keep at most one edge per neighbour, preferring the shorter.
fn insert_edge(edges: &mut Vec<Edge>, edge: Edge) {
    if let Some(existing) = edges.iter_mut().find(|e| e.target == edge.target) {
        if edge.distance_km < existing.distance_km {
            *existing = edge;
        }
        return;
    }
    edges.push(edge);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{parse_border_record, CapitalDistanceRecord, RegistryRecord};

    fn records(lines: &[&str]) -> Vec<BorderRecord> {
        lines
            .iter()
            .enumerate()
            .filter_map(|(i, line)| parse_border_record(i as u64 + 1, line).unwrap())
            .collect()
    }

    fn registry(rows: &[(&str, &str)]) -> CountryRegistry {
        let records: Vec<RegistryRecord> = rows
            .iter()
            .enumerate()
            .map(|(i, (code, name))| RegistryRecord {
                line: i as u64 + 2,
                code: code.to_string(),
                name: name.to_string(),
                start: "1900-01-01".parse().unwrap(),
                end: "2020-12-31".parse().unwrap(),
            })
            .collect();
        CountryRegistry::from_records(&records)
    }

    fn capitals(rows: &[(&str, &str, u32)]) -> CapitalDistanceTable {
        let records: Vec<CapitalDistanceRecord> = rows
            .iter()
            .map(|(from, to, km)| CapitalDistanceRecord {
                line: 1,
                from: from.to_string(),
                to: to.to_string(),
                distance_km: *km,
            })
            .collect();
        CapitalDistanceTable::from_records(&records)
    }

    fn build(lines: &[&str], options: &BuildOptions) -> Graph {
        let registry = registry(&[("FOO", "Foo"), ("BAR", "Bar")]);
        let capitals = capitals(&[("FOO", "BAR", 42)]);
        build_graph(
            &records(lines),
            &registry,
            &capitals,
            options,
            &mut LoadReport::default(),
        )
    }

    fn edge_to(graph: &Graph, from: &str, to: &str) -> Option<Edge> {
        let from = graph.node_id(&CountryKey::new(from))?;
        let to = graph.node_id(&CountryKey::new(to))?;
        graph
            .neighbours(from)
            .iter()
            .find(|edge| edge.target == to)
            .cloned()
    }

    #[test]
    fn border_edges_are_mirrored() {
        let graph = build(
            &["Andorra = France 150 km; Spain 200 km"],
            &BuildOptions::default(),
        );

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.edge_count(), 4);
        let back = edge_to(&graph, "spain", "andorra").expect("mirrored edge");
        assert_eq!(back.distance_km, 200);
        assert_eq!(back.kind, EdgeKind::Border);
    }

    #[test]
    fn conflicting_lengths_keep_the_smaller_both_ways() {
        let graph = build(
            &["Andorra = France 150 km", "France = Andorra 57 km"],
            &BuildOptions::default(),
        );
        assert_eq!(edge_to(&graph, "andorra", "france").unwrap().distance_km, 57);
        assert_eq!(edge_to(&graph, "france", "andorra").unwrap().distance_km, 57);
    }

    #[test]
    fn alias_shares_the_node() {
        let graph = build(
            &["Greece = Turkey 192 km", "Turkey (Turkiye) = Greece 192 km"],
            &BuildOptions::default(),
        );
        let primary = graph.node_id(&CountryKey::new("turkey"));
        let alias = graph.node_id(&CountryKey::new("Turkiye"));
        assert!(primary.is_some());
        assert_eq!(primary, alias);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn missing_distance_uses_capital_fallback() {
        let graph = build(&["Foo = Bar km"], &BuildOptions::default());
        let edge = edge_to(&graph, "foo", "bar").expect("fallback edge");
        assert_eq!(edge.distance_km, 42);
        assert_eq!(edge.kind, EdgeKind::CapitalFallback);
    }

    #[test]
    fn missing_distance_without_capital_is_dropped_by_default() {
        let graph = build(&["Foo = Baz km"], &BuildOptions::default());
        assert!(graph.node_id(&CountryKey::new("baz")).is_some());
        assert!(edge_to(&graph, "foo", "baz").is_none());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn policies_are_applied_uniformly() {
        let zero = BuildOptions {
            fallback: FallbackPolicy::Zero,
            ..BuildOptions::default()
        };
        let graph = build(&["Foo = Bar km; Baz km"], &zero);
        assert_eq!(edge_to(&graph, "foo", "bar").unwrap().distance_km, 0);
        assert_eq!(edge_to(&graph, "foo", "baz").unwrap().kind, EdgeKind::ZeroFallback);

        let capital_or_zero = BuildOptions {
            fallback: FallbackPolicy::CapitalOrZero,
            ..BuildOptions::default()
        };
        let graph = build(&["Foo = Bar km; Baz km"], &capital_or_zero);
        assert_eq!(edge_to(&graph, "foo", "bar").unwrap().distance_km, 42);
        assert_eq!(edge_to(&graph, "foo", "baz").unwrap().distance_km, 0);

        let drop = BuildOptions {
            fallback: FallbackPolicy::Drop,
            ..BuildOptions::default()
        };
        let graph = build(&["Foo = Bar km"], &drop);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn neighbour_record_distance_beats_fallback() {
        let zero = BuildOptions {
            fallback: FallbackPolicy::Zero,
            ..BuildOptions::default()
        };
        let graph = build(&["Foo = Bar km", "Bar = Foo 77 km"], &zero);
        assert_eq!(edge_to(&graph, "foo", "bar").unwrap().distance_km, 77);
        assert_eq!(edge_to(&graph, "foo", "bar").unwrap().kind, EdgeKind::Border);
    }

    #[test]
    fn alias_override_joins_graph_and_resolves_code() {
        let options = BuildOptions {
            aliases: vec![AliasOverride::new("Fooland", "Foo")],
            ..BuildOptions::default()
        };
        let graph = build(&["Foo = Bar 10 km"], &options);
        let id = graph.node_id(&CountryKey::new("fooland")).expect("alias added");
        assert_eq!(graph.key(id).map(CountryKey::as_str), Some("foo"));
        assert_eq!(graph.node(id).and_then(|n| n.code.as_deref()), Some("FOO"));
    }

    #[test]
    fn neighbour_spelled_with_override_joins_the_origin() {
        let options = BuildOptions {
            aliases: vec![AliasOverride::new("Hellas", "Greece")],
            ..BuildOptions::default()
        };
        let graph = build(&["Greece = Turkey 192 km", "Bulgaria = Hellas 472 km"], &options);

        assert_eq!(graph.len(), 3);
        let greece = graph.node_id(&CountryKey::new("greece"));
        assert_eq!(graph.node_id(&CountryKey::new("hellas")), greece);
        let edge = edge_to(&graph, "bulgaria", "greece").expect("edge to canonical node");
        assert_eq!(edge.distance_km, 472);
    }

    #[test]
    fn nodes_are_indexed_by_registry_code() {
        let graph = build(&["Foo = Bar 10 km"], &BuildOptions::default());
        let foo = graph.node_id(&CountryKey::new("foo"));
        assert_eq!(graph.node_for_code("foo"), foo);
        assert_eq!(graph.node_for_code("NOPE"), None);
    }

    #[test]
    fn duplicate_records_replace_and_are_reported() {
        let registry = registry(&[]);
        let capitals = capitals(&[]);
        let mut report = LoadReport::default();
        let graph = build_graph(
            &records(&["Foo = Bar 10 km", "Foo = Baz 20 km"]),
            &registry,
            &capitals,
            &BuildOptions::default(),
            &mut report,
        );

        assert!(edge_to(&graph, "foo", "bar").is_none());
        assert_eq!(edge_to(&graph, "foo", "baz").unwrap().distance_km, 20);
        assert_eq!(report.count_for(SourceKind::Borders), 1);
    }

    #[test]
    fn fallback_policy_round_trips_through_text() {
        for policy in [
            FallbackPolicy::CapitalOrDrop,
            FallbackPolicy::CapitalOrZero,
            FallbackPolicy::Zero,
            FallbackPolicy::Drop,
        ] {
            assert_eq!(policy.to_string().parse::<FallbackPolicy>().unwrap(), policy);
        }
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
    }
}
