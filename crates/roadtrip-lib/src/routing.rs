use std::fmt;

use serde::Serialize;

use crate::graph::{EdgeKind, Graph, NodeId};
use crate::path::find_route_dijkstra;

/// A single border crossing within a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteHop {
    pub from: String,
    pub to: String,
    /// Weight of this edge alone, not the running total.
    pub distance_km: u32,
    pub kind: EdgeKind,
}

impl fmt::Display for RouteHop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --> {} ({} km.)", self.from, self.to, self.distance_km)
    }
}

/// Planned route returned by the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutePlan {
    pub start: String,
    pub goal: String,
    pub hops: Vec<RouteHop>,
    pub total_km: u64,
}

impl RoutePlan {
    /// Number of border crossings in the route.
    pub fn hop_count(&self) -> usize {
        self.hops.len()
    }

    /// `"X --> Y (N km.)"` descriptors, in travel order.
    pub fn descriptors(&self) -> Vec<String> {
        self.hops.iter().map(ToString::to_string).collect()
    }
}

/// Compute the shortest route between two nodes and describe it hop by hop.
///
/// Returns `None` when the nodes are not connected by any chain of borders.
pub fn plan_route(graph: &Graph, start: NodeId, goal: NodeId) -> Option<RoutePlan> {
    let path = find_route_dijkstra(graph, start, goal)?;

    let hops = path
        .windows(2)
        .map(|pair| {
            let edge = graph
                .neighbours(pair[0])
                .iter()
                .find(|edge| edge.target == pair[1])?;
            Some(RouteHop {
                from: graph.key(pair[0])?.to_string(),
                to: graph.key(pair[1])?.to_string(),
                distance_km: edge.distance_km,
                kind: edge.kind,
            })
        })
        .collect::<Option<Vec<_>>>()?;

    let total_km = hops.iter().map(|hop| u64::from(hop.distance_km)).sum();

    Some(RoutePlan {
        start: graph.key(start)?.to_string(),
        goal: graph.key(goal)?.to_string(),
        hops,
        total_km,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_renders_per_edge_distance() {
        let hop = RouteHop {
            from: "andorra".to_string(),
            to: "france".to_string(),
            distance_km: 150,
            kind: EdgeKind::Border,
        };
        assert_eq!(hop.to_string(), "andorra --> france (150 km.)");
    }

    #[test]
    fn plan_counts_hops_and_lists_descriptors() {
        let plan = RoutePlan {
            start: "a".to_string(),
            goal: "c".to_string(),
            hops: vec![
                RouteHop {
                    from: "a".to_string(),
                    to: "b".to_string(),
                    distance_km: 5,
                    kind: EdgeKind::Border,
                },
                RouteHop {
                    from: "b".to_string(),
                    to: "c".to_string(),
                    distance_km: 7,
                    kind: EdgeKind::CapitalFallback,
                },
            ],
            total_km: 12,
        };
        assert_eq!(plan.hop_count(), 2);
        assert_eq!(
            plan.descriptors(),
            vec!["a --> b (5 km.)".to_string(), "b --> c (7 km.)".to_string()]
        );
    }
}
