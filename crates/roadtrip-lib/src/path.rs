use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::graph::{Graph, NodeId};

/// Run Dijkstra's algorithm to find the lowest-total-distance path between
/// `start` and `goal`.
///
/// Returns the visited nodes from `start` to `goal` inclusive, or `None` when
/// no border chain connects them. All per-query state lives in this call, so a
/// shared [`Graph`] can serve concurrent queries.
pub fn find_route_dijkstra(graph: &Graph, start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
    if start >= graph.len() || goal >= graph.len() {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut distances = vec![u64::MAX; graph.len()];
    let mut parents: Vec<Option<NodeId>> = vec![None; graph.len()];
    let mut visited = vec![false; graph.len()];
    let mut queue = BinaryHeap::new();

    distances[start] = 0;
    queue.push(QueueEntry::new(start, 0));

    while let Some(entry) = queue.pop() {
        // Stale entries for already settled nodes are skipped rather than
        // removed from the heap.
        if visited[entry.node] {
            continue;
        }
        visited[entry.node] = true;

        if entry.node == goal {
            return reconstruct_path(&parents, start, goal);
        }

        for edge in graph.neighbours(entry.node) {
            let next = edge.target;
            if visited[next] {
                continue;
            }

            let next_cost = entry.cost + u64::from(edge.distance_km);
            if next_cost < distances[next] {
                distances[next] = next_cost;
                parents[next] = Some(entry.node);
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

fn reconstruct_path(parents: &[Option<NodeId>], start: NodeId, goal: NodeId) -> Option<Vec<NodeId>> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = parents.get(current).copied().flatten()?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: u64,
}

impl QueueEntry {
    fn new(node: NodeId, cost: u64) -> Self {
        Self { node, cost }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
