pub mod dijkstra;
pub mod merge;

pub use dijkstra::ParentsCache;
pub use merge::Item;

use crate::graph::{Graph, VertexId};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAnswer {
    pub total_time: f64,
    pub items: Vec<Item>,
}

/// Builds the minimum-time route between two vertices, memoising the Dijkstra
/// run for `from` in `cache`. Returns `None` if `to` is unreachable from
/// `from` — translated by the catalog layer into the in-band "not found"
/// answer, never a panic or propagated error.
pub fn build_route(
    graph: &Graph,
    cache: &ParentsCache,
    from: VertexId,
    to: VertexId,
    vertex_count: u32,
) -> Option<RouteAnswer> {
    let parents_slot = cache.parents_for(graph, from, vertex_count);
    let parents = parents_slot.get().expect("slot is always initialized before being returned");

    if from != to && parents[to as usize].is_none() {
        return None;
    }

    // Walk parents from `to` back to `from`, collecting the reversed vertex path.
    let mut reversed_path = vec![to];
    let mut current = to;
    while current != from {
        let prev = parents[current as usize]?;
        reversed_path.push(prev);
        current = prev;
    }
    reversed_path.reverse();

    let edge_ids: Vec<_> = reversed_path
        .windows(2)
        .map(|pair| {
            graph
                .edge_id(pair[0], pair[1])
                .expect("consecutive vertices on a reconstructed path must be adjacent")
        })
        .collect();

    let (total_time, items) = merge::merge_edges(graph, &edge_ids);
    Some(RouteAnswer { total_time, items })
}
