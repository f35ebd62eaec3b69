//! Per-source Dijkstra with a memoised parents table.
//!
//! The priority queue is keyed on `(tentative_distance, vertex)` pairs;
//! "decrease-key" is simulated by pushing a new, smaller pair and skipping
//! anything popped that no longer matches the best known distance.

use crate::graph::{Graph, VertexId};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

/// Runs Dijkstra from `source`, returning a length-`vertex_count` parents
/// vector (`None` for the source itself and for any unreached vertex).
pub fn parents_from(graph: &Graph, source: VertexId, vertex_count: u32) -> Vec<Option<VertexId>> {
    let n = vertex_count as usize;
    let mut dist = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<VertexId>> = vec![None; n];
    let mut heap = BinaryHeap::new();

    dist[source as usize] = 0.0;
    heap.push(Reverse((OrderedFloat(0.0), source)));

    while let Some(Reverse((OrderedFloat(d), u))) = heap.pop() {
        if d > dist[u as usize] {
            // Stale entry left behind by a cheaper relaxation found later; skip it.
            continue;
        }
        for (v, edge_id) in graph.edges_from(u) {
            let weight = graph.edge(edge_id).weight;
            let candidate = d + weight;
            if candidate < dist[v as usize] {
                dist[v as usize] = candidate;
                parent[v as usize] = Some(u);
                heap.push(Reverse((OrderedFloat(candidate), v)));
            }
        }
    }

    parent
}

/// Per-source parents cache. The coarse lock only guards slot creation; the
/// actual Dijkstra run happens under the slot's own `OnceLock`, so two
/// distinct sources never contend with each other — matching the reference
/// design's "index->slot map, per-slot lock" note.
#[derive(Default)]
pub struct ParentsCache {
    slots: Mutex<HashMap<VertexId, Arc<OnceLock<Vec<Option<VertexId>>>>>>,
}

impl ParentsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the parents vector for `source`, computing and memoising it
    /// on first access.
    pub fn parents_for(&self, graph: &Graph, source: VertexId, vertex_count: u32) -> Arc<OnceLock<Vec<Option<VertexId>>>> {
        let slot = {
            let mut slots = self.slots.lock().expect("parents cache lock poisoned");
            slots.entry(source).or_insert_with(|| Arc::new(OnceLock::new())).clone()
        };
        slot.get_or_init(|| parents_from(graph, source, vertex_count));
        slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_line_shortest_path() {
        let mut g = Graph::with_vertex_count(3);
        g.add_edge(0, 1, 5.0, None);
        g.add_edge(1, 2, 5.0, None);
        g.add_edge(0, 2, 20.0, None);
        let parents = parents_from(&g, 0, 3);
        assert_eq!(parents[0], None);
        assert_eq!(parents[1], Some(0));
        assert_eq!(parents[2], Some(1));
    }

    #[test]
    fn unreachable_vertex_has_no_parent() {
        let g = Graph::with_vertex_count(2);
        let parents = parents_from(&g, 0, 2);
        assert_eq!(parents[1], None);
    }

    #[test]
    fn cache_memoises_per_source() {
        let mut g = Graph::with_vertex_count(2);
        g.add_edge(0, 1, 1.0, None);
        let cache = ParentsCache::new();
        let first = cache.parents_for(&g, 0, 2);
        let second = cache.parents_for(&g, 0, 2);
        assert!(Arc::ptr_eq(&first, &second));
    }
}
