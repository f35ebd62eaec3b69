//! Directed weighted multigraph with optional per-edge metadata.
//!
//! An edge arena plus, per vertex, an insertion-ordered incidence list and
//! a map from destination to the first edge id reaching it.

use std::collections::HashMap;
use std::sync::Arc;

pub type VertexId = u32;
pub type EdgeId = u32;

/// What an edge represents in the route a rider takes, if anything.
/// `None` marks the zero-weight "free return to root" edges, which never
/// surface in a route answer.
#[derive(Debug, Clone, PartialEq)]
pub enum EdgeItem {
    Wait { stop: Arc<str> },
    Bus { bus: Arc<str> },
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: f64,
    pub item: Option<EdgeItem>,
}

/// Arena-backed graph. `edges` owns every edge; `adjacency` is the
/// insertion-ordered incidence list used for Dijkstra relaxation;
/// `first_edge_to` is the cheap `HasEdge`/`GetEdgeId` index used by map
/// compression, which only needs to know *that* an edge exists, not which
/// of several parallel edges it is.
#[derive(Debug, Default)]
pub struct Graph {
    edges: Vec<Edge>,
    adjacency: Vec<Vec<EdgeId>>,
    first_edge_to: Vec<HashMap<VertexId, EdgeId>>,
}

impl Graph {
    pub fn with_vertex_count(vertex_count: u32) -> Self {
        let n = vertex_count as usize;
        Self {
            edges: Vec::new(),
            adjacency: vec![Vec::new(); n],
            first_edge_to: vec![HashMap::new(); n],
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.adjacency.len() as u32
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Appends an edge, returning its id. Parallel edges between the same
    /// pair of vertices are allowed; only the first one is reachable through
    /// `has_edge`/`edge_id`, but all of them are walked by Dijkstra.
    pub fn add_edge(&mut self, from: VertexId, to: VertexId, weight: f64, item: Option<EdgeItem>) -> EdgeId {
        let id = self.edges.len() as EdgeId;
        self.edges.push(Edge {
            from,
            to,
            weight,
            item,
        });
        self.adjacency[from as usize].push(id);
        self.first_edge_to[from as usize].entry(to).or_insert(id);
        id
    }

    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id as usize]
    }

    /// Outgoing `(destination, edge_id)` pairs from `from`, in insertion order.
    pub fn edges_from(&self, from: VertexId) -> impl Iterator<Item = (VertexId, EdgeId)> + '_ {
        self.adjacency[from as usize]
            .iter()
            .map(move |&id| (self.edges[id as usize].to, id))
    }

    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.first_edge_to[from as usize].contains_key(&to)
    }

    pub fn edge_id(&self, from: VertexId, to: VertexId) -> Option<EdgeId> {
        self.first_edge_to[from as usize].get(&to).copied()
    }
}
