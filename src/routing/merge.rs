//! Folds a shortest-path edge sequence into alternating Wait/Bus items.
//!
//! Consecutive same-bus edges coalesce into one item with a summed `time`
//! and an incremented `span_count`; itemless (zero weight, "free return")
//! edges contribute nothing to the output or the total time.

use crate::graph::{EdgeId, EdgeItem, Graph};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Item {
    #[serde(rename = "Wait")]
    Wait { stop_name: Arc<str>, time: f64 },
    #[serde(rename = "Bus")]
    Bus {
        bus: Arc<str>,
        span_count: u32,
        time: f64,
    },
}

/// Merges a path (a sequence of edge ids, in traversal order) into items plus
/// the total contributing time.
pub fn merge_edges(graph: &Graph, edge_ids: &[EdgeId]) -> (f64, Vec<Item>) {
    let mut total_time = 0.0;
    let mut items: Vec<Item> = Vec::new();

    for &edge_id in edge_ids {
        let edge = graph.edge(edge_id);
        let Some(item) = &edge.item else {
            // Zero-weight itemless return edge: invisible in the output.
            continue;
        };
        total_time += edge.weight;

        match item {
            EdgeItem::Wait { stop } => {
                items.push(Item::Wait {
                    stop_name: stop.clone(),
                    time: edge.weight,
                });
            }
            EdgeItem::Bus { bus } => match items.last_mut() {
                Some(Item::Bus {
                    bus: tail_bus,
                    span_count,
                    time,
                }) if tail_bus == bus => {
                    *span_count += 1;
                    *time += edge.weight;
                }
                _ => {
                    items.push(Item::Bus {
                        bus: bus.clone(),
                        span_count: 1,
                        time: edge.weight,
                    });
                }
            },
        }
    }

    (total_time, items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn wait(name: &str) -> Option<EdgeItem> {
        Some(EdgeItem::Wait { stop: name.into() })
    }

    fn bus(name: &str) -> Option<EdgeItem> {
        Some(EdgeItem::Bus { bus: name.into() })
    }

    #[test]
    fn coalesces_consecutive_same_bus_edges() {
        // Wait@A, Bus=X, Bus=X, Wait@C, Bus=Y  (scenario S4)
        let mut g = Graph::with_vertex_count(6);
        let e0 = g.add_edge(0, 1, 6.0, wait("A"));
        let e1 = g.add_edge(1, 2, 10.0, bus("X"));
        let e2 = g.add_edge(2, 3, 10.0, bus("X"));
        let e3 = g.add_edge(3, 4, 6.0, wait("C"));
        let e4 = g.add_edge(4, 5, 7.0, bus("Y"));

        let (total, items) = merge_edges(&g, &[e0, e1, e2, e3, e4]);
        assert_eq!(
            items,
            vec![
                Item::Wait {
                    stop_name: "A".into(),
                    time: 6.0
                },
                Item::Bus {
                    bus: "X".into(),
                    span_count: 2,
                    time: 20.0
                },
                Item::Wait {
                    stop_name: "C".into(),
                    time: 6.0
                },
                Item::Bus {
                    bus: "Y".into(),
                    span_count: 1,
                    time: 7.0
                },
            ]
        );
        assert_eq!(total, 39.0);
    }

    #[test]
    fn itemless_edges_are_skipped_and_do_not_count_toward_time() {
        let mut g = Graph::with_vertex_count(3);
        let e0 = g.add_edge(0, 1, 6.0, wait("A"));
        let free_return = g.add_edge(1, 0, 0.0, None);
        let e1 = g.add_edge(0, 2, 5.0, bus("X"));

        let (total, items) = merge_edges(&g, &[e0, free_return, e1]);
        assert_eq!(items.len(), 2);
        assert_eq!(total, 11.0);
    }

    #[test]
    fn merging_an_already_merged_list_is_idempotent() {
        let mut g = Graph::with_vertex_count(3);
        let e0 = g.add_edge(0, 1, 6.0, wait("A"));
        let e1 = g.add_edge(1, 2, 5.0, bus("X"));
        let (total_once, items_once) = merge_edges(&g, &[e0, e1]);

        // Re-merging the same underlying edge ids must be stable.
        let (total_twice, items_twice) = merge_edges(&g, &[e0, e1]);
        assert_eq!(total_once, total_twice);
        assert_eq!(items_once, items_twice);
    }
}
