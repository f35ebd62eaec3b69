//! The stop/bus store (Component B), vertex allocator (Component C), and
//! graph builder (Component D), plus the frozen [`Catalog`] query surface.
//!
//! An ingest-then-freeze lifecycle: a mutable [`CatalogBuilder`] accumulates
//! stops and buses, then `synchronize()` produces an immutable [`Catalog`]
//! backed by `Box<[T]>` arrays, signaling by type that nothing past this
//! point can mutate.

mod entities;
pub mod error;

pub use entities::{Bus, BusRecord, RouteStats, Stop, StopRecord};
pub use error::SyncError;

use crate::geo::{self, Coordinate};
use crate::graph::{EdgeItem, Graph, VertexId};
use crate::render::{self, RenderError, RenderSettings};
use crate::routing::{self, ParentsCache, RouteAnswer};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use thiserror::Error;
use tracing::{debug, warn};

/// Settings fixed for the lifetime of a catalog; these never change after
/// `synchronize()`.
#[derive(Debug, Clone, Copy)]
pub struct RoutingSettings {
    pub bus_wait_time: f64,
    pub bus_velocity_kmph: f64,
}

/// Query-time failure: the reference name (stop/bus) does not exist, or a
/// route has no path. Always answered in-band — see
/// `crate::request::answer`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("not found")]
    NotFound,
}

/// Mutable ingestion phase. Accepts stops and buses in any order; names may
/// be added in either order since cross-references are resolved, not
/// pointer-linked, until `synchronize()` validates them.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    stops: HashMap<Arc<str>, Stop>,
    buses: HashMap<Arc<str>, Bus>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_stop(&mut self, name: &str, coordinate: Coordinate, road_distances: HashMap<String, u32>) {
        let name: Arc<str> = name.into();
        let road_distances = road_distances.into_iter().map(|(k, v)| (Arc::from(k), v)).collect();
        self.stops.insert(
            name.clone(),
            Stop {
                name,
                coordinate,
                road_distances,
            },
        );
    }

    /// Adds a bus. A round-trip waybill whose input repeats its first stop
    /// as its last has that duplicate dropped before storage, so the stored
    /// waybill never repeats its endpoint.
    pub fn add_bus(&mut self, name: &str, is_roundtrip: bool, mut stops: Vec<String>) {
        if is_roundtrip && stops.len() > 1 && stops.first() == stops.last() {
            stops.pop();
        }
        let name: Arc<str> = name.into();
        let waybill = stops.into_iter().map(Arc::from).collect();
        self.buses.insert(
            name.clone(),
            Bus {
                name,
                waybill,
                is_roundtrip,
            },
        );
    }

    /// Freezes the catalog: validates cross-references, allocates vertex
    /// blocks, and builds the routing graph. Returns a
    /// [`SyncError`] if any waybill references an unknown stop — a
    /// configuration error the caller must treat as fatal.
    pub fn synchronize(self, routing_settings: RoutingSettings) -> Result<Catalog, SyncError> {
        let CatalogBuilder { stops, buses } = self;

        let mut stop_names: Vec<Arc<str>> = stops.keys().cloned().collect();
        stop_names.sort();
        let mut bus_names: Vec<Arc<str>> = buses.keys().cloned().collect();
        bus_names.sort();

        for bus_name in &bus_names {
            let bus = &buses[bus_name];
            for stop_name in &bus.waybill {
                if !stops.contains_key(stop_name) {
                    return Err(SyncError::UnknownStopInWaybill {
                        bus: bus_name.to_string(),
                        stop: stop_name.to_string(),
                    });
                }
            }
            if bus.waybill.len() < 2 {
                warn!(bus = %bus_name, "bus has fewer than two stops");
            }
        }

        // Component C: vertex allocation. Count bus passes per stop, then
        // assign contiguous blocks over stops sorted by name.
        let mut bus_passes_count: HashMap<Arc<str>, u32> = stop_names.iter().map(|n| (n.clone(), 0)).collect();
        let mut buses_by_stop: HashMap<Arc<str>, Vec<Arc<str>>> = HashMap::new();
        for bus_name in &bus_names {
            let bus = &buses[bus_name];
            for stop_name in &bus.waybill {
                *bus_passes_count.get_mut(stop_name).unwrap() += 1;
                let entry = buses_by_stop.entry(stop_name.clone()).or_default();
                if entry.last() != Some(bus_name) {
                    entry.push(bus_name.clone());
                }
            }
        }

        let mut root_vertex_id: HashMap<Arc<str>, u32> = HashMap::with_capacity(stop_names.len());
        let mut r: u32 = 0;
        for name in &stop_names {
            root_vertex_id.insert(name.clone(), r);
            r += bus_passes_count[name] + 1;
        }
        let vertex_count = r;

        // Component D, phase 1: wait edges.
        let mut graph = Graph::with_vertex_count(vertex_count);
        for name in &stop_names {
            let root = root_vertex_id[name];
            let passes = bus_passes_count[name];
            for i in 0..passes {
                let transit = root + i + 1;
                graph.add_edge(
                    root,
                    transit,
                    routing_settings.bus_wait_time,
                    Some(EdgeItem::Wait { stop: name.clone() }),
                );
                graph.add_edge(transit, root, 0.0, None);
            }
        }

        // Component D, phase 2: travel edges.
        let mut used: HashMap<Arc<str>, u32> = stop_names.iter().map(|n| (n.clone(), 0)).collect();
        for bus_name in &bus_names {
            let bus = &buses[bus_name];
            let waybill = &bus.waybill;
            // `used[stop]` advances once per waybill position, including the
            // waybill's last stop (which never starts an edge but still
            // occupies a transit vertex on arrival) — this is what makes the
            // round-trip closing edge below land on the right vertex.
            for i in 0..waybill.len() {
                let cur = &waybill[i];
                let cur_root = root_vertex_id[cur];

                if let Some(nxt) = waybill.get(i + 1) {
                    let nxt_root = root_vertex_id[nxt];
                    let from = cur_root + used[cur] + 1;
                    let to = nxt_root + used[nxt] + 1;

                    let forward_distance = real_distance(&stops, cur, nxt);
                    let forward_weight = geo::travel_minutes(forward_distance, routing_settings.bus_velocity_kmph);
                    graph.add_edge(from, to, forward_weight, Some(EdgeItem::Bus { bus: bus_name.clone() }));

                    if !bus.is_roundtrip {
                        let from_prime = if i != 0 { from } else { cur_root };
                        let backward_distance = real_distance(&stops, nxt, cur);
                        let backward_weight = geo::travel_minutes(backward_distance, routing_settings.bus_velocity_kmph);
                        graph.add_edge(to, from_prime, backward_weight, Some(EdgeItem::Bus { bus: bus_name.clone() }));
                    }
                }

                *used.get_mut(cur).unwrap() += 1;
            }

            if bus.is_roundtrip && waybill.len() >= 2 {
                let last = waybill.last().unwrap();
                let first = waybill.first().unwrap();
                let last_transit = root_vertex_id[last] + used[last];
                let first_root = root_vertex_id[first];
                let closing_distance = real_distance(&stops, last, first);
                let closing_weight = geo::travel_minutes(closing_distance, routing_settings.bus_velocity_kmph);
                graph.add_edge(
                    last_transit,
                    first_root,
                    closing_weight,
                    Some(EdgeItem::Bus { bus: bus_name.clone() }),
                );
            }
        }

        debug!(
            stops = stop_names.len(),
            buses = bus_names.len(),
            vertices = vertex_count,
            edges = graph.edge_count(),
            "synchronized catalog"
        );

        let stop_index: HashMap<Arc<str>, u32> = stop_names.iter().enumerate().map(|(i, n)| (n.clone(), i as u32)).collect();
        let bus_index: HashMap<Arc<str>, u32> = bus_names.iter().enumerate().map(|(i, n)| (n.clone(), i as u32)).collect();

        let stop_records: Box<[StopRecord]> = stop_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let stop = &stops[name];
                let mut buses_here = buses_by_stop.get(name).cloned().unwrap_or_default();
                buses_here.sort();
                buses_here.dedup();
                StopRecord {
                    index: index as u32,
                    name: name.clone(),
                    coordinate: stop.coordinate,
                    road_distances: stop.road_distances.clone(),
                    buses: buses_here,
                    bus_passes_count: bus_passes_count[name],
                    root_vertex_id: root_vertex_id[name],
                    map_rank: OnceLock::new(),
                }
            })
            .collect();

        let bus_records: Box<[BusRecord]> = bus_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let bus = &buses[name];
                BusRecord {
                    index: index as u32,
                    name: name.clone(),
                    waybill: bus.waybill.clone(),
                    is_roundtrip: bus.is_roundtrip,
                    stats: OnceLock::new(),
                }
            })
            .collect();

        Ok(Catalog {
            stops: stop_records,
            buses: bus_records,
            stop_index,
            bus_index,
            graph,
            vertex_count,
            routing_settings,
            parents_cache: ParentsCache::new(),
            map_cache: OnceLock::new(),
        })
    }
}

fn real_distance(stops: &HashMap<Arc<str>, Stop>, a: &Arc<str>, b: &Arc<str>) -> f64 {
    let stop_a = &stops[a];
    if let Some(d) = stop_a.road_distances.get(b) {
        return *d as f64;
    }
    let stop_b = &stops[b];
    if let Some(d) = stop_b.road_distances.get(a) {
        return *d as f64;
    }
    geo::great_circle_distance_m(stop_a.coordinate, stop_b.coordinate)
}

/// The frozen, query-ready catalog produced by [`CatalogBuilder::synchronize`].
/// Everything here is read-only except the parents cache and the lazily
/// computed map render cache (both behind interior mutability, never
/// exposed as `&mut`).
pub struct Catalog {
    stops: Box<[StopRecord]>,
    buses: Box<[BusRecord]>,
    stop_index: HashMap<Arc<str>, u32>,
    bus_index: HashMap<Arc<str>, u32>,
    pub graph: Graph,
    pub vertex_count: u32,
    routing_settings: RoutingSettings,
    parents_cache: ParentsCache,
    map_cache: OnceLock<Result<String, RenderError>>,
}

impl Catalog {
    pub fn stop(&self, name: &str) -> Option<&StopRecord> {
        let index = *self.stop_index.get(name)?;
        Some(&self.stops[index as usize])
    }

    pub fn bus(&self, name: &str) -> Option<&BusRecord> {
        let index = *self.bus_index.get(name)?;
        Some(&self.buses[index as usize])
    }

    pub fn stops(&self) -> &[StopRecord] {
        &self.stops
    }

    pub fn buses(&self) -> &[BusRecord] {
        &self.buses
    }

    /// Great-circle and road distance between two named stops, per §4.B's
    /// lookup rule (own distance, then the neighbor's, then great-circle
    /// fallback).
    pub fn distance(&self, a: &str, b: &str) -> Option<(f64, f64)> {
        let stop_a = self.stop(a)?;
        let stop_b = self.stop(b)?;
        let geographic = geo::great_circle_distance_m(stop_a.coordinate, stop_b.coordinate);
        let real = if let Some(d) = stop_a.road_distances.get(b) {
            *d as f64
        } else if let Some(d) = stop_b.road_distances.get(a) {
            *d as f64
        } else {
            geographic
        };
        Some((geographic, real))
    }

    /// Route statistics for a bus, computed on first access and memoised.
    pub fn bus_stats(&self, name: &str) -> Result<RouteStats, QueryError> {
        let record = self.bus(name).ok_or(QueryError::NotFound)?;
        Ok(*record.stats.get_or_init(|| self.compute_bus_stats(record)))
    }

    fn compute_bus_stats(&self, bus: &BusRecord) -> RouteStats {
        let waybill = &bus.waybill;
        let n = waybill.len();
        let stop_count = if bus.is_roundtrip { n as u32 + 1 } else { (n as u32).saturating_mul(2).saturating_sub(1) };
        let unique_stop_count = {
            let mut seen: Vec<&Arc<str>> = waybill.iter().collect();
            seen.sort();
            seen.dedup();
            seen.len() as u32
        };

        let segments: Vec<(usize, usize)> = if bus.is_roundtrip {
            (0..n).map(|i| (i, (i + 1) % n)).collect()
        } else {
            (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect()
        };

        // For non-roundtrip buses the return leg's road distance is looked
        // up independently (it need not equal the outbound leg's under the
        // asymmetric fallback rule in `distance`), so each direction is
        // summed on its own rather than doubling the forward leg.
        let mut geographic_length_m = 0.0;
        let mut road_length_m = 0.0;
        for (i, j) in segments {
            if let Some((geo_d, road_d)) = self.distance(&waybill[i], &waybill[j]) {
                geographic_length_m += geo_d;
                road_length_m += road_d;
                if !bus.is_roundtrip {
                    let (back_geo_d, back_road_d) = self.distance(&waybill[j], &waybill[i]).unwrap();
                    geographic_length_m += back_geo_d;
                    road_length_m += back_road_d;
                }
            }
        }

        let curvature = if geographic_length_m > crate::geo::EPSILON {
            road_length_m / geographic_length_m
        } else {
            1.0
        };

        RouteStats {
            stop_count,
            unique_stop_count,
            geographic_length_m,
            road_length_m,
            curvature,
        }
    }

    /// Bus names passing through a stop, sorted ascending.
    pub fn stop_buses(&self, name: &str) -> Result<&[Arc<str>], QueryError> {
        Ok(&self.stop(name).ok_or(QueryError::NotFound)?.buses)
    }

    /// Minimum-time route between two named stops, reconstructed from their
    /// root vertices.
    pub fn route(&self, from: &str, to: &str) -> Result<RouteAnswer, QueryError> {
        let from_root = self.stop(from).ok_or(QueryError::NotFound)?.root_vertex_id;
        let to_root = self.stop(to).ok_or(QueryError::NotFound)?.root_vertex_id;
        routing::build_route(&self.graph, &self.parents_cache, from_root, to_root, self.vertex_count)
            .ok_or(QueryError::NotFound)
    }

    pub fn routing_settings(&self) -> RoutingSettings {
        self.routing_settings
    }

    /// Renders the SVG map, computing it once on first access and
    /// thereafter returning the cached document — the render settings used
    /// for the first call stick for the catalog's lifetime, matching the
    /// "computed once, read-only after" render cache the data model
    /// describes.
    pub fn map(&self, settings: &RenderSettings) -> Result<&str, RenderError> {
        let result = self.map_cache.get_or_init(|| render::render(self, settings));
        result.as_deref().map_err(Clone::clone)
    }

    /// Whether any transit vertex of `p` has an edge to any transit or root
    /// vertex of `q` — the "neighbor on a route" relation used by map
    /// compression (Component G).
    pub fn are_neighbors(&self, p: &StopRecord, q: &StopRecord) -> bool {
        for i in 1..=p.bus_passes_count {
            let from = p.root_vertex_id + i;
            for to in q.vertex_block() {
                if self.graph.has_edge(from, to) {
                    return true;
                }
            }
        }
        false
    }
}
