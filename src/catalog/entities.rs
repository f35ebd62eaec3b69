use crate::geo::Coordinate;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// A stop as supplied to [`crate::catalog::CatalogBuilder::add_stop`], before
/// vertex allocation.
#[derive(Debug, Clone)]
pub struct Stop {
    pub name: Arc<str>,
    pub coordinate: Coordinate,
    /// Road distance, in meters, to named neighbors. Asymmetric: `a`'s
    /// distance to `b` need not equal `b`'s distance to `a`.
    pub road_distances: HashMap<Arc<str>, u32>,
}

/// A bus as supplied to [`crate::catalog::CatalogBuilder::add_bus`]. The
/// waybill has already had its duplicated round-trip endpoint removed by the
/// time it reaches this struct — see `CatalogBuilder::add_bus`.
#[derive(Debug, Clone)]
pub struct Bus {
    pub name: Arc<str>,
    pub waybill: Vec<Arc<str>>,
    pub is_roundtrip: bool,
}

/// Per-route statistics, computed once per bus and cached.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteStats {
    pub stop_count: u32,
    pub unique_stop_count: u32,
    pub geographic_length_m: f64,
    pub road_length_m: f64,
    pub curvature: f64,
}

/// A stop after `synchronize()`: enriched with bus membership and its
/// vertex-block assignment. Frozen — there is no public way to mutate one
/// once a [`crate::catalog::Catalog`] exists.
#[derive(Debug)]
pub struct StopRecord {
    pub index: u32,
    pub name: Arc<str>,
    pub coordinate: Coordinate,
    pub road_distances: HashMap<Arc<str>, u32>,
    /// Names of buses passing through this stop, sorted ascending.
    pub buses: Vec<Arc<str>>,
    pub bus_passes_count: u32,
    pub root_vertex_id: u32,
    /// Rank-compressed projection coordinates, filled in by `render::project`.
    pub map_rank: OnceLock<(u32, u32)>,
}

impl StopRecord {
    /// The vertex block owned by this stop: `[root, root + bus_passes_count]`.
    pub fn vertex_block(&self) -> std::ops::RangeInclusive<u32> {
        self.root_vertex_id..=(self.root_vertex_id + self.bus_passes_count)
    }
}

/// A bus after `synchronize()`.
#[derive(Debug)]
pub struct BusRecord {
    pub index: u32,
    pub name: Arc<str>,
    pub waybill: Vec<Arc<str>>,
    pub is_roundtrip: bool,
    pub stats: OnceLock<RouteStats>,
}
