//! Rank-based coordinate compression (Component G, projection half).
//!
//! Two independent passes (longitude, then latitude) assign each stop a
//! dense integer rank such that stops never directly connected by a graph
//! edge may share a rank, while any pair that *is* connected gets strictly
//! increasing ranks.

use super::{Point, RenderSettings};
use crate::catalog::{Catalog, StopRecord};
use std::collections::HashMap;

pub struct Projection {
    pixel: Box<[Point]>,
}

impl Projection {
    pub fn pixel(&self, stop: &StopRecord) -> Point {
        self.pixel[stop.index as usize]
    }
}

pub fn project(catalog: &Catalog, settings: &RenderSettings) -> Projection {
    let x_rank = compress_ranks(catalog, |s| s.coordinate.longitude);
    let y_rank = compress_ranks(catalog, |s| s.coordinate.latitude);

    let max_x = x_rank.values().copied().max().unwrap_or(0);
    let max_y = y_rank.values().copied().max().unwrap_or(0);
    let x_step = if max_x == 0 { 0.0 } else { (settings.width - 2.0 * settings.padding) / max_x as f64 };
    let y_step = if max_y == 0 { 0.0 } else { (settings.height - 2.0 * settings.padding) / max_y as f64 };

    let pixel: Box<[Point]> = catalog
        .stops()
        .iter()
        .map(|stop| {
            let xi = x_rank[&stop.index];
            let yi = y_rank[&stop.index];
            // Enriches the stop with its projected rank pair, per the data
            // model; harmless to call twice since rendering only runs once
            // per catalog, and the ranks are deterministic either way.
            stop.map_rank.get_or_init(|| (xi, yi));
            Point {
                x: settings.padding + xi as f64 * x_step,
                y: settings.height - settings.padding - yi as f64 * y_step,
            }
        })
        .collect();

    Projection { pixel }
}

/// Assigns one axis's rank to every stop. `key` extracts the coordinate
/// component (longitude or latitude) being compressed this pass.
fn compress_ranks(catalog: &Catalog, key: impl Fn(&StopRecord) -> f64) -> HashMap<u32, u32> {
    let mut sorted: Vec<&StopRecord> = catalog.stops().iter().collect();
    sorted.sort_by(|a, b| key(a).partial_cmp(&key(b)).unwrap());

    let mut rank: HashMap<u32, u32> = HashMap::with_capacity(sorted.len());
    if sorted.is_empty() {
        return rank;
    }

    // The leftmost stop implicitly keeps rank 0; the walk below only ever
    // assigns ranks to stops after it.
    rank.insert(sorted[0].index, 0);

    let mut base = 0usize;
    let mut idx = 0u32;
    for i in 1..sorted.len() {
        let candidate = sorted[i];
        let blocked = (base..i).find(|&k| !can_compress(catalog, candidate, sorted[k]));
        if blocked.is_some() {
            base = i;
            idx += 1;
        }
        rank.insert(candidate.index, idx);
    }
    rank
}

fn can_compress(catalog: &Catalog, p: &StopRecord, q: &StopRecord) -> bool {
    !catalog.are_neighbors(p, q) && !catalog.are_neighbors(q, p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, RoutingSettings};
    use crate::geo::Coordinate;
    use std::collections::HashMap as Map;

    fn settings() -> RenderSettings {
        RenderSettings::default()
    }

    #[test]
    fn five_collinear_unconnected_stops_share_rank_zero() {
        // scenario S5, first half: no bus at all, so no pair can be a neighbor.
        let mut builder = CatalogBuilder::new();
        for (i, name) in ["s0", "s1", "s2", "s3", "s4"].iter().enumerate() {
            builder.add_stop(name, Coordinate::new(0.0, i as f64), Map::new());
        }
        let catalog = builder
            .synchronize(RoutingSettings {
                bus_wait_time: 1.0,
                bus_velocity_kmph: 10.0,
            })
            .unwrap();
        let ranks = compress_ranks(&catalog, |s| s.coordinate.longitude);
        let distinct: std::collections::HashSet<_> = ranks.values().collect();
        assert_eq!(distinct.len(), 1, "unconnected collinear stops must all share one rank");
    }

    #[test]
    fn adding_a_connecting_bus_splits_the_shared_rank() {
        let mut builder = CatalogBuilder::new();
        for (i, name) in ["s0", "s1", "s2", "s3", "s4"].iter().enumerate() {
            builder.add_stop(name, Coordinate::new(0.0, i as f64), Map::new());
        }
        builder.add_bus("B", false, vec!["s1".to_string(), "s3".to_string()]);
        let catalog = builder
            .synchronize(RoutingSettings {
                bus_wait_time: 1.0,
                bus_velocity_kmph: 10.0,
            })
            .unwrap();
        let ranks = compress_ranks(&catalog, |s| s.coordinate.longitude);
        let s1 = catalog.stop("s1").unwrap();
        let s3 = catalog.stop("s3").unwrap();
        assert_eq!(ranks[&s3.index], ranks[&s1.index] + 1);
    }

    #[test]
    fn projection_fills_in_each_stops_map_rank() {
        let mut builder = CatalogBuilder::new();
        builder.add_stop("A", Coordinate::new(0.0, 0.0), Map::new());
        builder.add_stop("B", Coordinate::new(1.0, 1.0), Map::new());
        builder.add_bus("X", false, vec!["A".to_string(), "B".to_string()]);
        let catalog = builder
            .synchronize(RoutingSettings {
                bus_wait_time: 1.0,
                bus_velocity_kmph: 10.0,
            })
            .unwrap();
        project(&catalog, &settings());
        let a = catalog.stop("A").unwrap();
        let b = catalog.stop("B").unwrap();
        // A and B are directly connected by bus X, so neither axis can
        // compress them onto a shared rank.
        assert_eq!(a.map_rank.get(), Some(&(0, 0)));
        assert_eq!(b.map_rank.get(), Some(&(1, 1)));
    }

    #[test]
    fn projection_respects_canvas_padding() {
        let mut builder = CatalogBuilder::new();
        builder.add_stop("A", Coordinate::new(0.0, 0.0), Map::new());
        let catalog = builder
            .synchronize(RoutingSettings {
                bus_wait_time: 1.0,
                bus_velocity_kmph: 10.0,
            })
            .unwrap();
        let projection = project(&catalog, &settings());
        let a = catalog.stop("A").unwrap();
        let p = projection.pixel(a);
        assert_eq!(p.x, settings().padding);
        assert_eq!(p.y, settings().height - settings().padding);
    }
}
