//! The JSON façade (Component H): the single place in this crate that knows
//! about `serde_json`. Converts the wire document into `CatalogBuilder`
//! calls, dispatches `stat_requests`, and serializes answers — the core
//! (`catalog`, `graph`, `routing`, `render`) never depends on a JSON shape.

use crate::catalog::{Catalog, CatalogBuilder, QueryError, RoutingSettings};
use crate::geo::Coordinate;
use crate::render::RenderSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Deserialize)]
pub struct Document {
    pub base_requests: Vec<BaseRequest>,
    pub stat_requests: Vec<StatRequest>,
    pub routing_settings: WireRoutingSettings,
    #[serde(default)]
    pub render_settings: Option<RenderSettings>,
}

#[derive(Debug, Deserialize)]
pub struct WireRoutingSettings {
    pub bus_wait_time: f64,
    pub bus_velocity: f64,
}

impl From<WireRoutingSettings> for RoutingSettings {
    fn from(wire: WireRoutingSettings) -> Self {
        RoutingSettings {
            bus_wait_time: wire.bus_wait_time,
            bus_velocity_kmph: wire.bus_velocity,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum BaseRequest {
    Stop {
        name: String,
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        road_distances: HashMap<String, u32>,
    },
    Bus {
        name: String,
        is_roundtrip: bool,
        stops: Vec<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum StatRequest {
    Bus { id: u64, name: String },
    Stop { id: u64, name: String },
    Route { id: u64, from: String, to: String },
    Map { id: u64 },
}

/// Folds `base_requests` into a builder. The field order within each request
/// does not matter; cross-references are resolved later by
/// [`CatalogBuilder::synchronize`].
pub fn build_catalog(base_requests: Vec<BaseRequest>) -> CatalogBuilder {
    let mut builder = CatalogBuilder::new();
    for request in base_requests {
        match request {
            BaseRequest::Stop {
                name,
                latitude,
                longitude,
                road_distances,
            } => {
                builder.add_stop(crate::text::trim(&name), Coordinate::new(latitude, longitude), road_distances);
            }
            BaseRequest::Bus { name, is_roundtrip, stops } => {
                let stops = stops.into_iter().map(|s| crate::text::trim(&s).to_string()).collect();
                builder.add_bus(crate::text::trim(&name), is_roundtrip, stops);
            }
        }
    }
    builder
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Answer {
    Bus {
        request_id: u64,
        route_length: f64,
        curvature: f64,
        stop_count: u32,
        unique_stop_count: u32,
    },
    Stop {
        request_id: u64,
        buses: Vec<String>,
    },
    Route {
        request_id: u64,
        total_time: f64,
        items: Vec<crate::routing::Item>,
    },
    Map {
        request_id: u64,
        map: String,
    },
    Error {
        request_id: u64,
        error_message: &'static str,
    },
}

/// Answers one `stat_requests` entry. Missing stop/bus references and
/// unreachable routes surface as the in-band `error_message` shape, never a
/// panic or propagated error.
pub fn answer(catalog: &Catalog, render_settings: &RenderSettings, request: StatRequest) -> Answer {
    match request {
        StatRequest::Bus { id, name } => match catalog.bus_stats(crate::text::trim(&name)) {
            Ok(stats) => Answer::Bus {
                request_id: id,
                route_length: stats.road_length_m,
                curvature: stats.curvature,
                stop_count: stats.stop_count,
                unique_stop_count: stats.unique_stop_count,
            },
            Err(QueryError::NotFound) => not_found(id),
        },
        StatRequest::Stop { id, name } => match catalog.stop_buses(crate::text::trim(&name)) {
            Ok(buses) => Answer::Stop {
                request_id: id,
                buses: buses.iter().map(|b| b.to_string()).collect(),
            },
            Err(QueryError::NotFound) => not_found(id),
        },
        StatRequest::Route { id, from, to } => match catalog.route(crate::text::trim(&from), crate::text::trim(&to)) {
            Ok(route) => Answer::Route {
                request_id: id,
                total_time: route.total_time,
                items: route.items,
            },
            Err(QueryError::NotFound) => not_found(id),
        },
        StatRequest::Map { id } => match catalog.map(render_settings) {
            Ok(map) => Answer::Map { request_id: id, map: map.to_string() },
            Err(err) => {
                tracing::error!(%err, "map render failed");
                not_found(id)
            }
        },
    }
}

fn not_found(request_id: u64) -> Answer {
    Answer::Error {
        request_id,
        error_message: "not found",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RoutingSettings;

    fn settings() -> RoutingSettings {
        RoutingSettings {
            bus_wait_time: 6.0,
            bus_velocity_kmph: 40.0,
        }
    }

    fn catalog_s1() -> Catalog {
        let requests = vec![
            BaseRequest::Stop {
                name: "A".to_string(),
                latitude: 0.0,
                longitude: 0.0,
                road_distances: [("B".to_string(), 3_000u32)].into(),
            },
            BaseRequest::Stop {
                name: "B".to_string(),
                latitude: 0.0,
                longitude: 1.0,
                road_distances: HashMap::new(),
            },
            BaseRequest::Bus {
                name: "X".to_string(),
                is_roundtrip: false,
                stops: vec!["A".to_string(), "B".to_string()],
            },
        ];
        build_catalog(requests).synchronize(settings()).unwrap()
    }

    #[test]
    fn bus_stat_request_answers_with_route_stats() {
        let catalog = catalog_s1();
        let render_settings = RenderSettings::default();
        let answer = answer(&catalog, &render_settings, StatRequest::Bus { id: 1, name: "X".to_string() });
        match answer {
            Answer::Bus { request_id, stop_count, unique_stop_count, .. } => {
                assert_eq!(request_id, 1);
                assert_eq!(stop_count, 3);
                assert_eq!(unique_stop_count, 2);
            }
            other => panic!("unexpected answer: {other:?}"),
        }
    }

    #[test]
    fn unknown_bus_name_answers_with_not_found() {
        let catalog = catalog_s1();
        let render_settings = RenderSettings::default();
        let answer = answer(&catalog, &render_settings, StatRequest::Bus { id: 2, name: "Ghost".to_string() });
        assert!(matches!(answer, Answer::Error { request_id: 2, error_message: "not found" }));
    }

    #[test]
    fn stop_request_lists_buses_ascending() {
        let catalog = catalog_s1();
        let render_settings = RenderSettings::default();
        let answer = answer(&catalog, &render_settings, StatRequest::Stop { id: 3, name: "A".to_string() });
        match answer {
            Answer::Stop { buses, .. } => assert_eq!(buses, vec!["X".to_string()]),
            other => panic!("unexpected answer: {other:?}"),
        }
    }

    #[test]
    fn route_request_answers_with_items() {
        let catalog = catalog_s1();
        let render_settings = RenderSettings::default();
        let answer = answer(&catalog, &render_settings, StatRequest::Route { id: 4, from: "A".to_string(), to: "B".to_string() });
        match answer {
            Answer::Route { total_time, items, .. } => {
                assert!(total_time > 0.0);
                assert_eq!(items.len(), 2);
            }
            other => panic!("unexpected answer: {other:?}"),
        }
    }
}
