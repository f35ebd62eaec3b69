//! A static urban bus network engine: per-route stats, per-stop membership,
//! minimum-time routing, and SVG map rendering.
//!
//! The catalog is built once from a batch of stops and buses, then frozen by
//! [`catalog::CatalogBuilder::synchronize`] into a [`catalog::Catalog`] that
//! answers every query in [`request`] without further mutation.

pub mod catalog;
pub mod geo;
pub mod graph;
pub mod render;
pub mod request;
pub mod routing;
pub mod text;

pub use catalog::{Catalog, CatalogBuilder, QueryError, RoutingSettings, SyncError};
