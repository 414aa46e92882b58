//! Road trip library entry points.
//!
//! This crate exposes helpers to locate the country datasets, parse the border
//! list, capital distance table and country code registry, build the
//! undirected border graph, and answer distance and route queries over it.
//! Higher-level consumers (the CLI) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod capitals;
pub mod country;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod graph;
pub mod identity;
pub mod path;
pub mod routing;
pub mod sources;

pub use capitals::CapitalDistanceTable;
pub use country::{normalize_code, CountryKey, ValidCountrySet};
pub use dataset::{default_data_dir, resolve_data_dir, DatasetPaths, DATA_DIR_ENV};
pub use engine::RoadTrip;
pub use error::{Error, Result};
pub use graph::{build_graph, BuildOptions, Edge, EdgeKind, FallbackPolicy, Graph, Node, NodeId};
pub use identity::{AliasOverride, CountryRegistry, RegistryEntry};
pub use path::find_route_dijkstra;
pub use routing::{plan_route, RouteHop, RoutePlan};
pub use sources::{LoadReport, RecordError, RecordProblem, SourceKind};
