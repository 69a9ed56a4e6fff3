//! HTTP gateway to the routing and location-search services, plus the
//! conversion layer that turns wire payloads into segmented paths.

mod client;
mod convert;
mod error;
mod geocoder;
mod routing;
mod types;

pub use client::{GatewayConfig, RoutingClient};
pub use convert::{raw_path, segmented_legacy_paths, segmented_paths};
pub use error::GatewayError;
pub use geocoder::{DebounceConfig, Geocoder, SearchBackend};
pub use routing::{RouteBackend, RoutingGateway};
pub use types::{
    GeoPoint, LegacyRouteResponse, LocationHit, LocationRef, RouteRequestBody, RoutesResponse,
    RoutingArgs, SearchResponse, WirePath, WirePoints, WireRoute, WireSegment,
};
