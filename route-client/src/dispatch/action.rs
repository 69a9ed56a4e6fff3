//! The closed action vocabulary.
//!
//! Every state change in the application is one of these variants; reducers
//! match on them exhaustively, so adding a variant surfaces every reducer
//! that needs a decision at compile time.

use crate::gateway::RoutingArgs;
use crate::geometry::Bbox;
use crate::route::SegmentedPath;
use crate::stores::query::QueryPoint;
use crate::stores::settings::PathDisplayMode;

/// An application action.
#[derive(Debug, Clone)]
pub enum Action {
    /// Replace the whole query-point list (URL parse, drag-reorder).
    SetQueryPoints(Vec<QueryPoint>),

    /// Replace a single query point, matched by id.
    SetPoint(QueryPoint),

    /// Insert a point at the given index.
    AddPoint { index: usize, point: QueryPoint },

    /// Remove the point with the given id.
    RemovePoint { id: u64 },

    /// Reset the query to two empty slots.
    ClearPoints,

    /// Drop the current routing result but keep the query.
    ClearRoute,

    /// Select the routing profile (vehicle).
    SetVehicleProfile { profile: String },

    /// Select a map layer by name.
    SelectMapLayer { layer: String },

    /// Switch the path display mode.
    SetPathDisplayMode(PathDisplayMode),

    /// Suggest map bounds, e.g. estimated from URL points.
    SetBbox(Bbox),

    /// A route request was issued; used for pending-result placeholders.
    RouteRequesting { args: RoutingArgs, sequence: u64 },

    /// A route request settled successfully.
    RouteRequestSuccess {
        args: RoutingArgs,
        zoom: bool,
        paths: Vec<SegmentedPath>,
    },

    /// A route request failed; `message` is user-facing.
    RouteRequestFailed { args: RoutingArgs, message: String },

    /// Select one of the returned alternatives.
    SetSelectedPath(SegmentedPath),
}
