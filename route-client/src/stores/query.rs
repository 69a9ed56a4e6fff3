//! Query state: the ordered waypoint slots, the routing profile and the
//! in-flight route requests.

use crate::dispatch::{Action, Reducer};
use crate::gateway::{LocationRef, RoutingArgs};
use crate::geometry::Coordinate;

/// Position of a point within the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryPointKind {
    From,
    Via,
    To,
}

/// One waypoint slot. `is_initialized` distinguishes an empty slot the
/// user has yet to fill from one carrying a real coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPoint {
    pub id: u64,
    pub coordinate: Coordinate,
    pub query_text: String,
    pub is_initialized: bool,
    pub kind: QueryPointKind,
    pub location_ref: Option<LocationRef>,
}

impl QueryPoint {
    pub fn empty(id: u64, kind: QueryPointKind) -> Self {
        Self {
            id,
            coordinate: Coordinate { lat: 0.0, lng: 0.0 },
            query_text: String::new(),
            is_initialized: false,
            kind,
            location_ref: None,
        }
    }

    pub fn initialized(id: u64, coordinate: Coordinate, kind: QueryPointKind) -> Self {
        Self {
            id,
            coordinate,
            query_text: coordinate.to_text(),
            is_initialized: true,
            kind,
            location_ref: None,
        }
    }
}

/// Lifecycle of one issued route request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubRequestState {
    Sent,
    Success,
    Failed,
}

/// A route request the query state is tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct SubRequest {
    pub args: RoutingArgs,
    pub sequence: u64,
    pub state: SubRequestState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryStoreState {
    pub points: Vec<QueryPoint>,
    pub next_point_id: u64,
    pub profile: String,
    pub current_request: Vec<SubRequest>,
}

impl QueryStoreState {
    fn empty() -> Self {
        Self {
            points: vec![
                QueryPoint::empty(0, QueryPointKind::From),
                QueryPoint::empty(1, QueryPointKind::To),
            ],
            next_point_id: 2,
            profile: "car".to_string(),
            current_request: Vec::new(),
        }
    }
}

/// Reducer over [`QueryStoreState`].
pub struct QueryReducer;

impl QueryReducer {
    /// First slot is From, last is To, everything between is Via.
    fn reassign_kinds(points: &mut [QueryPoint]) {
        let count = points.len();
        for (index, point) in points.iter_mut().enumerate() {
            point.kind = if index == 0 {
                QueryPointKind::From
            } else if index + 1 == count {
                QueryPointKind::To
            } else {
                QueryPointKind::Via
            };
        }
    }

    fn mark_request(state: &mut QueryStoreState, args: &RoutingArgs, outcome: SubRequestState) {
        for request in &mut state.current_request {
            if request.args == *args {
                request.state = outcome;
            }
        }
    }
}

impl Reducer for QueryReducer {
    type State = QueryStoreState;

    fn initial_state(&self) -> QueryStoreState {
        QueryStoreState::empty()
    }

    fn reduce(&self, state: &QueryStoreState, action: &Action) -> QueryStoreState {
        let mut next = state.clone();
        match action {
            Action::SetQueryPoints(points) => {
                next.points = points.clone();
                Self::reassign_kinds(&mut next.points);
                next.next_point_id = points.iter().map(|p| p.id + 1).max().unwrap_or(0);
            }
            Action::SetPoint(point) => {
                if let Some(slot) = next.points.iter_mut().find(|p| p.id == point.id) {
                    *slot = point.clone();
                }
                Self::reassign_kinds(&mut next.points);
            }
            Action::AddPoint { index, point } => {
                let index = (*index).min(next.points.len());
                let mut point = point.clone();
                point.id = next.next_point_id;
                next.next_point_id += 1;
                next.points.insert(index, point);
                Self::reassign_kinds(&mut next.points);
            }
            Action::RemovePoint { id } => {
                next.points.retain(|p| p.id != *id);
                Self::reassign_kinds(&mut next.points);
            }
            Action::ClearPoints => {
                let base = next.next_point_id;
                next.points = vec![
                    QueryPoint::empty(base, QueryPointKind::From),
                    QueryPoint::empty(base + 1, QueryPointKind::To),
                ];
                next.next_point_id = base + 2;
            }
            Action::SetVehicleProfile { profile } => {
                next.profile = profile.clone();
            }
            Action::RouteRequesting { args, sequence } => {
                next.current_request = vec![SubRequest {
                    args: args.clone(),
                    sequence: *sequence,
                    state: SubRequestState::Sent,
                }];
            }
            Action::RouteRequestSuccess { args, .. } => {
                Self::mark_request(&mut next, args, SubRequestState::Success);
            }
            Action::RouteRequestFailed { args, .. } => {
                Self::mark_request(&mut next, args, SubRequestState::Failed);
            }
            _ => {}
        }
        next
    }
}
