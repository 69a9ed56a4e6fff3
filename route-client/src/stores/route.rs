//! Routing result state: all returned alternatives plus the selected one.

use crate::dispatch::{Action, Reducer};
use crate::route::SegmentedPath;

#[derive(Debug, Clone, PartialEq)]
pub struct RouteStoreState {
    pub all_paths: Vec<SegmentedPath>,
    pub selected_path: SegmentedPath,
}

impl RouteStoreState {
    fn empty() -> Self {
        Self {
            all_paths: Vec::new(),
            selected_path: SegmentedPath::empty(),
        }
    }
}

/// Reducer over [`RouteStoreState`].
pub struct RouteReducer;

impl Reducer for RouteReducer {
    type State = RouteStoreState;

    fn initial_state(&self) -> RouteStoreState {
        RouteStoreState::empty()
    }

    fn reduce(&self, state: &RouteStoreState, action: &Action) -> RouteStoreState {
        match action {
            Action::RouteRequestSuccess { paths, .. } => {
                if paths.is_empty() {
                    RouteStoreState::empty()
                } else {
                    RouteStoreState {
                        all_paths: paths.clone(),
                        selected_path: paths[0].clone(),
                    }
                }
            }
            Action::SetSelectedPath(path) => RouteStoreState {
                all_paths: state.all_paths.clone(),
                selected_path: path.clone(),
            },
            // Any change to the query invalidates the displayed route.
            Action::SetPoint(_)
            | Action::SetQueryPoints(_)
            | Action::AddPoint { .. }
            | Action::RemovePoint { .. }
            | Action::ClearPoints
            | Action::ClearRoute => RouteStoreState::empty(),
            _ => state.clone(),
        }
    }
}
