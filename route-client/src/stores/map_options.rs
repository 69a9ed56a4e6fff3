//! Map presentation options.

use crate::dispatch::{Action, Reducer};
use crate::geometry::Bbox;

pub const DEFAULT_LAYER: &str = "Omniscale";

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptionsState {
    pub selected_layer: String,
    /// Suggested bounds, e.g. estimated from URL points before a route exists.
    pub bbox: Option<Bbox>,
}

/// Reducer over [`MapOptionsState`].
pub struct MapOptionsReducer;

impl Reducer for MapOptionsReducer {
    type State = MapOptionsState;

    fn initial_state(&self) -> MapOptionsState {
        MapOptionsState {
            selected_layer: DEFAULT_LAYER.to_string(),
            bbox: None,
        }
    }

    fn reduce(&self, state: &MapOptionsState, action: &Action) -> MapOptionsState {
        match action {
            Action::SelectMapLayer { layer } => MapOptionsState {
                selected_layer: layer.clone(),
                bbox: state.bbox,
            },
            Action::SetBbox(bbox) => MapOptionsState {
                selected_layer: state.selected_layer.clone(),
                bbox: Some(*bbox),
            },
            _ => state.clone(),
        }
    }
}
