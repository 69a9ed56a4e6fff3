//! User settings that survive route changes.

use crate::dispatch::{Action, Reducer};

/// How the selected path is rendered over time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathDisplayMode {
    /// Animated playback along the path.
    #[default]
    Dynamic,
    /// Draw the whole path at once.
    Static,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SettingsState {
    pub path_display_mode: PathDisplayMode,
}

/// Reducer over [`SettingsState`].
pub struct SettingsReducer;

impl Reducer for SettingsReducer {
    type State = SettingsState;

    fn initial_state(&self) -> SettingsState {
        SettingsState {
            path_display_mode: PathDisplayMode::default(),
        }
    }

    fn reduce(&self, state: &SettingsState, action: &Action) -> SettingsState {
        match action {
            Action::SetPathDisplayMode(mode) => SettingsState {
                path_display_mode: *mode,
            },
            _ => state.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_dynamic() {
        assert_eq!(
            SettingsReducer.initial_state().path_display_mode,
            PathDisplayMode::Dynamic
        );
    }

    #[test]
    fn display_mode_is_set() {
        let state = SettingsReducer.reduce(
            &SettingsReducer.initial_state(),
            &Action::SetPathDisplayMode(PathDisplayMode::Static),
        );
        assert_eq!(state.path_display_mode, PathDisplayMode::Static);
    }
}
