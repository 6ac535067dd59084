use fitroom_assets::ResourceHandle;
use fitroom_core::Rgb;

/// Everything the composer needs to know about the user's choices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SceneState {
    pub avatar: Option<ResourceHandle>,
    /// Only ever set while `avatar` is.
    pub clothing: Option<ResourceHandle>,
    pub clothing_visible: bool,
    pub clothing_color: Rgb,
    pub loading: bool,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::with_clothing_color(Rgb::WHITE)
    }
}

impl SceneState {
    pub fn with_clothing_color(clothing_color: Rgb) -> Self {
        Self {
            avatar: None,
            clothing: None,
            clothing_visible: true,
            clothing_color,
            loading: false,
        }
    }

    pub fn has_avatar(&self) -> bool {
        self.avatar.is_some()
    }

    pub fn has_clothing(&self) -> bool {
        self.clothing.is_some()
    }

    pub fn display_state(&self) -> DisplayState {
        match (&self.avatar, &self.clothing) {
            (None, _) => DisplayState::Empty,
            (Some(_), None) => DisplayState::AvatarOnly,
            (Some(_), Some(_)) => DisplayState::AvatarAndClothing,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DisplayState {
    Empty,
    AvatarOnly,
    AvatarAndClothing,
}

impl DisplayState {
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            DisplayState::Empty => Some("Upload an avatar to get started"),
            DisplayState::AvatarOnly => Some("Now upload a clothing item"),
            DisplayState::AvatarAndClothing => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use fitroom_assets::BlobStore;

    use super::*;

    #[test]
    fn display_state_follows_handle_presence() {
        let blobs = BlobStore::new();
        let mut state = SceneState::default();
        assert_eq!(state.display_state(), DisplayState::Empty);

        state.avatar = Some(blobs.create_object_url("avatar.glb", vec![0u8]));
        assert_eq!(state.display_state(), DisplayState::AvatarOnly);

        state.clothing = Some(blobs.create_object_url("shirt.glb", vec![0u8]));
        assert_eq!(state.display_state(), DisplayState::AvatarAndClothing);
        assert_eq!(state.display_state().prompt(), None);

        state.avatar = None;
        assert_eq!(state.display_state(), DisplayState::Empty);
    }

    #[test]
    fn defaults_show_white_clothing() {
        let state = SceneState::default();
        assert!(state.clothing_visible);
        assert_eq!(state.clothing_color, Rgb::WHITE);
        assert!(!state.loading);
    }
}
