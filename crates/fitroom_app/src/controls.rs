use fitroom_scene::SceneState;

bitflags::bitflags! {
    /// Which user-facing controls are enabled.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Controls: u8 {
        const UPLOAD_AVATAR   = 1 << 0;
        const UPLOAD_CLOTHING = 1 << 1;
        const SHOW_CLOTHING   = 1 << 2;
        const CLOTHING_COLOR  = 1 << 3;
        const RESET           = 1 << 4;
    }
}

impl Controls {
    /// Everything is locked while loading.
    pub fn for_state(state: &SceneState) -> Self {
        let mut controls = Controls::empty();
        if state.loading {
            return controls;
        }

        controls |= Controls::UPLOAD_AVATAR;
        if state.has_avatar() {
            controls |= Controls::UPLOAD_CLOTHING;
        }
        if state.has_clothing() {
            controls |= Controls::SHOW_CLOTHING;
            if state.clothing_visible {
                controls |= Controls::CLOTHING_COLOR;
            }
        }
        if state.has_avatar() || state.has_clothing() {
            controls |= Controls::RESET;
        }
        controls
    }
}
