use crate::{FileInput, IntakeError, SlotLabel};

/// Highlight shown while a file hovers over an enabled zone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropOverlay {
    pub message: String,
}

/// Drag-and-drop target for one slot.
#[derive(Clone, Debug)]
pub struct DropZone {
    label: SlotLabel,
    disabled: bool,
    dragging: bool,
}

impl DropZone {
    pub fn new(label: SlotLabel) -> Self {
        Self {
            label,
            disabled: false,
            dragging: false,
        }
    }

    pub fn label(&self) -> SlotLabel {
        self.label
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
        if disabled {
            self.dragging = false;
        }
    }

    pub fn drag_enter(&mut self) {
        if !self.disabled {
            self.dragging = true;
        }
    }

    pub fn drag_over(&mut self) {
        self.drag_enter();
    }

    pub fn drag_leave(&mut self) {
        self.dragging = false;
    }

    pub fn overlay(&self) -> Option<DropOverlay> {
        (self.dragging && !self.disabled).then(|| DropOverlay {
            message: format!("Drop {} here", self.label),
        })
    }

    /// Ends the drag and yields the first dropped file, ready for
    /// [`Intake::submit`](crate::Intake::submit).
    pub fn drop(&mut self, files: Vec<FileInput>) -> Result<FileInput, IntakeError> {
        self.dragging = false;

        if self.disabled {
            log::debug!("Ignoring drop on disabled {} zone", self.label);
            return Err(IntakeError::Disabled(self.label));
        }

        files.into_iter().next().ok_or(IntakeError::NoFile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_follows_the_drag() {
        let mut zone = DropZone::new(SlotLabel::Avatar);
        assert_eq!(zone.overlay(), None);

        zone.drag_enter();
        assert_eq!(zone.overlay().unwrap().message, "Drop Avatar here");

        zone.drag_leave();
        assert_eq!(zone.overlay(), None);
    }

    #[test]
    fn drag_over_restores_the_highlight() {
        let mut zone = DropZone::new(SlotLabel::Avatar);
        zone.drag_enter();
        zone.drag_leave();

        zone.drag_over();

        assert!(zone.overlay().is_some());
    }

    #[test]
    fn disabled_zone_never_highlights() {
        let mut zone = DropZone::new(SlotLabel::Clothing);
        zone.set_disabled(true);

        zone.drag_enter();
        zone.drag_over();

        assert_eq!(zone.overlay(), None);
    }

    #[test]
    fn disabling_mid_drag_hides_the_overlay() {
        let mut zone = DropZone::new(SlotLabel::Clothing);
        zone.drag_enter();

        zone.set_disabled(true);
        zone.set_disabled(false);

        assert_eq!(zone.overlay(), None);
    }

    #[test]
    fn drop_on_disabled_zone_is_refused() {
        let mut zone = DropZone::new(SlotLabel::Clothing);
        zone.set_disabled(true);

        let err = zone.drop(vec![FileInput::new("shirt.glb", vec![1u8])]).unwrap_err();

        assert_eq!(err, IntakeError::Disabled(SlotLabel::Clothing));
    }

    #[test]
    fn drop_takes_the_first_file() {
        let mut zone = DropZone::new(SlotLabel::Clothing);
        zone.drag_enter();

        let file = zone
            .drop(vec![
                FileInput::new("shirt.gltf", vec![1u8]),
                FileInput::new("pants.glb", vec![2u8]),
            ])
            .unwrap();

        assert_eq!(file.name, "shirt.gltf");
        assert_eq!(zone.overlay(), None);
    }

    #[test]
    fn empty_drop_is_reported() {
        let mut zone = DropZone::new(SlotLabel::Clothing);

        assert_eq!(zone.drop(Vec::new()), Err(IntakeError::NoFile));
    }
}
