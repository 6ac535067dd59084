use std::time::Duration;

use fitroom_assets::{
    AssetError, AssetServer, AssetWorkerMessage, BlobStore, ModelLoader, ModelLookup, ModelStatus,
    ResourceHandle,
};
use fitroom_core::{
    IoTaskPool, ViewerConfig, camera::OrbitControls, color::ColorError, time::DelayTimer,
};
use fitroom_intake::{AllowList, DropOverlay, DropZone, FileInput, Intake, IntakeError, SlotLabel};
use fitroom_scene::{DisplayState, ModelRole, RenderTree, SceneComposer, SceneState};
use glam::Vec3;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::controls::Controls;

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("upload an avatar before adding clothing")]
    AvatarRequired,
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error(transparent)]
    Asset(#[from] AssetError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ControllerEvent {
    ModelReady { role: ModelRole, handle: ResourceHandle },
    ModelFailed { role: ModelRole, handle: ResourceHandle, error: AssetError },
    LoadingFinished,
}

fn role_of(slot: SlotLabel) -> ModelRole {
    match slot {
        SlotLabel::Avatar => ModelRole::Avatar,
        SlotLabel::Clothing => ModelRole::Clothing,
    }
}

/// Owns the scene state and the resource handles behind it.
///
/// Every mutation runs on the caller's thread; decoding happens on the I/O
/// pool and comes back through [`AppController::update`] or
/// [`AppController::settle`].
pub struct AppController {
    config: ViewerConfig,
    state: SceneState,
    blobs: BlobStore,
    avatar_intake: Intake,
    clothing_intake: Intake,
    avatar_zone: DropZone,
    clothing_zone: DropZone,
    server: AssetServer,
    receiver: UnboundedReceiver<AssetWorkerMessage>,
    models: ModelLookup,
    // Only in fixed-delay mode
    loading_timer: Option<DelayTimer>,
    composer: SceneComposer,
    orbit: OrbitControls,
}

impl AppController {
    pub fn new(config: ViewerConfig, io: IoTaskPool) -> Self {
        let blobs = BlobStore::new();
        let allow = AllowList::new(&config.allowed_extensions);
        let (server, receiver) = AssetServer::new(ModelLoader::new(blobs.clone()), io);

        let orbit = OrbitControls::new(
            Vec3::from_array(config.camera.position),
            Vec3::from_array(config.camera.target),
            config.orbit,
        );

        let mut controller = Self {
            state: SceneState::with_clothing_color(config.default_clothing_rgb()),
            avatar_intake: Intake::new(SlotLabel::Avatar, allow.clone(), blobs.clone()),
            clothing_intake: Intake::new(SlotLabel::Clothing, allow, blobs.clone()),
            avatar_zone: DropZone::new(SlotLabel::Avatar),
            clothing_zone: DropZone::new(SlotLabel::Clothing),
            blobs,
            server,
            receiver,
            models: ModelLookup::default(),
            loading_timer: config.loading.fixed_delay().map(DelayTimer::new),
            composer: SceneComposer::new(&config),
            orbit,
            config,
        };
        controller.sync_drop_zones();
        controller
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    pub fn loader(&self) -> &ModelLoader {
        self.server.loader()
    }

    pub fn models(&self) -> &ModelLookup {
        &self.models
    }

    pub fn display_state(&self) -> DisplayState {
        self.state.display_state()
    }

    pub fn controls(&self) -> Controls {
        Controls::for_state(&self.state)
    }

    pub fn orbit_mut(&mut self) -> &mut OrbitControls {
        &mut self.orbit
    }

    pub fn upload_avatar(&mut self, file: FileInput) -> Result<ResourceHandle, ControllerError> {
        self.submit(SlotLabel::Avatar, file)
    }

    pub fn upload_clothing(&mut self, file: FileInput) -> Result<ResourceHandle, ControllerError> {
        if !self.state.has_avatar() {
            log::warn!("Clothing upload '{}' refused: no avatar yet", file.name);
            return Err(ControllerError::AvatarRequired);
        }
        self.submit(SlotLabel::Clothing, file)
    }

    pub fn set_clothing_visible(&mut self, visible: bool) {
        self.state.clothing_visible = visible;
    }

    pub fn set_clothing_color(&mut self, hex: &str) -> Result<(), ControllerError> {
        self.state.clothing_color = hex.parse()?;
        Ok(())
    }

    /// Releases both handles and restores the initial state. Idempotent.
    pub fn reset(&mut self) -> Result<(), ControllerError> {
        let released: Vec<ResourceHandle> = [self.state.avatar.take(), self.state.clothing.take()]
            .into_iter()
            .flatten()
            .collect();

        let mut first_error = None;
        for handle in &released {
            if let Err(e) = self.release(handle) {
                log::error!("Failed to release {}: {}", handle, e);
                first_error.get_or_insert(e);
            }
        }

        self.state = SceneState::with_clothing_color(self.config.default_clothing_rgb());
        self.models.clear();
        if let Some(timer) = &mut self.loading_timer {
            timer.cancel();
        }
        self.sync_drop_zones();
        log::info!("Scene reset ({} handles released)", released.len());

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn drag_enter(&mut self, slot: SlotLabel) {
        self.zone_mut(slot).drag_enter();
    }

    pub fn drag_over(&mut self, slot: SlotLabel) {
        self.zone_mut(slot).drag_over();
    }

    pub fn drag_leave(&mut self, slot: SlotLabel) {
        self.zone_mut(slot).drag_leave();
    }

    pub fn drop_overlay(&self, slot: SlotLabel) -> Option<DropOverlay> {
        match slot {
            SlotLabel::Avatar => self.avatar_zone.overlay(),
            SlotLabel::Clothing => self.clothing_zone.overlay(),
        }
    }

    /// Drop gesture on a slot. Unlike the upload calls, this honours the
    /// zone's disabled state, which tracks [`Controls`].
    pub fn drop_files(&mut self, slot: SlotLabel, files: Vec<FileInput>) -> Result<ResourceHandle, ControllerError> {
        let file = self.zone_mut(slot).drop(files)?;
        self.submit(slot, file)
    }

    /// Drains decode completions and advances the loading timer.
    pub fn update(&mut self, delta: Duration) -> Vec<ControllerEvent> {
        let mut events = Vec::new();

        while let Ok(msg) = self.receiver.try_recv() {
            self.apply_message(msg, &mut events);
        }

        let fired = self
            .loading_timer
            .as_mut()
            .and_then(|timer| timer.tick(delta))
            .is_some();
        if fired && (self.state.has_avatar() || self.state.has_clothing()) {
            self.finish_loading(&mut events);
        }

        events
    }

    /// Waits until no current model is still decoding.
    pub async fn settle(&mut self) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        while self.any_pending() {
            match self.receiver.recv().await {
                Some(msg) => self.apply_message(msg, &mut events),
                None => break,
            }
        }
        events
    }

    pub fn render(&mut self) -> RenderTree {
        self.composer.compose(&self.state, &self.models, &self.orbit)
    }

    fn submit(&mut self, slot: SlotLabel, file: FileInput) -> Result<ResourceHandle, ControllerError> {
        let intake = match slot {
            SlotLabel::Avatar => self.avatar_intake.clone(),
            SlotLabel::Clothing => self.clothing_intake.clone(),
        };
        intake.submit(file, |handle| self.install(slot, handle))?
    }

    fn install(&mut self, slot: SlotLabel, handle: ResourceHandle) -> Result<ResourceHandle, ControllerError> {
        let previous = match slot {
            SlotLabel::Avatar => self.state.avatar.replace(handle.clone()),
            SlotLabel::Clothing => self.state.clothing.replace(handle.clone()),
        };

        self.models.track(&handle);
        self.server.load_model(&handle);
        if let Some(timer) = &mut self.loading_timer {
            timer.arm();
        }
        self.set_loading(true);

        if let Some(old) = previous {
            log::debug!("{} {} replaced by {}", slot, old, handle);
            self.release(&old)?;
        }
        Ok(handle)
    }

    /// Revokes before evicting: a decode task that slips in between sees a
    /// dead blob and drops its own cache slot.
    fn release(&mut self, handle: &ResourceHandle) -> Result<(), AssetError> {
        let revoked = self.blobs.revoke(handle);
        self.server.loader().evict(handle);
        self.models.forget(handle);
        revoked
    }

    fn apply_message(&mut self, msg: AssetWorkerMessage, events: &mut Vec<ControllerEvent>) {
        let Some((handle, status)) = self.models.apply(msg) else {
            return;
        };
        let Some(role) = self.role_for(&handle) else {
            return;
        };

        match status {
            ModelStatus::Ready(_) => events.push(ControllerEvent::ModelReady { role, handle }),
            ModelStatus::Failed(error) => events.push(ControllerEvent::ModelFailed { role, handle, error }),
            ModelStatus::Pending => {}
        }

        if self.loading_timer.is_none() && self.state.loading && !self.any_pending() {
            self.finish_loading(events);
        }
    }

    fn finish_loading(&mut self, events: &mut Vec<ControllerEvent>) {
        if self.state.loading {
            self.set_loading(false);
            events.push(ControllerEvent::LoadingFinished);
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if self.state.loading != loading {
            log::info!("Loading {}", if loading { "started" } else { "finished" });
        }
        self.state.loading = loading;
        self.sync_drop_zones();
    }

    fn role_for(&self, handle: &ResourceHandle) -> Option<ModelRole> {
        if self.state.avatar.as_ref() == Some(handle) {
            Some(role_of(SlotLabel::Avatar))
        } else if self.state.clothing.as_ref() == Some(handle) {
            Some(role_of(SlotLabel::Clothing))
        } else {
            None
        }
    }

    fn any_pending(&self) -> bool {
        [&self.state.avatar, &self.state.clothing]
            .into_iter()
            .flatten()
            .any(|handle| self.models.is_pending(handle))
    }

    fn zone_mut(&mut self, slot: SlotLabel) -> &mut DropZone {
        match slot {
            SlotLabel::Avatar => &mut self.avatar_zone,
            SlotLabel::Clothing => &mut self.clothing_zone,
        }
    }

    fn sync_drop_zones(&mut self) {
        let controls = self.controls();
        self.avatar_zone
            .set_disabled(!controls.contains(Controls::UPLOAD_AVATAR));
        self.clothing_zone
            .set_disabled(!controls.contains(Controls::UPLOAD_CLOTHING));
    }
}
