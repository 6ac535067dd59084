use std::sync::Arc;

use fitroom_assets::{ModelLookup, ModelStatus, ResourceHandle, SceneData, recolor};
use fitroom_core::{
    Rgb, ViewerConfig,
    camera::{Camera, OrbitControls},
    config::{LightConfig, OrbitConfig},
    transform::Transform,
};
use glam::{Quat, Vec3};

use crate::state::{DisplayState, SceneState};

/// Placement of the clothing graph relative to the avatar.
/// Slightly inflated and lifted so the garment sits on top of the skin.
pub const FIXED_CLOTHING_TRANSFORM: Transform = Transform {
    translation: Vec3::new(0.0, 0.01, 0.0),
    rotation: Quat::IDENTITY,
    scale: Vec3::splat(1.02),
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModelRole {
    Avatar,
    Clothing,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Light {
    Ambient { intensity: f32 },
    Directional { position: Vec3, intensity: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct ViewCamera {
    pub camera: Camera,
    pub transform: Transform,
}

/// Neutral stand-in shown before any avatar exists.
#[derive(Clone, Debug, PartialEq)]
pub struct Placeholder {
    pub size: f32,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelInstance {
    pub role: ModelRole,
    pub handle: ResourceHandle,
    pub transform: Transform,
    pub scene: Arc<SceneData>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContentNode {
    Placeholder(Placeholder),
    Model(ModelInstance),
    /// Still decoding; only this subtree waits.
    Pending { role: ModelRole, handle: ResourceHandle },
    Failed {
        role: ModelRole,
        handle: ResourceHandle,
        message: String,
    },
}

/// One composed frame.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTree {
    pub display: DisplayState,
    pub camera: ViewCamera,
    pub lights: Vec<Light>,
    pub orbit: OrbitConfig,
    pub content: Vec<ContentNode>,
    pub prompt: Option<&'static str>,
    /// Mirrors [`SceneState::loading`].
    pub loading: bool,
}

impl RenderTree {
    /// Status line shown over the scene while an upload is in flight.
    pub fn loading_message(&self) -> Option<&'static str> {
        self.loading.then_some("Loading 3D model...")
    }

    pub fn model(&self, role: ModelRole) -> Option<&ModelInstance> {
        self.content.iter().find_map(|node| match node {
            ContentNode::Model(instance) if instance.role == role => Some(instance),
            _ => None,
        })
    }

    pub fn is_waiting(&self) -> bool {
        self.content
            .iter()
            .any(|node| matches!(node, ContentNode::Pending { .. }))
    }

    pub fn failure(&self, role: ModelRole) -> Option<&str> {
        self.content.iter().find_map(|node| match node {
            ContentNode::Failed { role: r, message, .. } if *r == role => Some(message.as_str()),
            _ => None,
        })
    }
}

struct RecolorMemo {
    handle: ResourceHandle,
    color: Rgb,
    source: Arc<SceneData>,
    scene: Arc<SceneData>,
}

/// Builds a [`RenderTree`] from the current [`SceneState`].
///
/// The output is a pure function of the state and the decoded models; the
/// composer only remembers the last recoloured clothing copy so unchanged
/// frames do not repeat the work.
pub struct SceneComposer {
    camera: Camera,
    lights: LightConfig,
    recolored: Option<RecolorMemo>,
    last_display: Option<DisplayState>,
}

impl SceneComposer {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            camera: Camera {
                fov: config.camera.fov_degrees.to_radians(),
                near: config.camera.near,
                far: config.camera.far,
                ..Camera::default()
            },
            lights: config.lights.clone(),
            recolored: None,
            last_display: None,
        }
    }

    pub fn compose(&mut self, state: &SceneState, models: &ModelLookup, orbit: &OrbitControls) -> RenderTree {
        let display = state.display_state();
        if self.last_display != Some(display) {
            log::info!("[SceneComposer] Display state -> {:?}", display);
            self.last_display = Some(display);
        }

        let mut content = Vec::new();

        match (&state.avatar, display) {
            (Some(avatar), DisplayState::AvatarOnly | DisplayState::AvatarAndClothing) => {
                content.push(match resolve(ModelRole::Avatar, avatar, models) {
                    Ok(scene) => ContentNode::Model(ModelInstance {
                        role: ModelRole::Avatar,
                        handle: avatar.clone(),
                        transform: Transform::IDENTITY,
                        scene,
                    }),
                    Err(node) => node,
                });

                if let Some(clothing) = state.clothing.as_ref().filter(|_| state.clothing_visible) {
                    content.push(match resolve(ModelRole::Clothing, clothing, models) {
                        Ok(scene) => ContentNode::Model(ModelInstance {
                            role: ModelRole::Clothing,
                            handle: clothing.clone(),
                            transform: FIXED_CLOTHING_TRANSFORM,
                            scene: self.recolored_clothing(clothing, state.clothing_color, scene),
                        }),
                        Err(node) => node,
                    });
                }
            }
            _ => content.push(ContentNode::Placeholder(Placeholder {
                size: 1.0,
                color: Rgb::LIGHT_BLUE,
            })),
        }

        if state.clothing.is_none() {
            self.recolored = None;
        }

        RenderTree {
            display,
            camera: ViewCamera {
                camera: self.camera,
                transform: orbit.view_transform(),
            },
            lights: vec![
                Light::Ambient {
                    intensity: self.lights.ambient_intensity,
                },
                Light::Directional {
                    position: Vec3::from_array(self.lights.directional_position),
                    intensity: self.lights.directional_intensity,
                },
            ],
            orbit: *orbit.settings(),
            content,
            prompt: display.prompt(),
            loading: state.loading,
        }
    }

    fn recolored_clothing(&mut self, handle: &ResourceHandle, color: Rgb, source: Arc<SceneData>) -> Arc<SceneData> {
        if let Some(memo) = &self.recolored {
            if memo.handle == *handle && memo.color == color && Arc::ptr_eq(&memo.source, &source) {
                return memo.scene.clone();
            }
        }

        // Private copy: the loader's graph stays untouched
        let scene = Arc::new(recolor((*source).clone(), color));
        self.recolored = Some(RecolorMemo {
            handle: handle.clone(),
            color,
            source,
            scene: scene.clone(),
        });
        scene
    }
}

fn resolve(role: ModelRole, handle: &ResourceHandle, models: &ModelLookup) -> Result<Arc<SceneData>, ContentNode> {
    match models.status(handle) {
        Some(ModelStatus::Ready(scene)) => Ok(scene.clone()),
        Some(ModelStatus::Failed(e)) => Err(ContentNode::Failed {
            role,
            handle: handle.clone(),
            message: e.to_string(),
        }),
        Some(ModelStatus::Pending) | None => Err(ContentNode::Pending {
            role,
            handle: handle.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use fitroom_assets::{
        AssetError, AssetWorkerMessage, BlobStore, asset_server::gltf_parser::parse_gltf, fixtures,
        material::MaterialData,
    };

    use super::*;

    struct Fixture {
        blobs: BlobStore,
        models: ModelLookup,
        orbit: OrbitControls,
        composer: SceneComposer,
    }

    impl Fixture {
        fn new() -> Self {
            let config = ViewerConfig::default();
            Self {
                blobs: BlobStore::new(),
                models: ModelLookup::default(),
                orbit: OrbitControls::new(
                    Vec3::from_array(config.camera.position),
                    Vec3::from_array(config.camera.target),
                    config.orbit,
                ),
                composer: SceneComposer::new(&config),
            }
        }

        fn ready(&mut self, name: &str, bytes: Vec<u8>) -> (ResourceHandle, Arc<SceneData>) {
            let handle = self.blobs.create_object_url(name, bytes.clone());
            let scene = Arc::new(parse_gltf(&bytes).unwrap());
            self.models.track(&handle);
            self.models.apply(AssetWorkerMessage::ModelLoaded {
                handle: handle.clone(),
                result: Ok(scene.clone()),
            });
            (handle, scene)
        }

        fn compose(&mut self, state: &SceneState) -> RenderTree {
            self.composer.compose(state, &self.models, &self.orbit)
        }
    }

    fn dressed(fx: &mut Fixture) -> (SceneState, Arc<SceneData>, Arc<SceneData>) {
        let (avatar, avatar_scene) = fx.ready("avatar.glb", fixtures::outfit_glb());
        let (clothing, clothing_scene) = fx.ready("shirt.glb", fixtures::outfit_glb());
        let state = SceneState {
            avatar: Some(avatar),
            clothing: Some(clothing),
            ..SceneState::default()
        };
        (state, avatar_scene, clothing_scene)
    }

    #[test]
    fn empty_state_shows_placeholder_and_prompt() {
        let mut fx = Fixture::new();

        let tree = fx.compose(&SceneState::default());

        assert_eq!(tree.display, DisplayState::Empty);
        assert_eq!(tree.prompt, Some("Upload an avatar to get started"));
        assert_eq!(
            tree.content,
            vec![ContentNode::Placeholder(Placeholder {
                size: 1.0,
                color: Rgb::LIGHT_BLUE,
            })]
        );
        assert_eq!(tree.lights.len(), 2);
        assert_eq!(tree.orbit.min_distance, 1.0);
        assert_eq!(tree.orbit.max_distance, 10.0);
        assert!(!tree.loading);
        assert_eq!(tree.loading_message(), None);
    }

    #[test]
    fn loading_flag_is_carried_into_the_frame() {
        let mut fx = Fixture::new();
        let (avatar, _) = fx.ready("avatar.glb", fixtures::outfit_glb());
        let state = SceneState {
            avatar: Some(avatar),
            loading: true,
            ..SceneState::default()
        };

        let tree = fx.compose(&state);

        assert!(tree.loading);
        assert_eq!(tree.loading_message(), Some("Loading 3D model..."));
        assert!(tree.model(ModelRole::Avatar).is_some());
    }

    #[test]
    fn avatar_alone_is_rendered_undecorated() {
        let mut fx = Fixture::new();
        let (avatar, scene) = fx.ready("avatar.glb", fixtures::outfit_glb());
        let state = SceneState {
            avatar: Some(avatar),
            ..SceneState::default()
        };

        let tree = fx.compose(&state);

        assert_eq!(tree.display, DisplayState::AvatarOnly);
        assert_eq!(tree.prompt, Some("Now upload a clothing item"));
        let instance = tree.model(ModelRole::Avatar).unwrap();
        assert!(Arc::ptr_eq(&instance.scene, &scene));
        assert_eq!(instance.transform, Transform::IDENTITY);
        assert_eq!(tree.content.len(), 1);
    }

    #[test]
    fn clothing_is_recoloured_and_offset() {
        let mut fx = Fixture::new();
        let (mut state, avatar_scene, clothing_scene) = dressed(&mut fx);
        state.clothing_color = "#ff0000".parse().unwrap();

        let tree = fx.compose(&state);

        assert_eq!(tree.prompt, None);
        let clothing = tree.model(ModelRole::Clothing).unwrap();
        assert_eq!(clothing.transform, FIXED_CLOTHING_TRANSFORM);
        let red = MaterialData::solid(state.clothing_color);
        assert!(clothing.scene.drawables().flat_map(|d| &d.surfaces).all(|s| s.material == red));

        // neither the avatar nor the decoded clothing original changed
        let avatar = tree.model(ModelRole::Avatar).unwrap();
        assert!(Arc::ptr_eq(&avatar.scene, &avatar_scene));
        assert!(avatar.scene.drawables().flat_map(|d| &d.surfaces).all(|s| s.material != red));
        assert!(clothing_scene.drawables().flat_map(|d| &d.surfaces).all(|s| s.material != red));
    }

    #[test]
    fn hidden_clothing_is_left_out() {
        let mut fx = Fixture::new();
        let (mut state, _, _) = dressed(&mut fx);
        state.clothing_visible = false;

        let tree = fx.compose(&state);

        assert_eq!(tree.display, DisplayState::AvatarAndClothing);
        assert!(tree.model(ModelRole::Clothing).is_none());
        assert!(tree.model(ModelRole::Avatar).is_some());
        assert!(state.clothing.is_some());
    }

    #[test]
    fn clothing_settings_without_clothing_change_nothing() {
        let mut fx = Fixture::new();
        let (avatar, _) = fx.ready("avatar.glb", fixtures::triangle_glb());
        let plain = SceneState {
            avatar: Some(avatar),
            ..SceneState::default()
        };
        let tweaked = SceneState {
            clothing_visible: false,
            clothing_color: Rgb::new(255, 0, 0),
            ..plain.clone()
        };

        assert_eq!(fx.compose(&plain), fx.compose(&tweaked));
        assert_eq!(
            fx.compose(&SceneState::default()),
            fx.compose(&SceneState {
                clothing_visible: false,
                clothing_color: Rgb::new(0, 255, 0),
                ..SceneState::default()
            })
        );
    }

    #[test]
    fn recolour_is_reused_until_the_colour_changes() {
        let mut fx = Fixture::new();
        let (mut state, _, _) = dressed(&mut fx);

        let first = fx.compose(&state).model(ModelRole::Clothing).unwrap().scene.clone();
        let again = fx.compose(&state).model(ModelRole::Clothing).unwrap().scene.clone();
        assert!(Arc::ptr_eq(&first, &again));

        state.clothing_color = Rgb::new(0, 0, 255);
        let blue = fx.compose(&state).model(ModelRole::Clothing).unwrap().scene.clone();
        assert!(!Arc::ptr_eq(&first, &blue));
    }

    #[test]
    fn pending_and_failed_models_only_affect_their_subtree() {
        let mut fx = Fixture::new();
        let (avatar, _) = fx.ready("avatar.glb", fixtures::triangle_glb());
        let clothing = fx.blobs.create_object_url("shirt.glb", fixtures::corrupt_glb());
        fx.models.track(&clothing);
        let state = SceneState {
            avatar: Some(avatar),
            clothing: Some(clothing.clone()),
            ..SceneState::default()
        };

        let tree = fx.compose(&state);
        assert!(tree.is_waiting());
        assert!(tree.model(ModelRole::Avatar).is_some());

        fx.models.apply(AssetWorkerMessage::ModelLoaded {
            handle: clothing,
            result: Err(AssetError::Decode("unexpected EOF".into())),
        });
        let tree = fx.compose(&state);
        assert!(!tree.is_waiting());
        assert_eq!(
            tree.failure(ModelRole::Clothing),
            Some("failed to decode model: unexpected EOF")
        );
        assert!(tree.model(ModelRole::Avatar).is_some());
    }

    #[test]
    fn camera_follows_the_orbit() {
        let mut fx = Fixture::new();

        let before = fx.compose(&SceneState::default()).camera.transform;
        fx.orbit.zoom(2.0);
        let after = fx.compose(&SceneState::default()).camera.transform;

        assert!(after.translation.length() > before.translation.length());
        assert!((fx.compose(&SceneState::default()).camera.camera.fov - 50f32.to_radians()).abs() < 1e-6);
    }
}
