pub mod composer;
pub mod state;

pub use composer::{
    ContentNode, FIXED_CLOTHING_TRANSFORM, Light, ModelInstance, ModelRole, Placeholder, RenderTree,
    SceneComposer, ViewCamera,
};
pub use state::{DisplayState, SceneState};
