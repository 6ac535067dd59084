use std::sync::Arc;

use fitroom_core::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureFormat {
    Rgba8Unorm,     // Standard 32-bit color (0-255)
    Rgba8UnormSrgb, // Base colour maps
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextureData {
    pub name: String,
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    Opaque,
    Mask,
    Blend,
}

impl From<gltf::material::AlphaMode> for AlphaMode {
    fn from(mode: gltf::material::AlphaMode) -> Self {
        match mode {
            gltf::material::AlphaMode::Opaque => AlphaMode::Opaque,
            gltf::material::AlphaMode::Mask => AlphaMode::Mask,
            gltf::material::AlphaMode::Blend => AlphaMode::Blend,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaterialSettings {
    pub base_color: [f32; 4],
    pub roughness: f32,
    pub metallic: f32,
    pub alpha_mode: AlphaMode,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            base_color: [1.0, 1.0, 1.0, 1.0],
            roughness: 1.0,
            metallic: 0.0,
            alpha_mode: AlphaMode::Opaque,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialData {
    pub name: Option<String>,
    pub settings: MaterialSettings,
    pub diffuse_texture: Option<Arc<TextureData>>,
    pub normal_texture: Option<Arc<TextureData>>,
    pub metallic_roughness_texture: Option<Arc<TextureData>>,
    pub occlusion_texture: Option<Arc<TextureData>>,
}

impl MaterialData {
    /// Single-colour opaque material with no textures.
    pub fn solid(color: Rgb) -> Self {
        Self {
            name: None,
            settings: MaterialSettings {
                base_color: color.to_linear_rgba(),
                ..MaterialSettings::default()
            },
            ..Default::default()
        }
    }

    pub fn has_textures(&self) -> bool {
        self.diffuse_texture.is_some()
            || self.normal_texture.is_some()
            || self.metallic_roughness_texture.is_some()
            || self.occlusion_texture.is_some()
    }
}
