use std::{collections::HashSet, sync::Arc};

use base64::{Engine, engine::general_purpose::STANDARD};
use fitroom_core::{camera::Camera, transform::Transform};
use glam::Quat;

use crate::{
    assets::{MeshData, Vertex},
    error::AssetError,
    material::{MaterialData, MaterialSettings, TextureData, TextureFormat},
    scene::{Drawable, NodeKind, SceneData, SceneNode, Surface},
};

/// Decodes a GLB, or a glTF whose buffers are embedded as data URIs.
///
/// An upload is a single file, so anything that points at a sibling file
/// fails here with [`AssetError::Decode`].
pub fn parse_gltf(bytes: &[u8]) -> Result<SceneData, AssetError> {
    // A. Load Document & Buffers
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = gltf::import_buffers(&document, None, blob)?;
    let buffer_bytes = |index: usize| buffers.get(index).map(|data| data.0.as_slice());

    // --- STEP 1: TEXTURES ---
    let srgb_images: HashSet<usize> = document
        .materials()
        .filter_map(|mat| mat.pbr_metallic_roughness().base_color_texture())
        .map(|info| info.texture().source().index())
        .collect();

    let mut textures: Vec<Option<Arc<TextureData>>> = Vec::new();

    for image in document.images() {
        let name = image.name().unwrap_or("GLTF Image");
        let format = if srgb_images.contains(&image.index()) {
            TextureFormat::Rgba8UnormSrgb
        } else {
            TextureFormat::Rgba8Unorm
        };

        match image.source() {
            gltf::image::Source::View { view, .. } => {
                let start = view.offset();
                let end = start + view.length();
                let image_data = buffer_bytes(view.buffer().index())
                    .and_then(|buffer| buffer.get(start..end))
                    .ok_or_else(|| AssetError::Decode(format!("image '{}' points outside its buffer", name)))?;

                textures.push(Some(decode_texture(name, image_data, format)?));
            }
            gltf::image::Source::Uri { uri, .. } => match data_uri_payload(uri)? {
                Some(image_data) => textures.push(Some(decode_texture(name, &image_data, format)?)),
                None => {
                    log::warn!("Skipping external image '{}', uploads are a single file", truncate(uri));
                    textures.push(None);
                }
            },
        }
    }

    let texture = |index: usize| textures.get(index).cloned().flatten();

    // --- STEP 2: MATERIALS ---
    let materials: Vec<MaterialData> = document
        .materials()
        .map(|mat| {
            let pbr = mat.pbr_metallic_roughness();

            MaterialData {
                name: mat.name().map(str::to_owned),
                settings: MaterialSettings {
                    base_color: pbr.base_color_factor(),
                    roughness: pbr.roughness_factor(),
                    metallic: pbr.metallic_factor(),
                    alpha_mode: mat.alpha_mode().into(),
                },
                diffuse_texture: pbr
                    .base_color_texture()
                    .and_then(|info| texture(info.texture().source().index())),
                normal_texture: mat
                    .normal_texture()
                    .and_then(|info| texture(info.texture().source().index())),
                metallic_roughness_texture: pbr
                    .metallic_roughness_texture()
                    .and_then(|info| texture(info.texture().source().index())),
                occlusion_texture: mat
                    .occlusion_texture()
                    .and_then(|info| texture(info.texture().source().index())),
            }
        })
        .collect();

    // --- STEP 3: MESHES ---
    // One surface per primitive, indexed like document.meshes()
    let mut meshes: Vec<Vec<Surface>> = Vec::new();

    for mesh in document.meshes() {
        let mut surfaces = Vec::new();

        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffer_bytes(buffer.index()));

            let positions: Vec<[f32; 3]> = reader
                .read_positions()
                .map(|iter| iter.collect())
                .ok_or_else(|| {
                    AssetError::Decode(format!(
                        "mesh '{}' has a primitive without positions",
                        mesh.name().unwrap_or("Mesh")
                    ))
                })?;

            let normals: Vec<[f32; 3]> = reader
                .read_normals()
                .map(|iter| iter.collect())
                .unwrap_or_else(|| vec![[0.0, 1.0, 0.0]; positions.len()]);

            let uvs: Vec<[f32; 2]> = reader
                .read_tex_coords(0)
                .map(|read| read.into_f32().collect())
                .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);

            // Non-indexed primitives draw their vertices in order
            let indices: Vec<u32> = reader
                .read_indices()
                .map(|read| read.into_u32().collect())
                .unwrap_or_else(|| (0..positions.len() as u32).collect());

            let vertices = positions
                .iter()
                .enumerate()
                .map(|(i, position)| Vertex {
                    position: *position,
                    normal: normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                    uv: uvs.get(i).copied().unwrap_or([0.0, 0.0]),
                })
                .collect();

            let material = primitive
                .material()
                .index()
                .and_then(|index| materials.get(index).cloned())
                .unwrap_or_default();

            surfaces.push(Surface {
                mesh: Arc::new(MeshData { vertices, indices }),
                material,
            });
        }

        meshes.push(surfaces);
    }

    // --- STEP 4: NODES (The Hierarchy) ---
    let nodes: Vec<SceneNode> = document
        .nodes()
        .map(|node| {
            let (t, r, s) = node.transform().decomposed();

            let kind = if let Some(mesh) = node.mesh() {
                NodeKind::Drawable(Drawable {
                    surfaces: meshes.get(mesh.index()).cloned().unwrap_or_default(),
                })
            } else if let Some(camera) = node.camera() {
                NodeKind::Camera(convert_camera(&camera))
            } else {
                NodeKind::Empty
            };

            SceneNode {
                name: node.name().unwrap_or("Node").to_string(),
                transform: Transform {
                    translation: t.into(),
                    rotation: Quat::from_array(r),
                    scale: s.into(),
                },
                kind,
                children: node.children().map(|c| c.index()).collect(),
            }
        })
        .collect();

    let roots = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => scene.nodes().map(|n| n.index()).collect(),
        None => parentless(&nodes),
    };

    Ok(SceneData { nodes, roots })
}

fn convert_camera(camera: &gltf::Camera<'_>) -> Camera {
    match camera.projection() {
        gltf::camera::Projection::Orthographic(_) => Camera::default(),
        gltf::camera::Projection::Perspective(perspective) => {
            let defaults = Camera::default();
            Camera {
                fov: perspective.yfov(),
                aspect_ratio: perspective.aspect_ratio().unwrap_or(defaults.aspect_ratio),
                near: perspective.znear(),
                far: perspective.zfar().unwrap_or(defaults.far),
            }
        }
    }
}

fn parentless(nodes: &[SceneNode]) -> Vec<usize> {
    let mut has_parent = vec![false; nodes.len()];
    for &child in nodes.iter().flat_map(|n| &n.children) {
        if let Some(flag) = has_parent.get_mut(child) {
            *flag = true;
        }
    }
    (0..nodes.len()).filter(|&i| !has_parent[i]).collect()
}

// data: URIs can be megabytes long
fn decode_texture(name: &str, bytes: &[u8], format: TextureFormat) -> Result<Arc<TextureData>, AssetError> {
    let img = image::load_from_memory(bytes)?.to_rgba8();
    Ok(Arc::new(TextureData {
        name: name.to_string(),
        width: img.width(),
        height: img.height(),
        pixels: img.into_raw(),
        format,
    }))
}

/// Bytes of an embedded `data:` URI, or `None` for a reference to another file.
fn data_uri_payload(uri: &str) -> Result<Option<Vec<u8>>, AssetError> {
    let Some(rest) = uri.strip_prefix("data:") else {
        return Ok(None);
    };
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AssetError::Decode(format!("malformed data URI '{}'", truncate(uri))))?;
    if !header.ends_with(";base64") {
        return Err(AssetError::Decode(format!("data URI '{}' is not base64", truncate(uri))));
    }

    STANDARD
        .decode(payload)
        .map(Some)
        .map_err(|e| AssetError::Decode(format!("data URI '{}': {}", truncate(uri), e)))
}

fn truncate(uri: &str) -> &str {
    match uri.char_indices().nth(48) {
        Some((end, _)) => &uri[..end],
        None => uri,
    }
}
