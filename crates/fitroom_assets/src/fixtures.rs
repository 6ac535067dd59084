//! Tiny models built in memory, so tests need no binary assets.

use std::io::Cursor;

use base64::Engine;
use serde_json::{Value, json};

pub const FABRIC_COLOR: [f32; 4] = [0.2, 0.4, 0.6, 1.0];

const GLB_MAGIC: &[u8; 4] = b"glTF";
const CHUNK_JSON: u32 = 0x4E4F_534A;
const CHUNK_BIN: u32 = 0x004E_4942;

/// Packs a JSON document and its binary buffer into a GLB container.
pub fn glb(document: &Value, bin: &[u8]) -> Vec<u8> {
    let mut json = serde_json::to_vec(document).unwrap_or_default();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let mut bin = bin.to_vec();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json.len() + if bin.is_empty() { 0 } else { 8 + bin.len() };

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(GLB_MAGIC);
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());

    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    out.extend_from_slice(&json);

    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&CHUNK_BIN.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

// Positions (36 bytes) followed by u16 indices (6 bytes + 2 padding).
fn triangle_buffer() -> Vec<u8> {
    let mut bin = Vec::new();
    for value in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        bin.extend_from_slice(&value.to_le_bytes());
    }
    for index in [0u16, 1, 2] {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]);
    bin
}

fn triangle_accessors() -> Value {
    json!([
        {
            "bufferView": 0,
            "componentType": 5126,
            "count": 3,
            "type": "VEC3",
            "min": [0.0, 0.0, 0.0],
            "max": [1.0, 1.0, 0.0]
        },
        { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
    ])
}

fn triangle_document(buffer: Value) -> Value {
    json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [{ "name": "Triangle", "mesh": 0 }],
        "meshes": [{
            "name": "Triangle",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }]
        }],
        "accessors": triangle_accessors(),
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "buffers": [buffer]
    })
}

/// One node, one triangle, no material.
pub fn triangle_glb() -> Vec<u8> {
    glb(&triangle_document(json!({ "byteLength": 44 })), &triangle_buffer())
}

/// Same triangle as a JSON `.gltf` with the buffer inlined as a data URI.
pub fn triangle_gltf() -> Vec<u8> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(triangle_buffer());
    let document = triangle_document(json!({
        "byteLength": 44,
        "uri": format!("data:application/octet-stream;base64,{}", encoded)
    }));
    serde_json::to_vec(&document).unwrap_or_default()
}

/// A `.gltf` whose buffer lives in a sibling file.
pub fn external_buffer_gltf() -> Vec<u8> {
    let document = triangle_document(json!({ "byteLength": 44, "uri": "triangle.bin" }));
    serde_json::to_vec(&document).unwrap_or_default()
}

// Triangle whose only material samples a single image at `image_uri`.
fn textured_triangle_gltf(image_uri: String) -> Vec<u8> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(triangle_buffer());
    let mut document = triangle_document(json!({
        "byteLength": 44,
        "uri": format!("data:application/octet-stream;base64,{}", encoded)
    }));
    document["meshes"][0]["primitives"][0]["material"] = json!(0);
    document["materials"] = json!([{
        "name": "Fabric",
        "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } }
    }]);
    document["textures"] = json!([{ "source": 0 }]);
    document["images"] = json!([{ "name": "Swatch", "uri": image_uri }]);
    serde_json::to_vec(&document).unwrap_or_default()
}

/// Single-file `.gltf` with its base colour PNG inlined as a data URI.
pub fn textured_gltf() -> Vec<u8> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(swatch_png());
    textured_triangle_gltf(format!("data:image/png;base64,{}", encoded))
}

/// Like [`textured_gltf`], but the image is a sibling file.
pub fn external_image_gltf() -> Vec<u8> {
    textured_triangle_gltf("swatch.png".to_string())
}

fn swatch_png() -> Vec<u8> {
    let swatch = image::RgbaImage::from_pixel(2, 2, image::Rgba([200, 40, 40, 255]));
    let mut png = Cursor::new(Vec::new());
    // encoding a 2x2 image into memory does not fail
    let _ = swatch.write_to(&mut png, image::ImageFormat::Png);
    png.into_inner()
}

/// A small hierarchy: a group with two mesh nodes and a camera.
///
/// `Torso` has two primitives (the second without a material), `Sleeve` one
/// non-indexed primitive. The `Fabric` material carries a PNG base colour map.
pub fn outfit_glb() -> Vec<u8> {
    let mut bin = triangle_buffer();
    let png = swatch_png();
    let png_offset = bin.len();
    bin.extend_from_slice(&png);
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let document = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "Outfit", "children": [1, 2, 3] },
            { "name": "Torso", "mesh": 0, "translation": [0.0, 1.0, 0.0] },
            { "name": "Sleeve", "mesh": 1, "scale": [0.5, 0.5, 0.5] },
            { "name": "Camera", "camera": 0 }
        ],
        "meshes": [
            {
                "name": "Torso",
                "primitives": [
                    { "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 },
                    { "attributes": { "POSITION": 0 }, "indices": 1 }
                ]
            },
            {
                "name": "Sleeve",
                "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }]
            }
        ],
        "materials": [{
            "name": "Fabric",
            "pbrMetallicRoughness": {
                "baseColorFactor": FABRIC_COLOR,
                "baseColorTexture": { "index": 0 }
            }
        }],
        "textures": [{ "source": 0 }],
        "images": [{ "bufferView": 2, "mimeType": "image/png" }],
        "cameras": [{ "type": "perspective", "perspective": { "yfov": 0.8, "znear": 0.1 } }],
        "accessors": triangle_accessors(),
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 },
            { "buffer": 0, "byteOffset": png_offset, "byteLength": png.len() }
        ],
        "buffers": [{ "byteLength": bin.len() }]
    });

    glb(&document, &bin)
}

/// Two nodes and no `scenes` array.
pub fn sceneless_glb() -> Vec<u8> {
    let document = json!({
        "asset": { "version": "2.0" },
        "nodes": [
            { "name": "Parent", "children": [1] },
            { "name": "Child", "mesh": 0 }
        ],
        "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1 }] }],
        "accessors": triangle_accessors(),
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "buffers": [{ "byteLength": 44 }]
    });
    glb(&document, &triangle_buffer())
}

/// Right extension, wrong content.
pub fn corrupt_glb() -> Vec<u8> {
    b"glTF this was never a model".to_vec()
}
