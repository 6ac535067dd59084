use fitroom_core::Rgb;

use crate::{
    material::MaterialData,
    scene::{Drawable, SceneData, SceneVisitor},
};

struct Recolor {
    material: MaterialData,
    replaced: usize,
}

impl SceneVisitor for Recolor {
    fn visit_drawable(&mut self, _name: &str, drawable: &mut Drawable) {
        for surface in &mut drawable.surfaces {
            surface.material = self.material.clone();
            self.replaced += 1;
        }
    }
}

/// Replaces the material of every drawable surface with a solid `color`.
///
/// Takes the graph by value: pass a private copy, never a cached original.
/// Non-drawable nodes, transforms and geometry are left as they were.
pub fn recolor(mut scene: SceneData, color: Rgb) -> SceneData {
    let mut pass = Recolor {
        material: MaterialData::solid(color),
        replaced: 0,
    };
    scene.traverse_mut(&mut pass);
    log::debug!("Recoloured {} surfaces to {}", pass.replaced, color);
    scene
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{asset_server::gltf_parser::parse_gltf, fixtures, scene::NodeKind};

    #[test]
    fn every_surface_gets_the_new_colour() {
        let original = parse_gltf(&fixtures::outfit_glb()).unwrap();
        let red: Rgb = "#ff0000".parse().unwrap();

        let recoloured = recolor(original.clone(), red);

        let expected = MaterialData::solid(red);
        let surfaces: Vec<_> = recoloured.drawables().flat_map(|d| &d.surfaces).collect();
        assert!(!surfaces.is_empty());
        assert!(surfaces.iter().all(|s| s.material == expected));
        assert!(surfaces.iter().all(|s| !s.material.has_textures()));
    }

    #[test]
    fn structure_and_geometry_are_preserved() {
        let original = parse_gltf(&fixtures::outfit_glb()).unwrap();

        let recoloured = recolor(original.clone(), Rgb::new(0, 128, 255));

        assert_eq!(recoloured.roots, original.roots);
        assert_eq!(recoloured.nodes.len(), original.nodes.len());
        for (before, after) in original.nodes.iter().zip(&recoloured.nodes) {
            assert_eq!(before.name, after.name);
            assert_eq!(before.transform, after.transform);
            assert_eq!(before.children, after.children);
            match (&before.kind, &after.kind) {
                (NodeKind::Drawable(a), NodeKind::Drawable(b)) => {
                    for (sa, sb) in a.surfaces.iter().zip(&b.surfaces) {
                        assert!(Arc::ptr_eq(&sa.mesh, &sb.mesh));
                    }
                }
                (a, b) => assert_eq!(a, b),
            }
        }
    }

    #[test]
    fn the_source_copy_is_untouched() {
        let original = parse_gltf(&fixtures::outfit_glb()).unwrap();
        let snapshot = original.clone();

        let _ = recolor(original.clone(), Rgb::new(1, 2, 3));

        assert_eq!(original, snapshot);
    }
}
