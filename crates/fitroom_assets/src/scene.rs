use std::sync::Arc;

use fitroom_core::{camera::Camera, transform::Transform};

use crate::{assets::MeshData, material::MaterialData};

/// Decoded node graph of one model.
///
/// Nodes live in a flat arena; `children` and `roots` index into it.
/// Geometry is shared behind `Arc`, materials are owned per surface, so a
/// clone is cheap and its materials can be replaced independently.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneData {
    pub nodes: Vec<SceneNode>,
    pub roots: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub kind: NodeKind,
    pub children: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Empty,
    Drawable(Drawable),
    Camera(Camera),
}

/// Renderable geometry: one surface per glTF primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    pub surfaces: Vec<Surface>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub mesh: Arc<MeshData>,
    pub material: MaterialData,
}

impl SceneNode {
    pub fn as_drawable(&self) -> Option<&Drawable> {
        match &self.kind {
            NodeKind::Drawable(drawable) => Some(drawable),
            _ => None,
        }
    }

    pub fn as_drawable_mut(&mut self) -> Option<&mut Drawable> {
        match &mut self.kind {
            NodeKind::Drawable(drawable) => Some(drawable),
            _ => None,
        }
    }
}

/// Typed visitor over a [`SceneData`].
pub trait SceneVisitor {
    fn visit_drawable(&mut self, _name: &str, _drawable: &mut Drawable) {}

    fn visit_camera(&mut self, _name: &str, _camera: &mut Camera) {}

    fn visit_empty(&mut self, _name: &str) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub nodes: usize,
    pub drawables: usize,
    pub surfaces: usize,
    pub triangles: usize,
}

impl SceneData {
    /// Node indices reachable from the roots, depth-first, parents first.
    /// Each node is reported once even if the arena links it twice.
    pub fn depth_first(&self) -> Vec<usize> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();

        while let Some(index) = stack.pop() {
            if index >= self.nodes.len() || visited[index] {
                continue;
            }
            visited[index] = true;
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev().copied());
        }

        order
    }

    pub fn traverse_mut<V: SceneVisitor + ?Sized>(&mut self, visitor: &mut V) {
        for index in self.depth_first() {
            let node = &mut self.nodes[index];
            match &mut node.kind {
                NodeKind::Drawable(drawable) => visitor.visit_drawable(&node.name, drawable),
                NodeKind::Camera(camera) => visitor.visit_camera(&node.name, camera),
                NodeKind::Empty => visitor.visit_empty(&node.name),
            }
        }
    }

    pub fn drawables(&self) -> impl Iterator<Item = &Drawable> {
        self.depth_first()
            .into_iter()
            .filter_map(|index| self.nodes[index].as_drawable())
    }

    pub fn stats(&self) -> SceneStats {
        let order = self.depth_first();
        let mut stats = SceneStats {
            nodes: order.len(),
            ..Default::default()
        };
        for drawable in order.iter().filter_map(|&i| self.nodes[i].as_drawable()) {
            stats.drawables += 1;
            stats.surfaces += drawable.surfaces.len();
            stats.triangles += drawable
                .surfaces
                .iter()
                .map(|s| s.mesh.triangle_count())
                .sum::<usize>();
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Vertex;

    fn quad_mesh() -> Arc<MeshData> {
        let vertex = |x: f32, y: f32| Vertex {
            position: [x, y, 0.0],
            normal: [0.0, 0.0, 1.0],
            uv: [x, y],
        };
        Arc::new(MeshData {
            vertices: vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(1.0, 1.0), vertex(0.0, 1.0)],
            indices: vec![0, 1, 2, 0, 2, 3],
        })
    }

    fn node(name: &str, kind: NodeKind, children: Vec<usize>) -> SceneNode {
        SceneNode {
            name: name.to_owned(),
            transform: Transform::default(),
            kind,
            children,
        }
    }

    fn sample() -> SceneData {
        let drawable = NodeKind::Drawable(Drawable {
            surfaces: vec![Surface {
                mesh: quad_mesh(),
                material: MaterialData::default(),
            }],
        });
        SceneData {
            nodes: vec![
                node("root", NodeKind::Empty, vec![1, 2]),
                node("mesh", drawable, vec![]),
                node("camera", NodeKind::Camera(Camera::default()), vec![]),
                node("orphan", NodeKind::Empty, vec![]),
            ],
            roots: vec![0],
        }
    }

    #[derive(Default)]
    struct Names(Vec<String>);

    impl SceneVisitor for Names {
        fn visit_drawable(&mut self, name: &str, _drawable: &mut Drawable) {
            self.0.push(format!("drawable:{name}"));
        }

        fn visit_camera(&mut self, name: &str, _camera: &mut Camera) {
            self.0.push(format!("camera:{name}"));
        }

        fn visit_empty(&mut self, name: &str) {
            self.0.push(format!("empty:{name}"));
        }
    }

    #[test]
    fn traversal_starts_at_roots_and_skips_unreachable_nodes() {
        let mut scene = sample();
        let mut names = Names::default();

        scene.traverse_mut(&mut names);

        assert_eq!(names.0, vec!["empty:root", "drawable:mesh", "camera:camera"]);
    }

    #[test]
    fn repeated_child_links_are_visited_once() {
        let mut scene = sample();
        scene.nodes[0].children.push(1);
        scene.roots.push(1);

        assert_eq!(scene.depth_first(), vec![0, 1, 2]);
    }

    #[test]
    fn stats_count_reachable_geometry() {
        let stats = sample().stats();
        assert_eq!(
            stats,
            SceneStats {
                nodes: 3,
                drawables: 1,
                surfaces: 1,
                triangles: 2,
            }
        );
    }
}
