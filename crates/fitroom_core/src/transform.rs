use glam::{Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self {
            translation: Vec3::new(x, y, z),
            ..Default::default()
        }
    }

    /// Returns the "Forward" direction (-Z) relative to current rotation
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Returns the "Up" direction (+Y) relative to current rotation
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Makes the transform look at a target position
    pub fn looking_at(mut self, target: Vec3, up: Vec3) -> Self {
        // look_at_rh builds a view matrix, so invert it to get the object rotation
        let mat = Mat4::look_at_rh(self.translation, target, up);
        self.rotation = Quat::from_mat4(&mat.inverse());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_xyz_only_moves() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0);
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn looking_at_points_forward_at_the_target() {
        let eye = Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y);
        assert!(eye.forward().abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }
}
