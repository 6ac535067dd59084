use glam::Vec3;

use crate::{config::OrbitConfig, transform::Transform};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 50.0f32.to_radians(),
            aspect_ratio: 16.0 / 9.0, // Standard monitor
            near: 0.1,
            far: 100.0,
        }
    }
}

// Keeps the eye off the poles so `looking_at` never degenerates.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Orbit-style viewpoint: the eye sits on a sphere around `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
    settings: OrbitConfig,
}

impl OrbitControls {
    pub fn new(eye: Vec3, target: Vec3, settings: OrbitConfig) -> Self {
        let offset = eye - target;
        let length = offset.length().max(f32::EPSILON);

        let mut controls = Self {
            target,
            distance: length,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / length).clamp(-1.0, 1.0).asin(),
            settings,
        };
        controls.distance = controls.clamp_distance(length);
        controls.pitch = controls.pitch.clamp(-PITCH_LIMIT, PITCH_LIMIT);
        controls
    }

    pub fn settings(&self) -> &OrbitConfig {
        &self.settings
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                self.distance * cos_pitch * sin_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * cos_yaw,
            )
    }

    /// Camera transform for the current orbit position.
    pub fn view_transform(&self) -> Transform {
        let eye = self.eye();
        Transform::from_xyz(eye.x, eye.y, eye.z).looking_at(self.target, Vec3::Y)
    }

    pub fn rotate(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if !self.settings.enable_rotate {
            return;
        }
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Scales the orbit distance; values above 1 move the eye away.
    pub fn zoom(&mut self, factor: f32) {
        if !self.settings.enable_zoom || !(factor > 0.0) {
            return;
        }
        self.distance = self.clamp_distance(self.distance * factor);
    }

    /// Moves the target in the view plane.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        if !self.settings.enable_pan {
            return;
        }
        let view = self.view_transform();
        let right = view.rotation * Vec3::X;
        let up = view.up();
        self.target += right * dx + up * dy;
    }

    fn clamp_distance(&self, distance: f32) -> f32 {
        distance.clamp(self.settings.min_distance, self.settings.max_distance)
    }
}
