use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Eye pose of the player: position plus yaw/pitch in radians.
///
/// Movement writes the position, interaction reads the forward ray, and the
/// presentation layer reads both. Yaw -90° looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewer {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Viewer {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, 0.0),
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
        }
    }
}

impl Viewer {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Unit look direction including pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Look direction projected onto the ground plane.
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin()).normalize()
    }

    /// Ground-plane right vector.
    pub fn flat_right(&self) -> Vec3 {
        self.flat_forward().cross(Vec3::Y).normalize()
    }

    /// Apply a pointer delta. Pitch is clamped just short of straight up/down.
    pub fn rotate(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch -= dy * sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    /// Aim the viewer at a world point.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = (target - self.position).normalize_or_zero();
        if dir == Vec3::ZERO {
            return;
        }
        self.yaw = dir.z.atan2(dir.x);
        self.pitch = dir
            .y
            .asin()
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }
}
