use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelkit_common::GridCoord;
use voxelkit_kernel::{VisualSink, VoxelWorld};

/// Velocity and ground contact for anything that falls.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsBody {
    pub velocity: Vec3,
    pub grounded: bool,
    /// Distance from the tracked position down to the feet.
    pub feet_offset: f32,
}

impl PhysicsBody {
    pub fn new(feet_offset: f32) -> Self {
        Self {
            velocity: Vec3::ZERO,
            grounded: false,
            feet_offset,
        }
    }

    /// Apply gravity, move, and resolve the single vertical collision.
    ///
    /// Returns the new position. Landing snaps the feet onto the top face of
    /// the cell under them.
    pub fn step<S: VisualSink>(
        &mut self,
        position: Vec3,
        world: &VoxelWorld<S>,
        gravity: f32,
        dt: f32,
    ) -> Vec3 {
        self.velocity.y -= gravity * dt;
        let mut next = position + self.velocity * dt;

        let feet = GridCoord::from_xyz(next.x, next.y - self.feet_offset, next.z);
        if !world.get_coord(feet).is_air() {
            if self.velocity.y <= 0.0 {
                next.y = feet.y as f32 + 0.5 + self.feet_offset;
                self.velocity.y = 0.0;
                if !self.grounded {
                    tracing::trace!(%feet, "landed");
                }
                self.grounded = true;
            }
        } else {
            self.grounded = false;
        }
        next
    }
}
