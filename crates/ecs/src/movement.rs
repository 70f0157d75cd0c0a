use crate::body::PhysicsBody;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelkit_common::Viewer;
use voxelkit_input::{InputSource, KeyCode};
use voxelkit_kernel::{VisualSink, VoxelWorld};

/// Player movement constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Horizontal speed per held key, units/s.
    pub speed: f32,
    /// Downward acceleration, units/s².
    pub gravity: f32,
    /// Vertical speed set by a jump, units/s.
    pub jump_speed: f32,
    /// Eye to feet distance.
    pub eye_height: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            speed: 10.0,
            gravity: 30.0,
            jump_speed: 12.0,
            eye_height: 1.8,
        }
    }
}

/// Per-tick walking, jumping and falling for the viewer.
///
/// There is no acceleration model: horizontal velocity is reassigned from the
/// held keys every tick.
#[derive(Debug, Clone)]
pub struct MovementController {
    config: MovementConfig,
    body: PhysicsBody,
}

impl MovementController {
    pub fn new(config: MovementConfig) -> Self {
        let body = PhysicsBody::new(config.eye_height);
        Self { config, body }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    pub fn body(&self) -> &PhysicsBody {
        &self.body
    }

    pub fn grounded(&self) -> bool {
        self.body.grounded
    }

    pub fn velocity(&self) -> Vec3 {
        self.body.velocity
    }

    pub fn update<S: VisualSink>(
        &mut self,
        viewer: &mut Viewer,
        world: &VoxelWorld<S>,
        input: &dyn InputSource,
        dt: f32,
    ) {
        self.body.velocity.x = 0.0;
        self.body.velocity.z = 0.0;

        if input.pointer_captured() {
            let forward = viewer.flat_forward() * self.config.speed;
            let right = viewer.flat_right() * self.config.speed;
            let mut horizontal = Vec3::ZERO;
            if input.is_key_held(KeyCode::KeyW) {
                horizontal += forward;
            }
            if input.is_key_held(KeyCode::KeyS) {
                horizontal -= forward;
            }
            if input.is_key_held(KeyCode::KeyA) {
                horizontal -= right;
            }
            if input.is_key_held(KeyCode::KeyD) {
                horizontal += right;
            }
            self.body.velocity.x = horizontal.x;
            self.body.velocity.z = horizontal.z;

            if input.is_key_held(KeyCode::Space) && self.body.grounded {
                self.body.velocity.y = self.config.jump_speed;
                self.body.grounded = false;
                tracing::debug!("jump");
            }
        }

        let was_grounded = self.body.grounded;
        viewer.position = self
            .body
            .step(viewer.position, world, self.config.gravity, dt);
        if was_grounded != self.body.grounded {
            tracing::debug!(
                grounded = self.body.grounded,
                y = viewer.position.y,
                "ground contact changed"
            );
        }
    }
}
