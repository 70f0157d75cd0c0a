use crate::scheduler::{TickContext, Updatable};
use glam::Vec2;
use voxelkit_kernel::VisualSink;

/// Turns accumulated pointer motion into viewer yaw and pitch.
#[derive(Debug, Clone)]
pub struct LookController {
    pub sensitivity: f32,
}

impl LookController {
    pub fn new(sensitivity: f32) -> Self {
        Self { sensitivity }
    }
}

impl Default for LookController {
    fn default() -> Self {
        Self::new(0.002)
    }
}

impl<S: VisualSink> Updatable<S> for LookController {
    fn name(&self) -> &'static str {
        "look"
    }

    fn update(&mut self, ctx: &mut TickContext<'_, S>) {
        let delta = ctx.input.consume_look_delta();
        if delta != Vec2::ZERO {
            ctx.viewer.rotate(delta.x, delta.y, self.sensitivity);
        }
    }
}
