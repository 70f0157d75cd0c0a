//! Rendering Adapter: renderer-agnostic scene interface.
//!
//! # Invariants
//! - Renderer cannot mutate world truth directly; it only creates and removes
//!   visuals when the world tells it to.
//! - Ray queries only consider the handles they are given.
//!
//! `HeadlessScene` is the in-memory scene used by the CLI and by tests. A GPU
//! backend implements the same `VisualSink` + `RayQuery` pair.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{HeadlessScene, Ray, RayHit, RayQuery, SceneObject};

pub fn crate_info() -> &'static str {
    "voxelkit-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
