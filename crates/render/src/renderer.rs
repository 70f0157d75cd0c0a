use voxelkit_common::{GridCoord, Viewer};
use voxelkit_kernel::{VisualSink, VoxelWorld};

/// What the presentation layer needs besides the world itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    pub viewer: Viewer,
    /// Block currently under the crosshair, if any.
    pub target: Option<GridCoord>,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            viewer: Viewer::default(),
            target: None,
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic presentation interface.
///
/// The renderer reads world state and a view, then produces output. It never
/// mutates the world.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Present one frame.
    fn render<S: VisualSink>(&self, world: &VoxelWorld<S>, view: &RenderView) -> Self::Output;
}

/// Text renderer for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render<S: VisualSink>(&self, world: &VoxelWorld<S>, view: &RenderView) -> String {
        let mut out = String::new();
        let p = view.viewer.position;
        let f = view.viewer.forward();
        out.push_str(&format!(
            "=== Voxel World (blocks={}, visuals={}) ===\n",
            world.block_count(),
            world.visual_count()
        ));
        out.push_str(&format!(
            "Viewer: pos=({:.2}, {:.2}, {:.2}) look=({:.2}, {:.2}, {:.2}) fov={:.0}\n",
            p.x, p.y, p.z, f.x, f.y, f.z, view.fov_degrees
        ));
        match view.target {
            Some(coord) => out.push_str(&format!(
                "Target: {} {}\n",
                world.get_coord(coord),
                coord
            )),
            None => out.push_str("Target: none\n"),
        }
        out
    }
}
