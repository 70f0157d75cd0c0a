use crate::block::BlockKind;
use serde::{Deserialize, Serialize};
use voxelkit_common::GridCoord;

/// Opaque token for a renderer-owned drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// Renderer side of the world: creates and destroys block visuals on command.
///
/// The world decides when a visual exists; a sink never reads world state.
pub trait VisualSink {
    /// Create a drawable for `kind` at the cell, tagged with that cell.
    fn create_visual(&mut self, coord: GridCoord, kind: BlockKind) -> VisualHandle;

    /// Destroy a drawable previously returned by `create_visual`.
    fn remove_visual(&mut self, handle: VisualHandle);
}

/// Sink that hands out handles without drawing anything.
///
/// Used where a world is needed but nothing is presented (generation tools, benches).
#[derive(Debug, Default)]
pub struct NullVisuals {
    next: u64,
    live: usize,
}

impl NullVisuals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visuals created and not yet removed.
    pub fn live(&self) -> usize {
        self.live
    }
}

impl VisualSink for NullVisuals {
    fn create_visual(&mut self, _coord: GridCoord, _kind: BlockKind) -> VisualHandle {
        self.next += 1;
        self.live += 1;
        VisualHandle(self.next)
    }

    fn remove_visual(&mut self, _handle: VisualHandle) {
        self.live = self.live.saturating_sub(1);
    }
}
