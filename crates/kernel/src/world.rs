use crate::block::BlockKind;
use crate::visual::{VisualHandle, VisualSink};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use voxelkit_common::GridCoord;

/// An event record produced by every block mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldEvent {
    /// A cell changed from `old` to `new`. Air on either side means empty.
    BlockSet {
        coord: GridCoord,
        old: BlockKind,
        new: BlockKind,
    },
}

/// One occupied cell. The visual lives next to the kind so the two can never
/// drift apart: a handle cannot exist without a block under it.
#[derive(Debug, Clone, Copy)]
struct Cell {
    kind: BlockKind,
    visual: Option<VisualHandle>,
}

/// The authoritative sparse voxel world.
///
/// Owns the block map and, through the `VisualSink`, the lifetime of every
/// block visual. Uses BTreeMap so iteration, hashing and the visual list are
/// identical across runs and platforms.
#[derive(Debug)]
pub struct VoxelWorld<S> {
    cells: BTreeMap<GridCoord, Cell>,
    scene: S,
    /// Append-only log of block mutations.
    events: Vec<WorldEvent>,
}

impl<S: VisualSink> VoxelWorld<S> {
    /// Create an empty world that reports visuals to `scene`.
    pub fn new(scene: S) -> Self {
        Self {
            cells: BTreeMap::new(),
            scene,
            events: Vec::new(),
        }
    }

    /// Block at the cell containing `pos`. Absent cells are Air.
    pub fn get(&self, pos: Vec3) -> BlockKind {
        self.get_coord(GridCoord::from_world(pos))
    }

    pub fn get_coord(&self, coord: GridCoord) -> BlockKind {
        self.cells.get(&coord).map_or(BlockKind::Air, |c| c.kind)
    }

    /// Set the block at the cell containing `pos`.
    pub fn set(&mut self, pos: Vec3, kind: BlockKind) {
        self.set_coord(GridCoord::from_world(pos), kind);
    }

    /// Set a cell, replacing whatever visual it had.
    ///
    /// The old visual is always dropped first, even when the new kind is
    /// also invisible, so no stale drawable can survive a write.
    pub fn set_coord(&mut self, coord: GridCoord, kind: BlockKind) {
        let old = match self.cells.remove(&coord) {
            Some(cell) => {
                if let Some(handle) = cell.visual {
                    self.scene.remove_visual(handle);
                }
                cell.kind
            }
            None => BlockKind::Air,
        };

        if !(old.is_air() && kind.is_air()) {
            self.events.push(WorldEvent::BlockSet {
                coord,
                old,
                new: kind,
            });
        }

        if kind.is_air() {
            return;
        }

        let visual = kind
            .is_visible()
            .then(|| self.scene.create_visual(coord, kind));
        self.cells.insert(coord, Cell { kind, visual });
    }

    /// Handles of every visible block, for ray queries.
    pub fn visuals(&self) -> Vec<VisualHandle> {
        self.cells.values().filter_map(|c| c.visual).collect()
    }

    /// Visual handle tracked for a cell, if it holds a visible block.
    pub fn visual_at(&self, coord: GridCoord) -> Option<VisualHandle> {
        self.cells.get(&coord).and_then(|c| c.visual)
    }

    /// Number of non-Air cells.
    pub fn block_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells with a live visual.
    pub fn visual_count(&self) -> usize {
        self.cells.values().filter(|c| c.visual.is_some()).count()
    }

    /// All non-Air cells in canonical order.
    pub fn blocks(&self) -> impl Iterator<Item = (GridCoord, BlockKind)> + '_ {
        self.cells.iter().map(|(coord, cell)| (*coord, cell.kind))
    }

    /// Highest non-Air cell in the column at (x, z).
    pub fn surface_height(&self, x: i32, z: i32) -> Option<i32> {
        self.cells
            .keys()
            .filter(|c| c.x == x && c.z == z)
            .map(|c| c.y)
            .max()
    }

    /// Read-only access to the renderer collaborator.
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.events
    }

    /// Deterministic hash of the block map for comparing worlds.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (coord, cell) in &self.cells {
            mix(&mut h, &coord.x.to_le_bytes());
            mix(&mut h, &coord.y.to_le_bytes());
            mix(&mut h, &coord.z.to_le_bytes());
            mix(&mut h, &[cell.kind as u8]);
        }
        h
    }
}
