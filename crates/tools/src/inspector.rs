use std::collections::BTreeMap;
use std::fmt;

use voxelkit_common::GridCoord;
use voxelkit_ecs::{EntityId, EntityKind, EntityStore};
use voxelkit_kernel::{BlockKind, VisualHandle, VisualSink, VoxelWorld};

/// World inspector for developer tooling.
///
/// Provides read-only queries against world and entity state for debugging
/// and the CLI.
pub struct WorldInspector;

impl WorldInspector {
    /// Produce a summary of the world state.
    pub fn summary<S: VisualSink>(world: &VoxelWorld<S>) -> WorldSummary {
        let mut per_kind = BTreeMap::new();
        let mut bounds: Option<(GridCoord, GridCoord)> = None;
        for (coord, kind) in world.blocks() {
            *per_kind.entry(kind).or_insert(0) += 1;
            bounds = Some(match bounds {
                None => (coord, coord),
                Some((lo, hi)) => (
                    GridCoord::new(lo.x.min(coord.x), lo.y.min(coord.y), lo.z.min(coord.z)),
                    GridCoord::new(hi.x.max(coord.x), hi.y.max(coord.y), hi.z.max(coord.z)),
                ),
            });
        }

        WorldSummary {
            blocks: world.block_count(),
            visuals: world.visual_count(),
            per_kind,
            bounds,
            pending_events: world.events().len(),
            state_hash: world.state_hash(),
        }
    }

    pub fn inspect_block<S: VisualSink>(
        world: &VoxelWorld<S>,
        coord: GridCoord,
    ) -> Option<BlockInfo> {
        let kind = world.get_coord(coord);
        if kind.is_air() {
            return None;
        }
        Some(BlockInfo {
            coord,
            kind,
            breakable: kind.is_breakable(),
            visual: world.visual_at(coord),
        })
    }

    /// Occupied cells of one column, bottom up.
    pub fn column<S: VisualSink>(world: &VoxelWorld<S>, x: i32, z: i32) -> Vec<(i32, BlockKind)> {
        world
            .blocks()
            .filter(|(c, _)| c.x == x && c.z == z)
            .map(|(c, kind)| (c.y, kind))
            .collect()
    }

    pub fn inspect_entity(entities: &EntityStore, id: EntityId) -> Option<EntityInfo> {
        entities.get(id).map(|e| EntityInfo {
            id,
            label: match &e.kind {
                EntityKind::Player => "player".to_string(),
                EntityKind::Creature { hp, max_hp, .. } => format!("creature {hp:.0}/{max_hp:.0}"),
                EntityKind::Prop => "prop".to_string(),
            },
            position: e.position.to_array(),
            grounded: e.body.map(|b| b.grounded),
        })
    }

    pub fn list_entities(entities: &EntityStore) -> Vec<EntityId> {
        entities.iter().map(|(id, _)| id).collect()
    }
}

/// Summary of world state for the inspector.
#[derive(Debug, Clone)]
pub struct WorldSummary {
    pub blocks: usize,
    pub visuals: usize,
    pub per_kind: BTreeMap<BlockKind, usize>,
    /// Inclusive corners of the occupied region.
    pub bounds: Option<(GridCoord, GridCoord)>,
    pub pending_events: usize,
    pub state_hash: u64,
}

impl WorldSummary {
    pub fn count(&self, kind: BlockKind) -> usize {
        self.per_kind.get(&kind).copied().unwrap_or(0)
    }
}

impl fmt::Display for WorldSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "World: blocks={} visuals={} pending_events={} hash={:016x}",
            self.blocks, self.visuals, self.pending_events, self.state_hash
        )?;
        if let Some((lo, hi)) = self.bounds {
            write!(f, "\n  bounds: {lo} .. {hi}")?;
        }
        for (kind, n) in &self.per_kind {
            write!(f, "\n  {kind:<8} {n}")?;
        }
        Ok(())
    }
}

/// A single occupied cell.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInfo {
    pub coord: GridCoord,
    pub kind: BlockKind,
    pub breakable: bool,
    pub visual: Option<VisualHandle>,
}

impl fmt::Display for BlockInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.coord)?;
        if !self.breakable {
            write!(f, " (unbreakable)")?;
        }
        Ok(())
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub label: String,
    pub position: [f32; 3],
    /// `None` for entities without a physics body.
    pub grounded: Option<bool>,
}

impl fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entity #{} {} pos=({:.2}, {:.2}, {:.2})",
            self.id.0, self.label, self.position[0], self.position[1], self.position[2],
        )?;
        if let Some(grounded) = self.grounded {
            write!(f, " grounded={grounded}")?;
        }
        Ok(())
    }
}
