use glam::Vec3;
use serde::{Deserialize, Serialize};
use voxelkit_common::{GridCoord, Viewer};
use voxelkit_input::{InputSource, KeyCode};
use voxelkit_kernel::{BlockKind, VisualHandle, VisualSink, VoxelWorld};
use voxelkit_render::{Ray, RayHit, RayQuery};

/// Kinds selectable for placement, in digit-key order (1..=7).
pub const PLACEABLE: [BlockKind; 7] = [
    BlockKind::Dirt,
    BlockKind::Stone,
    BlockKind::Ore,
    BlockKind::Wood,
    BlockKind::Grass,
    BlockKind::Leaves,
    BlockKind::Bedrock,
];

/// Interaction tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Maximum ray length.
    pub reach: f32,
    /// Consecutive held ticks on one target needed to break it.
    pub break_ticks: u32,
    /// Half extents of the player box placement may not intrude on.
    pub footprint_half_extents: [f32; 3],
    /// Distance from the eye down to the center of that box.
    pub footprint_center_drop: f32,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            reach: 5.0,
            break_ticks: 11,
            footprint_half_extents: [0.8, 1.4, 0.8],
            footprint_center_drop: 0.9,
        }
    }
}

/// Break-tracking state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InteractionState {
    #[default]
    Idle,
    Targeting { handle: VisualHandle, progress: u32 },
}

/// Something that happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionEvent {
    TargetAcquired(GridCoord),
    Broken { coord: GridCoord, kind: BlockKind },
    BreakRefused { coord: GridCoord, kind: BlockKind },
    Placed { coord: GridCoord, kind: BlockKind },
    PlacementBlocked(GridCoord),
    Selected(BlockKind),
}

/// Result of one `update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// What the crosshair resolved to this tick, before any mutation.
    pub hit: Option<RayHit>,
    pub events: Vec<InteractionEvent>,
}

/// Per-tick break/place state machine driven by a ray from the viewer.
#[derive(Debug, Clone)]
pub struct InteractionController {
    config: InteractionConfig,
    state: InteractionState,
    selected: BlockKind,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        Self {
            config,
            state: InteractionState::Idle,
            selected: BlockKind::Dirt,
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    /// Break progress on the current target, zero when idle.
    pub fn progress(&self) -> u32 {
        match self.state {
            InteractionState::Idle => 0,
            InteractionState::Targeting { progress, .. } => progress,
        }
    }

    pub fn selected(&self) -> BlockKind {
        self.selected
    }

    /// Choose the kind used for placement. Air cannot be selected.
    pub fn select(&mut self, kind: BlockKind) -> bool {
        if kind.is_air() {
            return false;
        }
        self.selected = kind;
        true
    }

    pub fn update<S: VisualSink + RayQuery>(
        &mut self,
        viewer: &Viewer,
        world: &mut VoxelWorld<S>,
        input: &mut dyn InputSource,
    ) -> TickReport {
        let mut report = TickReport::default();

        if !input.pointer_captured() {
            self.reset();
            return report;
        }

        self.poll_selection(&*input, &mut report);

        let ray = Ray::from_viewer(viewer);
        let hit = world
            .scene()
            .query_ray(&ray, self.config.reach, &world.visuals());
        report.hit = hit;

        match hit {
            Some(hit) if input.break_held() => self.advance_break(hit, world, &mut report),
            _ => self.reset(),
        }

        if let Some(hit) = hit {
            if input.place_held() {
                self.try_place(hit, viewer.position, world, input, &mut report);
            }
        }

        report
    }

    fn poll_selection(&mut self, input: &dyn InputSource, report: &mut TickReport) {
        for (key, kind) in KeyCode::DIGITS.iter().zip(PLACEABLE) {
            if input.is_key_held(*key) && self.selected != kind {
                self.selected = kind;
                tracing::debug!(%kind, "block selected");
                report.events.push(InteractionEvent::Selected(kind));
            }
        }
    }

    fn advance_break<S: VisualSink>(
        &mut self,
        hit: RayHit,
        world: &mut VoxelWorld<S>,
        report: &mut TickReport,
    ) {
        match self.state {
            InteractionState::Targeting { handle, progress } if handle == hit.handle => {
                let progress = progress + 1;
                if progress < self.config.break_ticks {
                    self.state = InteractionState::Targeting { handle, progress };
                    return;
                }

                let kind = world.get_coord(hit.coord);
                if kind.is_breakable() {
                    world.set_coord(hit.coord, BlockKind::Air);
                    tracing::debug!(coord = %hit.coord, %kind, "block broken");
                    report.events.push(InteractionEvent::Broken {
                        coord: hit.coord,
                        kind,
                    });
                } else {
                    tracing::debug!(coord = %hit.coord, %kind, "block cannot be broken");
                    report.events.push(InteractionEvent::BreakRefused {
                        coord: hit.coord,
                        kind,
                    });
                }
                // The handle is stale either way once the threshold fires.
                self.state = InteractionState::Idle;
            }
            _ => {
                self.state = InteractionState::Targeting {
                    handle: hit.handle,
                    progress: 0,
                };
                tracing::trace!(coord = %hit.coord, "target acquired");
                report
                    .events
                    .push(InteractionEvent::TargetAcquired(hit.coord));
            }
        }
    }

    fn try_place<S: VisualSink>(
        &mut self,
        hit: RayHit,
        eye: Vec3,
        world: &mut VoxelWorld<S>,
        input: &mut dyn InputSource,
        report: &mut TickReport,
    ) {
        let Some(normal) = hit.normal else {
            return;
        };
        let candidate = hit.coord + normal;

        if self.inside_footprint(candidate, eye) {
            tracing::debug!(%candidate, "placement blocked by player");
            report
                .events
                .push(InteractionEvent::PlacementBlocked(candidate));
            return;
        }

        world.set_coord(candidate, self.selected);
        input.consume_place();
        tracing::debug!(%candidate, kind = %self.selected, "block placed");
        report.events.push(InteractionEvent::Placed {
            coord: candidate,
            kind: self.selected,
        });
    }

    fn inside_footprint(&self, candidate: GridCoord, eye: Vec3) -> bool {
        let body_center = eye - Vec3::Y * self.config.footprint_center_drop;
        let d = (candidate.center() - body_center).abs();
        let [hx, hy, hz] = self.config.footprint_half_extents;
        d.x <= hx && d.y <= hy && d.z <= hz
    }

    fn reset(&mut self) {
        self.state = InteractionState::Idle;
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new(InteractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelkit_input::InputState;
    use voxelkit_render::HeadlessScene;

    /// Player standing at the origin on a stone floor with a wall cell two
    /// steps ahead (-Z) at eye level.
    fn setup(wall: BlockKind) -> (VoxelWorld<HeadlessScene>, Viewer, InputState) {
        let mut world = VoxelWorld::new(HeadlessScene::new());
        for x in -3..=3 {
            for z in -3..=3 {
                world.set_coord(GridCoord::new(x, 0, z), BlockKind::Stone);
            }
        }
        world.set_coord(GridCoord::new(0, 2, -2), wall);
        let viewer = Viewer::at(Vec3::new(0.0, 2.3, 0.0));
        (world, viewer, InputState::captured())
    }

    fn wall() -> GridCoord {
        GridCoord::new(0, 2, -2)
    }

    #[test]
    fn resolves_target_without_input() {
        let (mut world, viewer, mut input) = setup(BlockKind::Dirt);
        let mut ctl = InteractionController::default();
        let report = ctl.update(&viewer, &mut world, &mut input);

        assert_eq!(report.hit.map(|h| h.coord), Some(wall()));
        assert!(report.events.is_empty());
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn break_needs_threshold_increments() {
        let (mut world, viewer, mut input) = setup(BlockKind::Dirt);
        let mut ctl = InteractionController::default();
        input.set_break(true);

        // First tick acquires, the next ten count 1..=10.
        for _ in 0..11 {
            ctl.update(&viewer, &mut world, &mut input);
        }
        assert_eq!(ctl.progress(), 10);
        assert_eq!(world.get_coord(wall()), BlockKind::Dirt);

        let report = ctl.update(&viewer, &mut world, &mut input);
        assert_eq!(
            report.events,
            vec![InteractionEvent::Broken {
                coord: wall(),
                kind: BlockKind::Dirt
            }]
        );
        assert_eq!(world.get_coord(wall()), BlockKind::Air);
        assert!(world.visual_at(wall()).is_none());
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn releasing_at_ten_restarts_from_zero() {
        let (mut world, viewer, mut input) = setup(BlockKind::Dirt);
        let mut ctl = InteractionController::default();
        input.set_break(true);
        for _ in 0..11 {
            ctl.update(&viewer, &mut world, &mut input);
        }
        assert_eq!(ctl.progress(), 10);

        input.set_break(false);
        ctl.update(&viewer, &mut world, &mut input);
        assert_eq!(ctl.state(), InteractionState::Idle);

        input.set_break(true);
        let report = ctl.update(&viewer, &mut world, &mut input);
        assert_eq!(report.events, vec![InteractionEvent::TargetAcquired(wall())]);
        assert_eq!(ctl.progress(), 0);

        ctl.update(&viewer, &mut world, &mut input);
        assert_eq!(world.get_coord(wall()), BlockKind::Dirt);
    }

    #[test]
    fn bedrock_survives_breaking() {
        let (mut world, viewer, mut input) = setup(BlockKind::Bedrock);
        let mut ctl = InteractionController::default();
        input.set_break(true);

        let mut refused = 0;
        for _ in 0..40 {
            let report = ctl.update(&viewer, &mut world, &mut input);
            refused += report
                .events
                .iter()
                .filter(|e| matches!(e, InteractionEvent::BreakRefused { .. }))
                .count();
        }
        assert_eq!(world.get_coord(wall()), BlockKind::Bedrock);
        assert!(world.visual_at(wall()).is_some());
        assert_eq!(refused, 3);
    }

    #[test]
    fn switching_target_resets_progress() {
        let (mut world, mut viewer, mut input) = setup(BlockKind::Dirt);
        world.set_coord(GridCoord::new(2, 2, 0), BlockKind::Dirt);
        let mut ctl = InteractionController::default();
        input.set_break(true);
        for _ in 0..6 {
            ctl.update(&viewer, &mut world, &mut input);
        }
        assert_eq!(ctl.progress(), 5);

        viewer.look_at(Vec3::new(2.0, 2.0, 0.0));
        let report = ctl.update(&viewer, &mut world, &mut input);
        assert_eq!(
            report.events,
            vec![InteractionEvent::TargetAcquired(GridCoord::new(2, 2, 0))]
        );
        assert_eq!(ctl.progress(), 0);
    }

    #[test]
    fn losing_the_target_resets() {
        let (mut world, mut viewer, mut input) = setup(BlockKind::Dirt);
        let mut ctl = InteractionController::default();
        input.set_break(true);
        for _ in 0..4 {
            ctl.update(&viewer, &mut world, &mut input);
        }
        viewer.look_at(Vec3::new(0.0, 20.0, 0.0));
        let report = ctl.update(&viewer, &mut world, &mut input);
        assert!(report.hit.is_none());
        assert_eq!(ctl.state(), InteractionState::Idle);
    }

    #[test]
    fn place_against_face_is_edge_triggered() {
        let (mut world, viewer, mut input) = setup(BlockKind::Stone);
        let mut ctl = InteractionController::default();
        input.set_place(true);

        let report = ctl.update(&viewer, &mut world, &mut input);
        let placed = GridCoord::new(0, 2, -1);
        assert_eq!(
            report.events,
            vec![InteractionEvent::Placed {
                coord: placed,
                kind: BlockKind::Dirt
            }]
        );
        assert_eq!(world.get_coord(placed), BlockKind::Dirt);
        assert!(!input.place_held());

        // Without a fresh press nothing else is placed.
        let blocks = world.block_count();
        ctl.update(&viewer, &mut world, &mut input);
        assert_eq!(world.block_count(), blocks);
    }

    #[test]
    fn placement_inside_player_is_rejected() {
        let (mut world, mut viewer, mut input) = setup(BlockKind::Dirt);
        viewer.look_at(Vec3::new(0.0, 0.0, 0.0));
        let mut ctl = InteractionController::default();
        input.set_place(true);

        let before = world.state_hash();
        let report = ctl.update(&viewer, &mut world, &mut input);

        assert_eq!(report.hit.map(|h| h.coord), Some(GridCoord::new(0, 0, 0)));
        assert_eq!(
            report.events,
            vec![InteractionEvent::PlacementBlocked(GridCoord::new(0, 1, 0))]
        );
        assert_eq!(world.state_hash(), before);
        assert!(input.place_held());
    }

    #[test]
    fn digit_keys_select_kind() {
        let (mut world, viewer, mut input) = setup(BlockKind::Stone);
        let mut ctl = InteractionController::default();
        input.set_key(KeyCode::Digit3, true);
        input.set_place(true);

        let report = ctl.update(&viewer, &mut world, &mut input);
        assert_eq!(ctl.selected(), BlockKind::Ore);
        assert!(report.events.contains(&InteractionEvent::Selected(BlockKind::Ore)));
        assert_eq!(world.get_coord(GridCoord::new(0, 2, -1)), BlockKind::Ore);
    }

    #[test]
    fn air_cannot_be_selected() {
        let mut ctl = InteractionController::default();
        assert!(!ctl.select(BlockKind::Air));
        assert!(ctl.select(BlockKind::Wood));
        assert_eq!(ctl.selected(), BlockKind::Wood);
    }

    #[test]
    fn free_pointer_does_nothing() {
        let (mut world, viewer, _) = setup(BlockKind::Dirt);
        let mut input = InputState::new();
        input.set_break(true);
        input.set_place(true);
        let mut ctl = InteractionController::default();
        let before = world.state_hash();
        for _ in 0..20 {
            let report = ctl.update(&viewer, &mut world, &mut input);
            assert!(report.hit.is_none());
        }
        assert_eq!(world.state_hash(), before);
    }
}
