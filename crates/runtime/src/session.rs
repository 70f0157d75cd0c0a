use crate::config::{ConfigError, EngineConfig};
use crate::look::LookController;
use crate::scheduler::{EntityPhysics, Scheduler, TickOutput};
use glam::Vec3;
use voxelkit_common::Viewer;
use voxelkit_ecs::{EntityId, EntityKind, EntityStore, MovementController, PhysicsBody};
use voxelkit_input::InputState;
use voxelkit_interact::InteractionController;
use voxelkit_kernel::{GenerationStats, VisualSink, VoxelWorld, WorldGenerator};
use voxelkit_render::{DebugTextRenderer, RayQuery, RenderView, Renderer};

/// Feet offset for spawned creatures.
const CREATURE_FEET: f32 = 0.5;

/// A running world: generated terrain, one player viewer and the per-tick
/// systems in their fixed order (look, movement, interaction, entity physics).
pub struct Session<S> {
    config: EngineConfig,
    world: VoxelWorld<S>,
    viewer: Viewer,
    input: InputState,
    entities: EntityStore,
    player: EntityId,
    scheduler: Scheduler<S>,
    generation: GenerationStats,
    last: TickOutput,
}

impl<S: VisualSink + RayQuery + 'static> Session<S> {
    /// Validate the config, generate the world into `scene` and place the
    /// player at the configured spawn.
    pub fn new(config: EngineConfig, scene: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = WorldGenerator::new(config.generator.clone())?;

        let mut world = VoxelWorld::new(scene);
        let generation = generator.generate(&mut world);
        // Generation writes are not gameplay history.
        world.drain_events();

        let spawn = Vec3::from_array(config.spawn);
        let viewer = Viewer::at(spawn);
        let mut entities = EntityStore::new();
        let player = entities.spawn(EntityKind::Player, spawn, None);

        let mut scheduler = Scheduler::new(config.tick_dt());
        scheduler
            .add(LookController::new(config.look_sensitivity))
            .add(MovementController::new(config.movement.clone()))
            .add(InteractionController::new(config.interaction.clone()))
            .add(EntityPhysics {
                gravity: config.movement.gravity,
            });

        tracing::info!(
            blocks = generation.blocks,
            systems = ?scheduler.names(),
            "session started"
        );

        Ok(Self {
            config,
            world,
            viewer,
            input: InputState::captured(),
            entities,
            player,
            scheduler,
            generation,
            last: TickOutput::default(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &VoxelWorld<S> {
        &self.world
    }

    /// Direct world access, outside the interaction rules.
    pub fn world_mut(&mut self) -> &mut VoxelWorld<S> {
        &mut self.world
    }

    pub fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    pub fn viewer_mut(&mut self) -> &mut Viewer {
        &mut self.viewer
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn entities(&self) -> &EntityStore {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityStore {
        &mut self.entities
    }

    pub fn player(&self) -> EntityId {
        self.player
    }

    pub fn generation(&self) -> GenerationStats {
        self.generation
    }

    pub fn tick_count(&self) -> u64 {
        self.scheduler.tick()
    }

    /// Output of the most recent tick.
    pub fn last_tick(&self) -> &TickOutput {
        &self.last
    }

    pub fn spawn_creature(&mut self, position: Vec3, max_hp: f32, attack: f32) -> EntityId {
        self.entities.spawn(
            EntityKind::creature(max_hp, attack),
            position,
            Some(PhysicsBody::new(CREATURE_FEET)),
        )
    }

    /// Run exactly one fixed tick.
    pub fn tick(&mut self) -> &TickOutput {
        let output = self.scheduler.run_tick(
            &mut self.world,
            &mut self.viewer,
            &mut self.input,
            &mut self.entities,
        );
        self.finish_tick(output);
        &self.last
    }

    /// Feed a frame of wall time. Returns how many ticks ran.
    pub fn advance(&mut self, frame_dt: f32) -> usize {
        let outputs = self.scheduler.advance(
            frame_dt,
            &mut self.world,
            &mut self.viewer,
            &mut self.input,
            &mut self.entities,
        );
        let ran = outputs.len();
        for output in outputs {
            self.finish_tick(output);
        }
        ran
    }

    fn finish_tick(&mut self, output: TickOutput) {
        if let Some(player) = self.entities.get_mut(self.player) {
            player.position = self.viewer.position;
        }
        for event in &output.interactions {
            tracing::trace!(tick = output.tick, ?event, "interaction");
        }
        self.last = output;
    }

    /// Render the current state as a text frame.
    pub fn present(&self) -> String {
        let view = RenderView {
            viewer: self.viewer,
            target: self.last.target(),
            ..RenderView::default()
        };
        DebugTextRenderer::new().render(&self.world, &view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxelkit_common::GridCoord;
    use voxelkit_input::KeyCode;
    use voxelkit_interact::InteractionEvent;
    use voxelkit_kernel::{BlockKind, GeneratorConfig, TerrainPolicy, WorldEvent};
    use voxelkit_render::HeadlessScene;

    fn flat_config() -> EngineConfig {
        EngineConfig {
            generator: GeneratorConfig {
                policy: TerrainPolicy::flat(),
                seed: 1,
            },
            spawn: [2.0, 8.0, 2.0],
            ..EngineConfig::default()
        }
    }

    fn settled(config: EngineConfig) -> Session<HeadlessScene> {
        let mut session = Session::new(config, HeadlessScene::new()).unwrap();
        for _ in 0..120 {
            session.tick();
        }
        session
    }

    #[test]
    fn player_lands_on_flat_grass() {
        let session = settled(flat_config());
        // Grass at y=3: eye rests at 3 + 0.5 + 1.8.
        assert!((session.viewer().position.y - 5.3).abs() < 1e-4);
        let player = session.entities().get(session.player()).unwrap();
        assert_eq!(player.position, session.viewer().position);
        assert!(session.world().events().is_empty());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = flat_config();
        config.tick_rate = 0.0;
        assert!(Session::new(config, HeadlessScene::new()).is_err());
    }

    #[test]
    fn break_block_in_front() {
        let mut session = settled(flat_config());
        let target = GridCoord::new(2, 4, 0);
        session.world_mut().set_coord(target, BlockKind::Stone);
        session.viewer_mut().look_at(target.center());
        session.input_mut().set_break(true);

        let mut broken = None;
        let mut logged = Vec::new();
        for _ in 0..12 {
            let out = session.tick();
            for e in &out.interactions {
                if let InteractionEvent::Broken { coord, .. } = e {
                    broken = Some(*coord);
                }
            }
            logged.extend(out.world_events.iter().copied());
        }
        assert_eq!(broken, Some(target));
        assert_eq!(session.world().get_coord(target), BlockKind::Air);
        // The manual write before the first tick and the break itself.
        assert_eq!(
            logged.last(),
            Some(&WorldEvent::BlockSet {
                coord: target,
                old: BlockKind::Stone,
                new: BlockKind::Air,
            })
        );
        assert_eq!(logged.len(), 2);
        assert!(session.world().events().is_empty());
    }

    #[test]
    fn event_log_does_not_grow_across_ticks() {
        let mut session = settled(flat_config());
        let wall = GridCoord::new(2, 5, -1);
        session.world_mut().set_coord(wall, BlockKind::Stone);
        session.viewer_mut().look_at(wall.center());
        session.input_mut().set_place(true);

        // The manual wall write plus the placement in front of it.
        assert_eq!(session.tick().world_events.len(), 2);
        for _ in 0..30 {
            assert!(session.tick().world_events.is_empty());
            assert!(session.world().events().is_empty());
        }
    }

    #[test]
    fn place_selected_block() {
        let mut session = settled(flat_config());
        let wall = GridCoord::new(2, 5, -1);
        session.world_mut().set_coord(wall, BlockKind::Stone);
        session.viewer_mut().look_at(wall.center());
        session.input_mut().set_key(KeyCode::Digit4, true);
        session.input_mut().set_place(true);

        session.tick();
        assert_eq!(
            session.world().get_coord(GridCoord::new(2, 5, 0)),
            BlockKind::Wood
        );
        assert!(session.present().contains("Target: stone (2, 5, -1)"));
    }

    #[test]
    fn look_delta_turns_viewer() {
        let mut session = settled(flat_config());
        let yaw = session.viewer().yaw;
        session.input_mut().add_look(100.0, 0.0);
        session.tick();
        assert!((session.viewer().yaw - (yaw + 0.2)).abs() < 1e-5);
    }

    #[test]
    fn creatures_fall_with_the_world() {
        let mut session = settled(flat_config());
        let id = session.spawn_creature(Vec3::new(-2.0, 9.0, -2.0), 10.0, 1.0);
        for _ in 0..120 {
            session.tick();
        }
        let c = session.entities().get(id).unwrap();
        assert!((c.position.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn advance_runs_fixed_ticks() {
        let mut session = Session::new(flat_config(), HeadlessScene::new()).unwrap();
        assert_eq!(session.advance(0.06), 3);
        assert_eq!(session.tick_count(), 3);
    }

    #[test]
    fn same_config_same_world() {
        let a = Session::new(EngineConfig::default(), HeadlessScene::new()).unwrap();
        let b = Session::new(EngineConfig::default(), HeadlessScene::new()).unwrap();
        assert_eq!(a.world().state_hash(), b.world().state_hash());
        assert!(a.generation().blocks > 0);
    }
}
