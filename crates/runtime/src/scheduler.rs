use voxelkit_common::{GridCoord, Viewer};
use voxelkit_ecs::{EntityStore, MovementController};
use voxelkit_input::InputSource;
use voxelkit_interact::{InteractionController, InteractionEvent};
use voxelkit_kernel::{VisualSink, VoxelWorld, WorldEvent};
use voxelkit_render::{RayHit, RayQuery};

/// Longest frame the scheduler will simulate; anything beyond is dropped.
pub const MAX_FRAME_DT: f32 = 0.1;

/// What a single tick produced, for presentation and logging.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutput {
    pub tick: u64,
    pub hit: Option<RayHit>,
    pub interactions: Vec<InteractionEvent>,
    /// Block mutations made during the tick, drained from the world log.
    pub world_events: Vec<WorldEvent>,
}

impl TickOutput {
    pub fn target(&self) -> Option<GridCoord> {
        self.hit.map(|h| h.coord)
    }
}

/// Everything a system may touch during one tick.
pub struct TickContext<'a, S> {
    pub world: &'a mut VoxelWorld<S>,
    pub viewer: &'a mut Viewer,
    pub input: &'a mut dyn InputSource,
    pub entities: &'a mut EntityStore,
    pub dt: f32,
    pub output: &'a mut TickOutput,
}

/// A per-tick system.
pub trait Updatable<S> {
    fn name(&self) -> &'static str;

    fn update(&mut self, ctx: &mut TickContext<'_, S>);
}

impl<S: VisualSink> Updatable<S> for MovementController {
    fn name(&self) -> &'static str {
        "movement"
    }

    fn update(&mut self, ctx: &mut TickContext<'_, S>) {
        MovementController::update(self, ctx.viewer, ctx.world, &*ctx.input, ctx.dt);
    }
}

impl<S: VisualSink + RayQuery> Updatable<S> for InteractionController {
    fn name(&self) -> &'static str {
        "interaction"
    }

    fn update(&mut self, ctx: &mut TickContext<'_, S>) {
        let report = InteractionController::update(self, ctx.viewer, ctx.world, &mut *ctx.input);
        ctx.output.hit = report.hit;
        ctx.output.interactions.extend(report.events);
    }
}

/// Gravity and landing for every entity that carries a body.
#[derive(Debug, Clone)]
pub struct EntityPhysics {
    pub gravity: f32,
}

impl<S: VisualSink> Updatable<S> for EntityPhysics {
    fn name(&self) -> &'static str {
        "entity_physics"
    }

    fn update(&mut self, ctx: &mut TickContext<'_, S>) {
        ctx.entities.step_physics(ctx.world, self.gravity, ctx.dt);
    }
}

/// Ordered system list driven at a fixed timestep.
pub struct Scheduler<S> {
    systems: Vec<Box<dyn Updatable<S>>>,
    tick_dt: f32,
    tick_accumulator: f64,
    tick: u64,
}

impl<S> Scheduler<S> {
    pub fn new(tick_dt: f32) -> Self {
        Self {
            systems: Vec::new(),
            tick_dt,
            tick_accumulator: 0.0,
            tick: 0,
        }
    }

    /// Append a system. Systems run in the order they were added.
    pub fn add(&mut self, system: impl Updatable<S> + 'static) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|s| s.name()).collect()
    }

    pub fn tick_dt(&self) -> f32 {
        self.tick_dt
    }

    /// Ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run every system once with the fixed dt.
    ///
    /// The world event log is drained into the output, so it never holds more
    /// than one tick of mutations.
    pub fn run_tick(
        &mut self,
        world: &mut VoxelWorld<S>,
        viewer: &mut Viewer,
        input: &mut dyn InputSource,
        entities: &mut EntityStore,
    ) -> TickOutput
    where
        S: VisualSink,
    {
        self.tick += 1;
        let _span = tracing::trace_span!("tick", tick = self.tick).entered();
        let mut output = TickOutput {
            tick: self.tick,
            ..TickOutput::default()
        };
        let mut ctx = TickContext {
            world,
            viewer,
            input,
            entities,
            dt: self.tick_dt,
            output: &mut output,
        };
        for system in &mut self.systems {
            system.update(&mut ctx);
        }
        let world_events = ctx.world.drain_events();
        output.world_events = world_events;
        output
    }

    /// Feed one frame of wall time and run as many whole ticks as it covers.
    ///
    /// Returns the outputs of the ticks that ran, oldest first.
    pub fn advance(
        &mut self,
        frame_dt: f32,
        world: &mut VoxelWorld<S>,
        viewer: &mut Viewer,
        input: &mut dyn InputSource,
        entities: &mut EntityStore,
    ) -> Vec<TickOutput>
    where
        S: VisualSink,
    {
        self.tick_accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT) as f64;
        let step = self.tick_dt as f64;
        let mut outputs = Vec::new();
        while self.tick_accumulator >= step {
            self.tick_accumulator -= step;
            outputs.push(self.run_tick(world, viewer, input, entities));
        }
        outputs
    }
}
