use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use glam::Vec3;
use tracing_subscriber::EnvFilter;
use voxelkit_input::KeyCode;
use voxelkit_interact::InteractionEvent;
use voxelkit_kernel::{TerrainPolicy, VoxelWorld, WorldGenerator};
use voxelkit_render::HeadlessScene;
use voxelkit_runtime::{EngineConfig, Session};
use voxelkit_tools::WorldInspector;

#[derive(Parser)]
#[command(name = "voxelkit-cli", about = "CLI tool for voxelkit worlds")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON engine config; defaults apply to anything it leaves out
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    Flat,
    HeightField,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Generate a world and print its summary
    Generate {
        /// Terrain policy, overriding the config
        #[arg(short, long)]
        policy: Option<Policy>,
        /// Seed for feature scattering, overriding the config
        #[arg(short, long)]
        seed: Option<u64>,
        /// Also print the effective config as JSON
        #[arg(long)]
        dump_config: bool,
    },
    /// Run a headless session with scripted input
    Simulate {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "120")]
        ticks: u64,
        #[arg(short, long)]
        policy: Option<Policy>,
        #[arg(short, long)]
        seed: Option<u64>,
        /// Hold W for the whole run
        #[arg(long)]
        walk: bool,
        /// Hold the break button for the whole run
        #[arg(long)]
        mine: bool,
        /// Press place once every this many ticks (0 disables)
        #[arg(long, default_value = "0")]
        place_every: u64,
        /// Digit key (1-7) to select the placed block
        #[arg(long)]
        select: Option<u8>,
        /// Creatures dropped around the spawn point
        #[arg(long, default_value = "0")]
        creatures: usize,
        /// Print a frame every this many ticks (0 prints only the last)
        #[arg(long, default_value = "0")]
        frame_every: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("voxelkit-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", voxelkit_render::crate_info());
            println!("ecs: {}", voxelkit_ecs::crate_info());
            println!("interact: {}", voxelkit_interact::crate_info());
            println!("tools: {}", voxelkit_tools::crate_info());
            println!("runtime: {}", voxelkit_runtime::crate_info());
            println!("generator: {:?}", config.generator.policy);
        }
        Commands::Generate {
            policy,
            seed,
            dump_config,
        } => {
            apply_overrides(&mut config, policy, seed);
            config.validate()?;
            if dump_config {
                println!("{}", config.to_json_pretty()?);
            }

            let generator = WorldGenerator::new(config.generator.clone())?;
            let mut world = VoxelWorld::new(HeadlessScene::new());
            let stats = generator.generate(&mut world);
            world.drain_events();

            println!(
                "Generated: columns={} trees={} seed={}",
                stats.columns, stats.trees, config.generator.seed
            );
            println!("{}", WorldInspector::summary(&world));
            if let Some(h) = world.surface_height(0, 0) {
                println!("Surface at origin: y={h}");
            }
        }
        Commands::Simulate {
            ticks,
            policy,
            seed,
            walk,
            mine,
            place_every,
            select,
            creatures,
            frame_every,
        } => {
            apply_overrides(&mut config, policy, seed);
            let mut session = Session::new(config, HeadlessScene::new())?;

            let spawn = session.viewer().position;
            for i in 0..creatures {
                let angle = i as f32 * std::f32::consts::TAU / creatures as f32;
                let at = spawn + Vec3::new(angle.cos() * 3.0, 0.0, angle.sin() * 3.0);
                session.spawn_creature(at, 20.0, 2.0);
            }

            if let Some(digit) = select {
                let key = digit
                    .checked_sub(1)
                    .and_then(|i| KeyCode::DIGITS.get(i as usize))
                    .with_context(|| format!("--select expects 1-7, got {digit}"))?;
                session.input_mut().set_key(*key, true);
            }
            session.input_mut().set_key(KeyCode::KeyW, walk);
            session.input_mut().set_break(mine);

            let mut broken = 0usize;
            let mut placed = 0usize;
            let mut blocked = 0usize;
            for t in 1..=ticks {
                if place_every > 0 && t % place_every == 0 {
                    session.input_mut().set_place(true);
                }
                for event in &session.tick().interactions {
                    match event {
                        InteractionEvent::Broken { .. } => broken += 1,
                        InteractionEvent::Placed { .. } => placed += 1,
                        InteractionEvent::PlacementBlocked(_) => blocked += 1,
                        _ => {}
                    }
                }
                // A blocked placement would otherwise retry every tick.
                session.input_mut().set_place(false);
                if frame_every > 0 && t % frame_every == 0 {
                    println!("--- tick {t} ---\n{}", session.present());
                }
            }

            tracing::info!(ticks = session.tick_count(), "simulation finished");
            println!("{}", session.present());
            println!(
                "Ticks: {} broken={} placed={} blocked={}",
                session.tick_count(),
                broken,
                placed,
                blocked
            );
            for id in WorldInspector::list_entities(session.entities()) {
                if let Some(info) = WorldInspector::inspect_entity(session.entities(), id) {
                    println!("{info}");
                }
            }
            println!("{}", WorldInspector::summary(session.world()));
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut EngineConfig, policy: Option<Policy>, seed: Option<u64>) {
    if let Some(policy) = policy {
        config.generator.policy = match policy {
            Policy::Flat => TerrainPolicy::flat(),
            Policy::HeightField => TerrainPolicy::height_field(),
        };
    }
    if let Some(seed) = seed {
        config.generator.seed = seed;
    }
}
