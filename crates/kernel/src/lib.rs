//! World Kernel: authoritative voxel state, the block catalog, and terrain generation.
//!
//! # Invariants
//! - A cell has a visual handle iff it holds a visible block kind.
//! - Air is never stored; absence means Air.
//! - All block mutations flow through `VoxelWorld::set_coord` and are logged.
//! - Generation is a pure function of its config and random source.

pub mod block;
pub mod generate;
pub mod rng;
pub mod visual;
pub mod world;

pub use block::{BlockKind, BlockProps};
pub use generate::{GenerateError, GenerationStats, GeneratorConfig, TerrainPolicy, WorldGenerator};
pub use rng::{RandomSource, SplitMix64};
pub use visual::{NullVisuals, VisualHandle, VisualSink};
pub use world::{VoxelWorld, WorldEvent};
