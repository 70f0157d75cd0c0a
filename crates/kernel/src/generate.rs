//! Terrain and feature synthesis.
//!
//! Two policies exist. `HeightField` is the default and the one the runtime
//! uses; `Flat` builds a small fixed test plot.

use crate::block::BlockKind;
use crate::rng::{RandomSource, SplitMix64};
use crate::visual::VisualSink;
use crate::world::VoxelWorld;
use serde::{Deserialize, Serialize};
use voxelkit_common::GridCoord;

/// Trunk length of a generated tree.
pub const TRUNK_LENGTH: i32 = 4;
/// Canopy cells are strictly closer than this (Manhattan) to the canopy center.
pub const CANOPY_REACH: i32 = 4;

/// How terrain columns are shaped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TerrainPolicy {
    /// Uniform columns over `-half_extent..half_extent` with a wood post at the origin.
    Flat {
        half_extent: i32,
        /// Grass level; Dirt fills `1..height`.
        height: i32,
        /// Length of the decorative wood post above the grass.
        post_height: i32,
    },
    /// Two-sinusoid height field with scattered trees.
    HeightField {
        half_extent: i32,
        min_height: i32,
        max_height: i32,
        frequency: f32,
        /// Per-column probability of rooting a tree.
        tree_chance: f32,
    },
}

impl TerrainPolicy {
    pub fn flat() -> Self {
        Self::Flat {
            half_extent: 5,
            height: 3,
            post_height: 3,
        }
    }

    pub fn height_field() -> Self {
        Self::HeightField {
            half_extent: 16,
            min_height: 3,
            max_height: 8,
            frequency: 0.1,
            tree_chance: 0.02,
        }
    }
}

impl Default for TerrainPolicy {
    fn default() -> Self {
        Self::height_field()
    }
}

/// Generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub policy: TerrainPolicy,
    /// Seed for the default random source.
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            policy: TerrainPolicy::default(),
            seed: 42,
        }
    }
}

/// Errors from generator configuration.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GenerateError {
    #[error("half extent must be positive, got {0}")]
    InvalidExtent(i32),
    #[error("invalid height range {min}..={max}")]
    InvalidHeightRange { min: i32, max: i32 },
    #[error("tree chance must be within [0, 1], got {0}")]
    InvalidTreeChance(f32),
    #[error("frequency must be finite, got {0}")]
    InvalidFrequency(f32),
}

/// Highest column top, posts included, the generator accepts.
pub const MAX_COLUMN_HEIGHT: i32 = 4096;

impl GeneratorConfig {
    pub fn validate(&self) -> Result<(), GenerateError> {
        match self.policy {
            TerrainPolicy::Flat {
                half_extent,
                height,
                post_height,
            } => {
                if half_extent <= 0 {
                    return Err(GenerateError::InvalidExtent(half_extent));
                }
                let top = height.saturating_add(post_height);
                if height < 1 || post_height < 0 || top > MAX_COLUMN_HEIGHT {
                    return Err(GenerateError::InvalidHeightRange {
                        min: height,
                        max: top,
                    });
                }
            }
            TerrainPolicy::HeightField {
                half_extent,
                min_height,
                max_height,
                frequency,
                tree_chance,
            } => {
                if half_extent <= 0 {
                    return Err(GenerateError::InvalidExtent(half_extent));
                }
                if min_height < 1 || max_height < min_height || max_height > MAX_COLUMN_HEIGHT {
                    return Err(GenerateError::InvalidHeightRange {
                        min: min_height,
                        max: max_height,
                    });
                }
                if !frequency.is_finite() {
                    return Err(GenerateError::InvalidFrequency(frequency));
                }
                if !(0.0..=1.0).contains(&tree_chance) {
                    return Err(GenerateError::InvalidTreeChance(tree_chance));
                }
            }
        }
        Ok(())
    }
}

/// Counts reported after a generation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub columns: usize,
    pub trees: usize,
    pub blocks: usize,
}

/// Populates a world according to a validated `GeneratorConfig`.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: GeneratorConfig,
}

impl WorldGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerateError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate using a `SplitMix64` seeded from the config.
    pub fn generate<S: VisualSink>(&self, world: &mut VoxelWorld<S>) -> GenerationStats {
        let mut rng = SplitMix64::new(self.config.seed);
        self.generate_with(world, &mut rng)
    }

    /// Generate drawing feature decisions from `rng`.
    ///
    /// Overwrites every touched cell. Calling this twice on one world is not
    /// guarded against.
    pub fn generate_with<S: VisualSink, R: RandomSource + ?Sized>(
        &self,
        world: &mut VoxelWorld<S>,
        rng: &mut R,
    ) -> GenerationStats {
        let _span = tracing::info_span!("generate").entered();
        let mut stats = GenerationStats::default();

        match self.config.policy {
            TerrainPolicy::Flat {
                half_extent,
                height,
                post_height,
            } => {
                for x in -half_extent..half_extent {
                    for z in -half_extent..half_extent {
                        fill_column(world, x, z, height);
                        stats.columns += 1;
                    }
                }
                for y in height + 1..=height + post_height {
                    world.set_coord(GridCoord::new(0, y, 0), BlockKind::Wood);
                }
            }
            TerrainPolicy::HeightField {
                half_extent,
                min_height,
                max_height,
                frequency,
                tree_chance,
            } => {
                for x in -half_extent..half_extent {
                    for z in -half_extent..half_extent {
                        let h = column_height(x, z, min_height, max_height, frequency);
                        fill_column(world, x, z, h);
                        stats.columns += 1;
                        // One draw per column keeps the sequence aligned with the grid.
                        if rng.next_f32() < tree_chance {
                            place_tree(world, GridCoord::new(x, h + 1, z));
                            stats.trees += 1;
                        }
                    }
                }
            }
        }

        stats.blocks = world.block_count();
        tracing::info!(
            columns = stats.columns,
            trees = stats.trees,
            blocks = stats.blocks,
            "world generated"
        );
        stats
    }
}

/// Surface height of column (x, z): two sinusoids mapped onto `min..=max`.
pub fn column_height(x: i32, z: i32, min: i32, max: i32, frequency: f32) -> i32 {
    let wave = ((x as f32 * frequency).sin() + (z as f32 * frequency).cos()) * 0.5;
    let span = max - min;
    let step = ((wave + 1.0) * 0.5 * (span + 1) as f32).floor() as i32;
    min + step.clamp(0, span)
}

/// Bedrock at y=0, Dirt through `height - 1`, Grass on top.
fn fill_column<S: VisualSink>(world: &mut VoxelWorld<S>, x: i32, z: i32, height: i32) {
    world.set_coord(GridCoord::new(x, 0, z), BlockKind::Bedrock);
    for y in 1..height {
        world.set_coord(GridCoord::new(x, y, z), BlockKind::Dirt);
    }
    world.set_coord(GridCoord::new(x, height, z), BlockKind::Grass);
}

/// Wood trunk rising from `root`, capped by a Manhattan-diamond of Leaves.
///
/// Leaves never replace wood, so the trunk (and any neighbouring trunk) survives.
pub fn place_tree<S: VisualSink>(world: &mut VoxelWorld<S>, root: GridCoord) {
    for dy in 0..TRUNK_LENGTH {
        world.set_coord(GridCoord::new(root.x, root.y + dy, root.z), BlockKind::Wood);
    }

    let center = GridCoord::new(root.x, root.y + TRUNK_LENGTH, root.z);
    let r = CANOPY_REACH - 1;
    for dx in -r..=r {
        for dy in -r..=r {
            for dz in -r..=r {
                let cell = GridCoord::new(center.x + dx, center.y + dy, center.z + dz);
                if cell.manhattan(center) >= CANOPY_REACH {
                    continue;
                }
                if world.get_coord(cell) == BlockKind::Wood {
                    continue;
                }
                world.set_coord(cell, BlockKind::Leaves);
            }
        }
    }
    tracing::trace!(%root, "tree placed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::NullVisuals;

    fn empty() -> VoxelWorld<NullVisuals> {
        VoxelWorld::new(NullVisuals::new())
    }

    /// Replays a fixed sequence so tests control feature placement exactly.
    struct Scripted(Vec<f32>, usize);

    impl RandomSource for Scripted {
        fn next_f32(&mut self) -> f32 {
            let v = self.0[self.1 % self.0.len()];
            self.1 += 1;
            v
        }
    }

    #[test]
    fn flat_policy_layers() {
        let generator = WorldGenerator::new(GeneratorConfig {
            policy: TerrainPolicy::flat(),
            seed: 0,
        })
        .unwrap();
        let mut w = empty();
        let stats = generator.generate(&mut w);

        assert_eq!(stats.columns, 100);
        assert_eq!(w.get_coord(GridCoord::new(-5, 0, 4)), BlockKind::Bedrock);
        assert_eq!(w.get_coord(GridCoord::new(-5, 1, 4)), BlockKind::Dirt);
        assert_eq!(w.get_coord(GridCoord::new(-5, 2, 4)), BlockKind::Dirt);
        assert_eq!(w.get_coord(GridCoord::new(-5, 3, 4)), BlockKind::Grass);
        assert_eq!(w.get_coord(GridCoord::new(5, 0, 0)), BlockKind::Air);
        for y in 4..=6 {
            assert_eq!(w.get_coord(GridCoord::new(0, y, 0)), BlockKind::Wood);
        }
        assert_eq!(w.get_coord(GridCoord::new(0, 7, 0)), BlockKind::Air);
        assert_eq!(stats.blocks, 100 * 4 + 3);
    }

    #[test]
    fn column_height_stays_in_range() {
        for x in -64..64 {
            for z in -64..64 {
                let h = column_height(x, z, 3, 8, 0.1);
                assert!((3..=8).contains(&h), "h={h} at ({x},{z})");
            }
        }
    }

    #[test]
    fn column_height_varies() {
        let heights: std::collections::BTreeSet<i32> = (-16..16)
            .flat_map(|x| (-16..16).map(move |z| column_height(x, z, 3, 8, 0.1)))
            .collect();
        assert!(heights.len() >= 4);
    }

    #[test]
    fn height_field_columns_are_capped_with_grass() {
        let generator = WorldGenerator::new(GeneratorConfig {
            policy: TerrainPolicy::HeightField {
                half_extent: 8,
                min_height: 3,
                max_height: 8,
                frequency: 0.1,
                tree_chance: 0.0,
            },
            seed: 1,
        })
        .unwrap();
        let mut w = empty();
        let stats = generator.generate(&mut w);
        assert_eq!(stats.trees, 0);

        for x in -8..8 {
            for z in -8..8 {
                let h = column_height(x, z, 3, 8, 0.1);
                assert_eq!(w.get_coord(GridCoord::new(x, 0, z)), BlockKind::Bedrock);
                assert_eq!(w.get_coord(GridCoord::new(x, h - 1, z)), BlockKind::Dirt);
                assert_eq!(w.get_coord(GridCoord::new(x, h, z)), BlockKind::Grass);
                assert_eq!(w.get_coord(GridCoord::new(x, h + 1, z)), BlockKind::Air);
            }
        }
    }

    #[test]
    fn height_field_is_deterministic() {
        let generator = WorldGenerator::new(GeneratorConfig {
            policy: TerrainPolicy::HeightField {
                half_extent: 16,
                min_height: 3,
                max_height: 8,
                frequency: 0.1,
                tree_chance: 0.05,
            },
            seed: 99,
        })
        .unwrap();
        let mut a = empty();
        let mut b = empty();
        let sa = generator.generate(&mut a);
        let sb = generator.generate(&mut b);

        assert!(sa.trees > 0);
        assert_eq!(sa, sb);
        assert_eq!(a.state_hash(), b.state_hash());
        assert!(a.blocks().eq(b.blocks()));
    }

    #[test]
    fn different_seeds_scatter_different_trees() {
        let make = |seed| {
            let generator = WorldGenerator::new(GeneratorConfig {
                policy: TerrainPolicy::HeightField {
                    half_extent: 16,
                    min_height: 3,
                    max_height: 8,
                    frequency: 0.1,
                    tree_chance: 0.1,
                },
                seed,
            })
            .unwrap();
            let mut w = empty();
            generator.generate(&mut w);
            w.state_hash()
        };
        assert_ne!(make(1), make(2));
    }

    #[test]
    fn scripted_source_controls_tree_placement() {
        let generator = WorldGenerator::new(GeneratorConfig {
            policy: TerrainPolicy::HeightField {
                half_extent: 1,
                min_height: 3,
                max_height: 8,
                frequency: 0.1,
                tree_chance: 0.5,
            },
            seed: 0,
        })
        .unwrap();
        // Columns iterate x-major: (-1,-1), (-1,0), (0,-1), (0,0). Only the last roots a tree.
        let mut rng = Scripted(vec![0.9, 0.9, 0.9, 0.1], 0);
        let mut w = empty();
        let stats = generator.generate_with(&mut w, &mut rng);

        assert_eq!(stats.trees, 1);
        let h = column_height(0, 0, 3, 8, 0.1);
        for dy in 1..=TRUNK_LENGTH {
            assert_eq!(w.get_coord(GridCoord::new(0, h + dy, 0)), BlockKind::Wood);
        }
    }

    #[test]
    fn tree_shape() {
        let mut w = empty();
        let root = GridCoord::new(0, 10, 0);
        place_tree(&mut w, root);

        for dy in 0..TRUNK_LENGTH {
            assert_eq!(w.get_coord(GridCoord::new(0, 10 + dy, 0)), BlockKind::Wood);
        }
        let center = GridCoord::new(0, 14, 0);
        assert_eq!(w.get_coord(center), BlockKind::Leaves);
        assert_eq!(w.get_coord(GridCoord::new(3, 14, 0)), BlockKind::Leaves);
        assert_eq!(w.get_coord(GridCoord::new(0, 17, 0)), BlockKind::Leaves);
        assert_eq!(w.get_coord(GridCoord::new(4, 14, 0)), BlockKind::Air);
        assert_eq!(w.get_coord(GridCoord::new(2, 16, 0)), BlockKind::Air);

        // Diamond of reach 4 holds 63 cells; three of them are trunk.
        let leaves = w.blocks().filter(|(_, k)| *k == BlockKind::Leaves).count();
        assert_eq!(leaves, 60);
        assert_eq!(w.block_count(), 64);
    }

    #[test]
    fn leaves_do_not_replace_neighbouring_trunks() {
        let mut w = empty();
        place_tree(&mut w, GridCoord::new(0, 1, 0));
        place_tree(&mut w, GridCoord::new(2, 1, 0));
        for dy in 0..TRUNK_LENGTH {
            assert_eq!(w.get_coord(GridCoord::new(0, 1 + dy, 0)), BlockKind::Wood);
            assert_eq!(w.get_coord(GridCoord::new(2, 1 + dy, 0)), BlockKind::Wood);
        }
    }

    #[test]
    fn validate_rejects_bad_configs() {
        let bad_extent = GeneratorConfig {
            policy: TerrainPolicy::Flat {
                half_extent: 0,
                height: 3,
                post_height: 3,
            },
            seed: 0,
        };
        assert_eq!(bad_extent.validate(), Err(GenerateError::InvalidExtent(0)));

        let inverted = GeneratorConfig {
            policy: TerrainPolicy::HeightField {
                half_extent: 4,
                min_height: 8,
                max_height: 3,
                frequency: 0.1,
                tree_chance: 0.0,
            },
            seed: 0,
        };
        assert!(matches!(
            WorldGenerator::new(inverted),
            Err(GenerateError::InvalidHeightRange { min: 8, max: 3 })
        ));

        let chance = GeneratorConfig {
            policy: TerrainPolicy::HeightField {
                half_extent: 4,
                min_height: 3,
                max_height: 8,
                frequency: 0.1,
                tree_chance: 1.5,
            },
            seed: 0,
        };
        assert_eq!(chance.validate(), Err(GenerateError::InvalidTreeChance(1.5)));

        let tall = GeneratorConfig {
            policy: TerrainPolicy::Flat {
                half_extent: 2,
                height: i32::MAX - 1,
                post_height: 3,
            },
            seed: 0,
        };
        assert_eq!(
            tall.validate(),
            Err(GenerateError::InvalidHeightRange {
                min: i32::MAX - 1,
                max: i32::MAX,
            })
        );

        let sky = GeneratorConfig {
            policy: TerrainPolicy::HeightField {
                half_extent: 4,
                min_height: 3,
                max_height: MAX_COLUMN_HEIGHT + 1,
                frequency: 0.1,
                tree_chance: 0.0,
            },
            seed: 0,
        };
        assert!(sky.validate().is_err());
    }

    #[test]
    fn default_config_is_height_field() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.policy, TerrainPolicy::height_field());
        assert!(cfg.validate().is_ok());
    }
}
