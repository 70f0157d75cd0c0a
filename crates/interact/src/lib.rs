//! In-world interaction: break the block under the crosshair by holding, place
//! a block against the face under the crosshair by clicking.
//!
//! # Invariants
//! - Unbreakable blocks are never removed through this path.
//! - Releasing the break button or losing the target always discards progress.
//! - Placement never puts a block inside the player's own footprint.
//! - "No hit" and "blocked placement" are outcomes, not errors.

mod controller;

pub use controller::{
    InteractionConfig, InteractionController, InteractionEvent, InteractionState, PLACEABLE,
    TickReport,
};

pub fn crate_info() -> &'static str {
    "voxelkit-interact v0.1.0"
}
