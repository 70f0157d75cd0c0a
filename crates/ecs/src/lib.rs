//! Physics-lite bodies, player movement and the entity collection.
//!
//! Collision is a single vertical check: the cell under a body's feet either
//! holds a block (land on its top face) or it does not (keep falling).
//!
//! # Invariants
//! - Entities are stored in BTreeMap for deterministic iteration.
//! - Only entities with a `PhysicsBody` are moved by `step_physics`.

mod body;
mod entity;
mod movement;

pub use body::PhysicsBody;
pub use entity::{Entity, EntityId, EntityKind, EntityStore};
pub use movement::{MovementConfig, MovementController};

pub fn crate_info() -> &'static str {
    "voxelkit-ecs v0.1.0"
}
