//! Developer tooling: read-only inspection of worlds and entities.
//!
//! # Invariants
//! - Nothing in here mutates the world it looks at.

mod inspector;

pub use inspector::{BlockInfo, EntityInfo, WorldInspector, WorldSummary};

pub fn crate_info() -> &'static str {
    "voxelkit-tools v0.1.0"
}
