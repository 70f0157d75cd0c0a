//! Shared types used across the voxelkit crates.
//!
//! # Invariants
//! - Float positions map to grid cells by round-half-up on every axis.
//! - The viewer's up direction is always world +Y.

mod coord;
mod viewer;

pub use coord::GridCoord;
pub use viewer::Viewer;
