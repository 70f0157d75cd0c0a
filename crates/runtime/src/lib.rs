//! Runtime wiring: the per-tick update order, fixed-timestep scheduling and a
//! headless session that owns a world, a viewer and the controllers.
//!
//! # Invariants
//! - Systems run in registration order, every tick, to completion.
//! - A frame never advances the simulation by more than `MAX_FRAME_DT`.

mod config;
mod look;
mod scheduler;
mod session;

pub use config::{ConfigError, EngineConfig};
pub use look::LookController;
pub use scheduler::{EntityPhysics, MAX_FRAME_DT, Scheduler, TickContext, TickOutput, Updatable};
pub use session::Session;

pub fn crate_info() -> &'static str {
    "voxelkit-runtime v0.1.0"
}
