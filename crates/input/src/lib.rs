//! Input: a polled source of key, button and pointer state.
//!
//! # Invariants
//! - Controllers only poll; nothing here pushes events into the core.
//! - The place button is edge-triggered by the consumer calling `consume_place`.

mod source;

pub use source::{InputSource, InputState, KeyCode};
