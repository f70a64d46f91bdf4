//! Axis-aligned speculative collision
//!
//! Rectangle primitives and the probe functions that test an intended move
//! against tiles, objects, other agents, and the player before it commits.

mod probe;
mod rect;

pub use probe::{Mover, ObjectHit, probe_agents, probe_objects, probe_player, probe_tiles};
pub use rect::Rect;
