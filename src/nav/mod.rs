//! Grid navigation
//!
//! The persistent node grid and the best-first pathfinder agents use to
//! chase the player.

mod node;
mod pathfinder;

pub use node::{NodeGrid, PathNode};
pub use pathfinder::{Pathfinder, SEARCH_STEP_BUDGET};
