//! A top-down tile-game simulation core
//!
//! This crate provides:
//! - Grid pathfinding over the world's tile map
//! - Speculative axis-aligned collision probes
//! - Wander/pursue agent behavior with ranged attacks
//! - A headless frame-by-frame sim driver

pub mod agent;
pub mod collision;
pub mod core;
pub mod nav;
pub mod world;

// Re-exports for convenience
pub use glam;
pub use rand;
pub use rand_pcg;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::agent::{
        Agent, AgentKind, Direction, Projectile, ProjectileOwner, ProjectileSpec, PursuitParams,
        ShotParams, WanderParams,
    };
    pub use crate::collision::{Mover, Rect};
    pub use crate::core::{
        EventQueue, FrameStats, GameEvent, RunOutcome, Sim, SimConfig, Tuning,
    };
    pub use crate::nav::Pathfinder;
    pub use crate::world::{
        GameObject, ObjectKind, Player, PlayerInput, TileMap, World, WorldError,
    };
    pub use glam::IVec2;
}
