//! Agents and their per-frame behavior
//!
//! The agent struct, the tagged kind variants with their parameter structs,
//! the wander/pursue decision logic, and projectiles.

mod behavior;
mod direction;
mod entity;
mod kind;
mod projectile;

pub use behavior::{BehaviorCtx, update_agent};
pub use direction::Direction;
pub use entity::{AGENT_HURT_FRAMES, Agent, DYING_FRAMES};
pub use kind::{AgentKind, ProjectileSpec, PursuitParams, ShotParams, WanderParams};
pub use projectile::{Projectile, ProjectileOwner};
