//! Agent kinds and their behavior parameters
//!
//! Per-kind behavior is a tagged variant carrying its own parameter structs,
//! dispatched through one `decide` path in [`crate::agent::behavior`].

/// Wander timing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WanderParams {
    /// Frames to hold a direction before sampling a new one
    pub lock_frames: u32,
}

impl Default for WanderParams {
    fn default() -> Self {
        Self { lock_frames: 180 }
    }
}

/// Pursuit hysteresis, in tile units. `enter_tiles` must be below
/// `exit_tiles` so the two thresholds never fight at a single boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PursuitParams {
    /// Pursue when the tile distance to the player drops below this
    pub enter_tiles: i32,
    /// Give up when the tile distance exceeds this
    pub exit_tiles: i32,
}

impl Default for PursuitParams {
    fn default() -> Self {
        Self {
            enter_tiles: 8,
            exit_tiles: 20,
        }
    }
}

/// Ranged-attack gating. Firing requires the cooldown to be at its cap AND
/// a per-frame percentage roll to pass, so shots are probabilistic-bounded
/// rather than strictly periodic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShotParams {
    /// Frames the cooldown counter must reach before a shot is possible
    pub cooldown_frames: u32,
    /// Chance (0-100) that a ready agent actually fires on a given frame
    pub fire_chance_pct: u32,
}

impl Default for ShotParams {
    fn default() -> Self {
        Self {
            cooldown_frames: 30,
            fire_chance_pct: 81,
        }
    }
}

/// Projectile template owned by a ranged agent. Firing stamps this into an
/// independent live projectile; the template itself never moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectileSpec {
    pub name: &'static str,
    /// Pixels per frame
    pub speed: i32,
    /// Frames before the projectile expires on its own
    pub life_frames: i32,
}

/// The kind of an agent, carrying its behavior parameters
#[derive(Debug, Clone)]
pub enum AgentKind {
    /// Non-hostile wanderer. Blocks movement, never pursues, never fires.
    Villager { wander: WanderParams },
    /// Melee pursuer that tracks the player every single frame
    Stalker,
    /// Hostile that wanders until the player comes close, pursues with
    /// hysteresis, and fires projectiles
    Ranged {
        wander: WanderParams,
        pursuit: PursuitParams,
        shot: ShotParams,
        projectile: ProjectileSpec,
    },
}

impl AgentKind {
    /// Hostiles damage the player on contact
    #[must_use]
    pub fn hostile(&self) -> bool {
        !matches!(self, Self::Villager { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostility() {
        let villager = AgentKind::Villager {
            wander: WanderParams::default(),
        };
        assert!(!villager.hostile());
        assert!(AgentKind::Stalker.hostile());
    }

    #[test]
    fn test_hysteresis_defaults_are_separated() {
        let p = PursuitParams::default();
        assert!(p.enter_tiles < p.exit_tiles);
    }
}
