//! The agent struct shared by all non-player actors

use glam::IVec2;

use crate::agent::{AgentKind, Direction, ProjectileSpec, PursuitParams, ShotParams, WanderParams};
use crate::collision::{Mover, Rect};

/// Frames the dying flicker runs before an agent is removed from its slot
pub const DYING_FRAMES: u32 = 30;
/// Frames of invincibility after an agent takes a hit
pub const AGENT_HURT_FRAMES: u32 = 40;

/// A live non-player actor in a registry slot: a villager or a hostile.
/// The world owns every agent; behavior mutates one agent at a time.
#[derive(Debug, Clone)]
pub struct Agent {
    pub name: String,
    pub kind: AgentKind,
    /// World position in pixels
    pub pos: IVec2,
    /// Collision box relative to `pos`
    pub solid: Rect,
    pub dir: Direction,
    /// Pixels per frame
    pub speed: i32,
    pub max_life: i32,
    pub life: i32,
    /// Terminal state: flickers out for [`DYING_FRAMES`], then the slot is
    /// reaped and the drop placed
    pub dying: bool,
    pub dying_counter: u32,
    pub invincible: bool,
    pub invincible_counter: u32,
    /// Wander-or-pursue flag, driven by the distance hysteresis (or forced
    /// on by a damage reaction)
    pub pursuing: bool,
    /// Frames spent locked into the current wander direction
    pub wander_lock: u32,
    /// Frames since the last shot, capped at the kind's cooldown
    pub shot_cooldown: u32,
    /// Set by the probes each frame; a set flag cancels the move
    pub collision_on: bool,
}

impl Agent {
    /// Create an agent from scratch
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: AgentKind,
        pos: IVec2,
        solid: Rect,
        speed: i32,
        max_life: i32,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            pos,
            solid,
            dir: Direction::Down,
            speed,
            max_life,
            life: max_life,
            dying: false,
            dying_counter: 0,
            invincible: false,
            invincible_counter: 0,
            pursuing: false,
            wander_lock: 0,
            shot_cooldown: 0,
            collision_on: false,
        }
    }

    /// A wandering villager covering most of a tile
    #[must_use]
    pub fn villager(pos: IVec2, wander: WanderParams, tile_size: i32) -> Self {
        Self::new(
            "villager",
            AgentKind::Villager { wander },
            pos,
            Rect::new(8, 16, tile_size - 16, tile_size - 16),
            1,
            4,
        )
    }

    /// The relentless melee pursuer
    #[must_use]
    pub fn stalker(pos: IVec2) -> Self {
        Self::new(
            "stalker",
            AgentKind::Stalker,
            pos,
            Rect::new(16, 32, 24, 24),
            5,
            5,
        )
    }

    /// A ranged hostile with the given projectile template
    #[must_use]
    pub fn ranged(
        name: impl Into<String>,
        pos: IVec2,
        wander: WanderParams,
        pursuit: PursuitParams,
        shot: ShotParams,
        projectile: ProjectileSpec,
        max_life: i32,
    ) -> Self {
        Self::new(
            name,
            AgentKind::Ranged {
                wander,
                pursuit,
                shot,
                projectile,
            },
            pos,
            Rect::new(8, 10, 80, 86),
            5,
            max_life,
        )
    }

    /// The agent's box in world coordinates
    #[must_use]
    pub fn world_box(&self) -> Rect {
        self.solid.translated(self.pos)
    }

    /// Movement candidate for this frame's facing and speed
    #[must_use]
    pub fn mover(&self) -> Mover {
        Mover {
            pos: self.pos,
            solid: self.solid,
            dir: self.dir,
            speed: self.speed,
        }
    }

    /// The cell the agent's box currently occupies
    #[must_use]
    pub fn cell(&self, tile_size: i32) -> IVec2 {
        IVec2::new(
            (self.pos.x + self.solid.x) / tile_size,
            (self.pos.y + self.solid.y) / tile_size,
        )
    }

    /// Apply damage and run the damage reaction: the agent snaps into
    /// pursuit, resets its wander timer, and turns to face the attacker by
    /// taking the opposite of the player's facing. Life clamps at zero and
    /// starts the dying sequence.
    pub fn take_hit(&mut self, amount: i32, player_dir: Direction) {
        if self.invincible {
            return;
        }
        self.life = (self.life - amount).max(0);
        self.invincible = true;
        self.invincible_counter = 0;

        self.wander_lock = 0;
        self.dir = player_dir.opposite();
        self.pursuing = true;

        if self.life == 0 {
            self.dying = true;
            self.dying_counter = 0;
        }
    }

    /// Advance the invincibility window by one frame
    pub fn tick(&mut self) {
        if self.invincible {
            self.invincible_counter += 1;
            if self.invincible_counter > AGENT_HURT_FRAMES {
                self.invincible = false;
                self.invincible_counter = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_reaction_faces_attacker() {
        for player_dir in Direction::ALL {
            let mut agent = Agent::stalker(IVec2::ZERO);
            agent.wander_lock = 99;
            agent.take_hit(1, player_dir);
            assert_eq!(agent.dir, player_dir.opposite());
            assert_eq!(agent.wander_lock, 0);
            assert!(agent.pursuing);
            assert_eq!(agent.life, 4);
        }
    }

    #[test]
    fn test_lethal_hit_starts_dying() {
        let mut agent = Agent::stalker(IVec2::ZERO);
        agent.life = 1;
        agent.take_hit(3, Direction::Up);
        assert_eq!(agent.life, 0);
        assert!(agent.dying);
    }

    #[test]
    fn test_invincibility_swallows_hits() {
        let mut agent = Agent::stalker(IVec2::ZERO);
        agent.take_hit(1, Direction::Up);
        agent.take_hit(1, Direction::Up);
        assert_eq!(agent.life, 4);
        for _ in 0..=AGENT_HURT_FRAMES {
            agent.tick();
        }
        agent.take_hit(1, Direction::Up);
        assert_eq!(agent.life, 3);
    }
}
