//! Live projectiles
//!
//! A projectile is an independent agent spawned from a [`ProjectileSpec`],
//! appended to the world's live list. It inherits the owner's position and
//! facing at fire time, moves in a straight line, and expires when its life
//! countdown hits zero or when it lands a hit.

use glam::IVec2;

use crate::agent::{Direction, ProjectileSpec};
use crate::collision::{Mover, Rect};

/// Who fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileOwner {
    Player,
    /// Slot in the hostile registry
    Hostile(usize),
}

/// A projectile in flight
#[derive(Debug, Clone)]
pub struct Projectile {
    pub name: &'static str,
    pub owner: ProjectileOwner,
    pub pos: IVec2,
    pub solid: Rect,
    pub dir: Direction,
    pub speed: i32,
    /// Remaining frames
    pub life: i32,
    pub alive: bool,
}

impl Projectile {
    /// Stamp a live projectile out of a template
    #[must_use]
    pub fn from_spec(
        spec: &ProjectileSpec,
        owner: ProjectileOwner,
        pos: IVec2,
        dir: Direction,
        tile_size: i32,
    ) -> Self {
        Self {
            name: spec.name,
            owner,
            pos,
            solid: Rect::new(0, 0, tile_size, tile_size),
            dir,
            speed: spec.speed,
            life: spec.life_frames,
            alive: true,
        }
    }

    /// The projectile's box in world coordinates
    #[must_use]
    pub fn world_box(&self) -> Rect {
        self.solid.translated(self.pos)
    }

    /// Movement candidate for contact tests
    #[must_use]
    pub fn mover(&self) -> Mover {
        Mover {
            pos: self.pos,
            solid: self.solid,
            dir: self.dir,
            speed: self.speed,
        }
    }

    /// Advance one frame: move along the facing and burn one frame of life
    pub fn fly(&mut self) {
        self.pos += self.dir.delta() * self.speed;
        self.life -= 1;
        if self.life <= 0 {
            self.alive = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snowball() -> ProjectileSpec {
        ProjectileSpec {
            name: "snowball",
            speed: 10,
            life_frames: 3,
        }
    }

    #[test]
    fn test_flies_along_facing() {
        let spec = snowball();
        let mut p = Projectile::from_spec(
            &spec,
            ProjectileOwner::Hostile(0),
            IVec2::new(100, 100),
            Direction::Left,
            96,
        );
        p.fly();
        assert_eq!(p.pos, IVec2::new(90, 100));
        assert!(p.alive);
    }

    #[test]
    fn test_expires_after_life_frames() {
        let spec = snowball();
        let mut p = Projectile::from_spec(
            &spec,
            ProjectileOwner::Player,
            IVec2::ZERO,
            Direction::Down,
            96,
        );
        for _ in 0..3 {
            p.fly();
        }
        assert!(!p.alive);
    }
}
