//! The player avatar
//!
//! The core only decides whether the player's externally-supplied movement
//! intent commits; everything else about the player (input mapping, attack
//! animation, UI) lives outside.

use glam::IVec2;

use crate::agent::Direction;
use crate::collision::{Mover, Rect};

/// Frames of invincibility after the player takes a hit
pub const PLAYER_HURT_FRAMES: u32 = 40;

/// The player's world state
#[derive(Debug, Clone)]
pub struct Player {
    /// World position in pixels
    pub pos: IVec2,
    /// Collision box relative to `pos`
    pub solid: Rect,
    /// Current facing
    pub dir: Direction,
    /// Movement speed in pixels per frame
    pub speed: i32,
    pub max_life: i32,
    pub life: i32,
    pub invincible: bool,
    pub invincible_counter: u32,
    /// Keys held, spent on doors
    pub keys: u32,
    /// Coins collected
    pub coins: u32,
}

impl Player {
    /// Create a player at a position with the given speed and life
    #[must_use]
    pub fn new(pos: IVec2, speed: i32, max_life: i32) -> Self {
        Self {
            pos,
            solid: Rect::new(16, 32, 24, 24),
            dir: Direction::Down,
            speed,
            max_life,
            life: max_life,
            invincible: false,
            invincible_counter: 0,
            keys: 0,
            coins: 0,
        }
    }

    /// The player's box in world coordinates
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

    /// Apply damage behind the invincibility gate. Life is clamped at zero.
    /// Returns whether the hit landed.
    pub fn take_hit(&mut self, amount: i32) -> bool {
        if self.invincible {
            return false;
        }
        self.life = (self.life - amount).max(0);
        self.invincible = true;
        self.invincible_counter = 0;
        true
    }

    /// Heal without exceeding max life
    pub fn heal(&mut self, amount: i32) {
        self.life = (self.life + amount).min(self.max_life);
    }

    /// Advance the invincibility window by one frame
    pub fn tick(&mut self) {
        if self.invincible {
            self.invincible_counter += 1;
            if self.invincible_counter > PLAYER_HURT_FRAMES {
                self.invincible = false;
                self.invincible_counter = 0;
            }
        }
    }

    /// The cell the player's box currently occupies
    #[must_use]
    pub fn cell(&self, tile_size: i32) -> IVec2 {
        IVec2::new(
            (self.pos.x + self.solid.x) / tile_size,
            (self.pos.y + self.solid.y) / tile_size,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_hit_clamps_and_gates() {
        let mut player = Player::new(IVec2::ZERO, 8, 3);
        assert!(player.take_hit(2));
        assert_eq!(player.life, 1);
        // invincible now, second hit ignored
        assert!(!player.take_hit(2));
        assert_eq!(player.life, 1);
        player.invincible = false;
        assert!(player.take_hit(5));
        assert_eq!(player.life, 0);
    }

    #[test]
    fn test_invincibility_expires() {
        let mut player = Player::new(IVec2::ZERO, 8, 6);
        player.take_hit(1);
        for _ in 0..=PLAYER_HURT_FRAMES {
            player.tick();
        }
        assert!(!player.invincible);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut player = Player::new(IVec2::ZERO, 8, 6);
        player.life = 5;
        player.heal(4);
        assert_eq!(player.life, 6);
    }

    #[test]
    fn test_cell_uses_box_corner() {
        let player = Player::new(IVec2::new(960, 480), 8, 6);
        assert_eq!(player.cell(96), glam::IVec2::new(10, 5));
    }
}
