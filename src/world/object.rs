//! Interactive map objects
//!
//! Objects sit in per-map registry slots and are found by the dynamic-object
//! probe. The world decides what a touch means (pickup, unlock, win).

use glam::IVec2;

use crate::collision::Rect;

/// What an object on the floor is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Opens one door
    Key,
    /// Blocks movement until unlocked with a key
    Door,
    /// Heals the player on pickup
    Heart,
    /// Adds to the player's coin count
    Money,
    /// Ends the run when touched
    Chest,
}

impl ObjectKind {
    /// Whether this kind of object blocks movement by default
    #[must_use]
    pub const fn blocking(self) -> bool {
        matches!(self, Self::Door | Self::Chest)
    }
}

/// A pickup or interactive object occupying a registry slot
#[derive(Debug, Clone)]
pub struct GameObject {
    pub kind: ObjectKind,
    /// World position in pixels
    pub pos: IVec2,
    /// Box relative to `pos`
    pub solid: Rect,
    /// Whether the box blocks movement
    pub blocking: bool,
}

impl GameObject {
    /// Create an object of the given kind covering one full tile
    #[must_use]
    pub fn new(kind: ObjectKind, pos: IVec2, tile_size: i32) -> Self {
        Self {
            kind,
            pos,
            solid: Rect::new(0, 0, tile_size, tile_size),
            blocking: kind.blocking(),
        }
    }

    /// The object's box in world coordinates
    #[must_use]
    pub fn world_box(&self) -> Rect {
        self.solid.translated(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_door_blocks_heart_does_not() {
        let door = GameObject::new(ObjectKind::Door, IVec2::ZERO, 96);
        let heart = GameObject::new(ObjectKind::Heart, IVec2::ZERO, 96);
        assert!(door.blocking);
        assert!(!heart.blocking);
    }

    #[test]
    fn test_world_box_follows_position() {
        let obj = GameObject::new(ObjectKind::Key, IVec2::new(96, 192), 96);
        assert_eq!(obj.world_box(), Rect::new(96, 192, 96, 96));
    }
}
