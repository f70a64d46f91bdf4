//! Speculative collision probes
//!
//! Each probe offsets a mover's box one step along its facing and tests the
//! result against one obstacle class: the static tile grid, the dynamic
//! object registry, other agents, or the player. Probes are pure: they take
//! positions and boxes by value or by shared reference and never mutate
//! either participant. The caller owns the decision to commit or cancel the
//! move, usually through the agent's `collision_on` flag.

use glam::IVec2;

use crate::agent::{Agent, Direction};
use crate::collision::Rect;
use crate::world::{GameObject, Player, TileMap};

/// A movement candidate: where a body stands, its box, and the step it
/// wants to take this frame.
#[derive(Debug, Clone, Copy)]
pub struct Mover {
    pub pos: IVec2,
    pub solid: Rect,
    pub dir: Direction,
    pub speed: i32,
}

impl Mover {
    /// World-space box where the body currently stands
    #[must_use]
    pub fn world_box(&self) -> Rect {
        self.solid.translated(self.pos)
    }

    /// World-space box after stepping `speed` pixels along `dir`
    #[must_use]
    pub fn stepped_box(&self) -> Rect {
        self.solid.translated(self.pos + self.dir.delta() * self.speed)
    }
}

/// Test the mover's next step against the static tile grid.
///
/// Samples the two cells the box's leading edge would occupy after the step
/// (the leading corners for the direction of travel). A step whose leading
/// edge would leave the world entirely counts as a collision rather than
/// wrapping or indexing out of range.
#[must_use]
pub fn probe_tiles(map: &TileMap, tile_size: i32, mover: &Mover) -> bool {
    let world_box = mover.world_box();
    let left_col = world_box.left() / tile_size;
    let right_col = world_box.right() / tile_size;
    let top_row = world_box.top() / tile_size;
    let bottom_row = world_box.bottom() / tile_size;

    let world_w = map.cols() as i32 * tile_size;
    let world_h = map.rows() as i32 * tile_size;

    let (cell_a, cell_b) = match mover.dir {
        Direction::Up => {
            let edge = world_box.top() - mover.speed;
            if edge < 0 {
                return true;
            }
            let row = edge / tile_size;
            ((left_col, row), (right_col, row))
        }
        Direction::Down => {
            let edge = world_box.bottom() + mover.speed;
            if edge >= world_h {
                return true;
            }
            let row = edge / tile_size;
            ((left_col, row), (right_col, row))
        }
        Direction::Left => {
            let edge = world_box.left() - mover.speed;
            if edge < 0 {
                return true;
            }
            let col = edge / tile_size;
            ((col, top_row), (col, bottom_row))
        }
        Direction::Right => {
            let edge = world_box.right() + mover.speed;
            if edge >= world_w {
                return true;
            }
            let col = edge / tile_size;
            ((col, top_row), (col, bottom_row))
        }
    };

    cell_blocked(map, cell_a) || cell_blocked(map, cell_b)
}

fn cell_blocked(map: &TileMap, (col, row): (i32, i32)) -> bool {
    if col < 0 || row < 0 {
        return true;
    }
    // TileMap reads out-of-range cells as blocked, covering the high side
    map.is_blocked(col as usize, row as usize)
}

/// Outcome of the dynamic-object probe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectHit {
    /// First registry slot whose box the stepped box overlaps, for the
    /// caller to act on (pickup, unlock)
    pub index: Option<usize>,
    /// Whether any overlapped object blocks movement, independent of
    /// whether the caller wants the interaction index
    pub blocking: bool,
}

/// Test the mover's next step against every populated object slot
#[must_use]
pub fn probe_objects(objects: &[Option<GameObject>], mover: &Mover) -> ObjectHit {
    let stepped = mover.stepped_box();
    let mut hit = ObjectHit::default();
    for (i, slot) in objects.iter().enumerate() {
        let Some(obj) = slot else { continue };
        if stepped.intersects(&obj.world_box()) {
            if hit.index.is_none() {
                hit.index = Some(i);
            }
            if obj.blocking {
                hit.blocking = true;
            }
        }
    }
    hit
}

/// Test the mover's next step against a registry of other agents, returning
/// the first overlapped slot. Any match blocks movement.
///
/// A mover must never be probed against its own registry slot; callers
/// vacate the slot (take the agent out) before probing, so the slot reads
/// empty here and self-collision cannot happen.
#[must_use]
pub fn probe_agents(agents: &[Option<Agent>], mover: &Mover) -> Option<usize> {
    let stepped = mover.stepped_box();
    for (i, slot) in agents.iter().enumerate() {
        let Some(agent) = slot else { continue };
        if stepped.intersects(&agent.world_box()) {
            return Some(i);
        }
    }
    None
}

/// Test the mover's next step against the player's box
#[must_use]
pub fn probe_player(player: &Player, mover: &Mover) -> bool {
    mover.stepped_box().intersects(&player.world_box())
}
