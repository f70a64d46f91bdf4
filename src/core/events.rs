//! Event queue for decoupled communication
//!
//! A double-buffered queue that lets gameplay systems announce what happened
//! without knowing who listens. Events pushed during one frame become visible
//! the next, after `swap()`, so processing order never depends on which
//! system ran first.

use std::collections::VecDeque;

use glam::IVec2;

use crate::agent::ProjectileOwner;
use crate::world::ObjectKind;

/// Things that happened in the world during a frame.
///
/// `#[non_exhaustive]` lets new variants land without breaking downstream
/// wildcard matches.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum GameEvent {
    /// The player lost life to contact or a projectile
    PlayerDamaged { amount: i32, remaining: i32 },

    /// An agent lost life
    AgentDamaged { slot: usize, remaining: i32 },

    /// An agent finished its dying sequence and left its slot
    AgentDied { slot: usize, name: String },

    /// A hostile fired its projectile
    ProjectileFired { slot: usize, name: &'static str },

    /// A projectile hit something and expired
    ProjectileExpended { owner: ProjectileOwner },

    /// The player picked up or opened an object
    ObjectTouched { kind: ObjectKind, cell: IVec2 },
}

/// Double-buffered event queue.
///
/// Events pushed during frame N are readable during frame N+1: `swap()` at
/// the frame boundary moves pending events into the processing buffer.
#[derive(Debug)]
pub struct EventQueue {
    /// Events being written this frame
    pending: VecDeque<GameEvent>,
    /// Events from the previous frame, ready for processing
    processing: VecDeque<GameEvent>,
}

impl EventQueue {
    const DEFAULT_CAPACITY: usize = 64;

    /// Create a queue with the default capacity
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a queue sized for a known event volume
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            processing: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an event for processing next frame
    #[inline]
    pub fn push(&mut self, event: GameEvent) {
        self.pending.push_back(event);
    }

    /// Swap the pending and processing buffers. Call once per frame at the
    /// boundary; whatever was still unprocessed is dropped.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.processing);
        self.pending.clear();
    }

    /// Iterate over the previous frame's events
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.processing.iter()
    }

    /// Drain the previous frame's events, taking ownership
    #[inline]
    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.processing.drain(..)
    }

    /// Whether any events are ready for processing
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.processing.is_empty()
    }

    /// Number of events ready for processing
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.processing.len()
    }

    /// Number of events waiting for the next swap
    #[must_use]
    #[inline]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Drop everything, both buffers. Used on map transitions.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.processing.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
