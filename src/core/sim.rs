//! Headless simulation driver
//!
//! Runs a [`World`] for a fixed number of frames, feeding it scripted or
//! computed player input and keeping frame statistics. There is no clock:
//! one `update` is one frame, and the driver runs as fast as it can.

use std::time::Instant;

use crate::core::{FrameStats, GameEvent};
use crate::world::{PlayerInput, World};

/// Simulation run configuration
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Frames to simulate
    pub frames: u64,
    /// Log a stats line every this many frames (0 to disable)
    pub report_every: u64,
    /// Stop early once the player's life hits zero
    pub stop_on_death: bool,
    /// Stop early once the run is won
    pub stop_on_win: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frames: 3600,
            report_every: 600,
            stop_on_death: true,
            stop_on_win: true,
        }
    }
}

impl SimConfig {
    /// Set the frame count
    #[must_use]
    pub fn with_frames(mut self, frames: u64) -> Self {
        self.frames = frames;
        self
    }

    /// Set the reporting interval
    #[must_use]
    pub fn with_report_every(mut self, interval: u64) -> Self {
        self.report_every = interval;
        self
    }

    /// Keep running after the player dies
    #[must_use]
    pub fn with_stop_on_death(mut self, stop: bool) -> Self {
        self.stop_on_death = stop;
        self
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every configured frame was simulated
    Completed,
    /// The player's life reached zero
    PlayerDied,
    /// The player reached the chest
    Won,
}

/// The driver: a world plus run bookkeeping
pub struct Sim {
    pub world: World,
    config: SimConfig,
    stats: FrameStats,
}

impl Sim {
    #[must_use]
    pub fn new(world: World, config: SimConfig) -> Self {
        Self {
            world,
            config,
            stats: FrameStats::new(),
        }
    }

    /// Run the world to completion. `input` is called once per frame with
    /// the world as it stands and produces that frame's player input.
    pub fn run(&mut self, mut input: impl FnMut(&World) -> PlayerInput) -> RunOutcome {
        let mut searches_seen = self.world.pathfinder().searches();
        let mut failures_seen = self.world.pathfinder().failed_searches();

        for _ in 0..self.config.frames {
            let frame_input = input(&self.world);

            let started = Instant::now();
            self.world.update(frame_input);
            self.stats.record_frame(started.elapsed());

            let searches = self.world.pathfinder().searches();
            let failures = self.world.pathfinder().failed_searches();
            for _ in failures_seen..failures {
                self.stats.record_search(false);
            }
            for _ in 0..(searches - searches_seen) - (failures - failures_seen) {
                self.stats.record_search(true);
            }
            searches_seen = searches;
            failures_seen = failures;

            for event in self.world.events.iter() {
                if matches!(event, GameEvent::ProjectileFired { .. }) {
                    self.stats.record_shot();
                }
                log::debug!("frame {}: {event:?}", self.world.frame());
            }

            if self.config.report_every > 0
                && self.world.frame() % self.config.report_every == 0
            {
                log::info!("{}", self.stats.format_stats());
            }

            if self.config.stop_on_win && self.world.won {
                return RunOutcome::Won;
            }
            if self.config.stop_on_death && self.world.player.life <= 0 {
                return RunOutcome::PlayerDied;
            }
        }
        RunOutcome::Completed
    }

    /// Statistics gathered so far
    #[must_use]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::Agent;
    use crate::core::Tuning;
    use crate::world::TileMap;
    use glam::IVec2;

    const TILE: i32 = 96;

    fn idle_world() -> World {
        World::new(
            TileMap::new(30, 10),
            Tuning::default(),
            IVec2::new(2 * TILE, 2 * TILE),
            3,
        )
    }

    #[test]
    fn test_runs_configured_frame_count() {
        let mut sim = Sim::new(idle_world(), SimConfig::default().with_frames(10));
        let outcome = sim.run(|_| PlayerInput::default());
        assert_eq!(outcome, RunOutcome::Completed);
        assert_eq!(sim.world.frame(), 10);
        assert_eq!(sim.stats().total_frames(), 10);
    }

    #[test]
    fn test_pursuers_show_up_in_search_stats() {
        let mut world = idle_world();
        world
            .spawn_hostile(0, Agent::stalker(IVec2::new(8 * TILE, 5 * TILE)))
            .unwrap();
        let mut sim = Sim::new(world, SimConfig::default().with_frames(5));
        sim.run(|_| PlayerInput::default());
        // A stalker re-queries every frame
        assert_eq!(sim.stats().path_searches(), 5);
    }

    #[test]
    fn test_stops_when_player_dies() {
        let mut world = idle_world();
        world.player.life = 0;
        let mut sim = Sim::new(world, SimConfig::default().with_frames(100));
        let outcome = sim.run(|_| PlayerInput::default());
        assert_eq!(outcome, RunOutcome::PlayerDied);
        assert!(sim.world.frame() < 100);
    }
}
