//! Simulation tuning loaded from RON
//!
//! Every gameplay constant that a designer might reasonably want to turn
//! lives here, with defaults matching the shipped balance. A missing file is
//! an error; a missing field falls back to its default via serde.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::{PursuitParams, ShotParams, WanderParams};

/// Errors from loading a tuning file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Reading the file failed
    Io(String),
    /// The RON text did not parse into a [`Tuning`]
    Parse(String),
    /// A value parsed but cannot work (e.g. inverted hysteresis thresholds)
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "failed to read tuning file: {msg}"),
            Self::Parse(msg) => write!(f, "failed to parse tuning file: {msg}"),
            Self::Invalid(msg) => write!(f, "invalid tuning: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Gameplay tuning knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// World tile edge in pixels
    pub tile_size: i32,
    /// Player pixels per frame
    pub player_speed: i32,
    pub player_max_life: i32,
    /// Life the player loses to hostile contact
    pub contact_damage: i32,
    /// Frames a wanderer holds one direction
    pub wander_lock_frames: u32,
    /// Pursue below this tile distance
    pub pursuit_enter_tiles: i32,
    /// Give up above this tile distance
    pub pursuit_exit_tiles: i32,
    /// Frames between ranged shots
    pub shot_cooldown_frames: u32,
    /// Chance (0-100) a ready hostile fires on a given frame
    pub fire_chance_pct: u32,
    /// Projectile pixels per frame
    pub projectile_speed: i32,
    /// Frames before a projectile expires
    pub projectile_life_frames: i32,
    /// Life a projectile takes from its target
    pub projectile_damage: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            tile_size: 96,
            player_speed: 8,
            player_max_life: 6,
            contact_damage: 2,
            wander_lock_frames: 180,
            pursuit_enter_tiles: 8,
            pursuit_exit_tiles: 20,
            shot_cooldown_frames: 30,
            fire_chance_pct: 81,
            projectile_speed: 10,
            projectile_life_frames: 80,
            projectile_damage: 1,
        }
    }
}

impl Tuning {
    /// Load tuning from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_ron(&text)
    }

    /// Parse tuning from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        let tuning: Self = ron::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size <= 0 {
            return Err(ConfigError::Invalid(format!(
                "tile_size must be positive, got {}",
                self.tile_size
            )));
        }
        if self.pursuit_enter_tiles >= self.pursuit_exit_tiles {
            return Err(ConfigError::Invalid(format!(
                "pursuit_enter_tiles ({}) must be below pursuit_exit_tiles ({})",
                self.pursuit_enter_tiles, self.pursuit_exit_tiles
            )));
        }
        if self.fire_chance_pct > 100 {
            return Err(ConfigError::Invalid(format!(
                "fire_chance_pct must be 0-100, got {}",
                self.fire_chance_pct
            )));
        }
        Ok(())
    }

    /// Wander parameters from these knobs
    #[must_use]
    pub fn wander(&self) -> WanderParams {
        WanderParams {
            lock_frames: self.wander_lock_frames,
        }
    }

    /// Pursuit hysteresis from these knobs
    #[must_use]
    pub fn pursuit(&self) -> PursuitParams {
        PursuitParams {
            enter_tiles: self.pursuit_enter_tiles,
            exit_tiles: self.pursuit_exit_tiles,
        }
    }

    /// Shot gating from these knobs
    #[must_use]
    pub fn shot(&self) -> ShotParams {
        ShotParams {
            cooldown_frames: self.shot_cooldown_frames,
            fire_chance_pct: self.fire_chance_pct,
        }
    }
}
