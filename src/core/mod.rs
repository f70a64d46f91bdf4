//! Core plumbing: configuration, events, statistics, and the sim driver

pub mod config;
pub mod events;
pub mod sim;
pub mod stats;

pub use config::{ConfigError, Tuning};
pub use events::{EventQueue, GameEvent};
pub use sim::{RunOutcome, Sim, SimConfig};
pub use stats::FrameStats;
