//! Frame timing and simulation statistics

use std::collections::VecDeque;
use std::time::Duration;

/// Rolling frame statistics.
///
/// Tracks update times over a sliding window alongside simulation counters
/// that matter here: path searches issued (pursuers re-search every frame,
/// so this is the first number to look at when a frame runs long) and
/// projectiles fired.
#[derive(Debug)]
pub struct FrameStats {
    /// Update time history for averaging
    frame_times: VecDeque<Duration>,
    /// Maximum samples to keep
    max_samples: usize,
    /// Updates per second over the window
    fps: f32,
    /// Average update time in milliseconds
    avg_frame_time_ms: f32,
    /// Minimum update time in milliseconds over the window
    min_frame_time_ms: f32,
    /// Maximum update time in milliseconds over the window
    max_frame_time_ms: f32,
    /// Total frames simulated
    total_frames: u64,
    /// Path searches issued over the whole run
    path_searches: u64,
    /// Path searches that failed to reach their goal
    failed_searches: u64,
    /// Projectiles fired over the whole run
    shots_fired: u64,
}

impl FrameStats {
    /// Create a tracker with a 120-sample window
    #[must_use]
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(120),
            max_samples: 120,
            fps: 0.0,
            avg_frame_time_ms: 0.0,
            min_frame_time_ms: 0.0,
            max_frame_time_ms: 0.0,
            total_frames: 0,
            path_searches: 0,
            failed_searches: 0,
            shots_fired: 0,
        }
    }

    /// Record one simulated frame and its update time
    pub fn record_frame(&mut self, delta: Duration) {
        self.total_frames += 1;

        if self.frame_times.len() >= self.max_samples {
            self.frame_times.pop_front();
        }
        self.frame_times.push_back(delta);

        self.update_window();
    }

    /// Count one path query; `reached` is whether it produced a path
    pub fn record_search(&mut self, reached: bool) {
        self.path_searches += 1;
        if !reached {
            self.failed_searches += 1;
        }
    }

    /// Count one projectile launch
    pub fn record_shot(&mut self) {
        self.shots_fired += 1;
    }

    fn update_window(&mut self) {
        if self.frame_times.is_empty() {
            return;
        }

        let mut total = Duration::ZERO;
        let mut min = Duration::MAX;
        let mut max = Duration::ZERO;
        for &dt in &self.frame_times {
            total += dt;
            min = min.min(dt);
            max = max.max(dt);
        }

        let count = self.frame_times.len() as f32;
        let total_secs = total.as_secs_f32();
        self.avg_frame_time_ms = total_secs / count * 1000.0;
        self.fps = if total_secs > 0.0 {
            count / total_secs
        } else {
            0.0
        };
        self.min_frame_time_ms = min.as_secs_f32() * 1000.0;
        self.max_frame_time_ms = max.as_secs_f32() * 1000.0;
    }

    #[must_use]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[must_use]
    pub fn avg_frame_time_ms(&self) -> f32 {
        self.avg_frame_time_ms
    }

    #[must_use]
    pub fn min_frame_time_ms(&self) -> f32 {
        self.min_frame_time_ms
    }

    #[must_use]
    pub fn max_frame_time_ms(&self) -> f32 {
        self.max_frame_time_ms
    }

    #[must_use]
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    #[must_use]
    pub fn path_searches(&self) -> u64 {
        self.path_searches
    }

    #[must_use]
    pub fn failed_searches(&self) -> u64 {
        self.failed_searches
    }

    #[must_use]
    pub fn shots_fired(&self) -> u64 {
        self.shots_fired
    }

    /// One-line summary for logging
    #[must_use]
    pub fn format_stats(&self) -> String {
        format!(
            "frames: {} | update: {:.3}ms avg ({:.3} min, {:.3} max) | searches: {} ({} failed) | shots: {}",
            self.total_frames,
            self.avg_frame_time_ms,
            self.min_frame_time_ms,
            self.max_frame_time_ms,
            self.path_searches,
            self.failed_searches,
            self.shots_fired
        )
    }
}

impl Default for FrameStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_frame_tracks_window() {
        let mut stats = FrameStats::new();
        stats.record_frame(Duration::from_millis(2));
        stats.record_frame(Duration::from_millis(4));
        assert_eq!(stats.total_frames(), 2);
        assert!((stats.avg_frame_time_ms() - 3.0).abs() < 0.1);
        assert!((stats.max_frame_time_ms() - 4.0).abs() < 0.1);
    }

    #[test]
    fn test_window_is_bounded() {
        let mut stats = FrameStats::new();
        for _ in 0..500 {
            stats.record_frame(Duration::from_millis(1));
        }
        assert_eq!(stats.total_frames(), 500);
        assert!(stats.frame_times.len() <= 120);
    }

    #[test]
    fn test_search_counters() {
        let mut stats = FrameStats::new();
        stats.record_search(true);
        stats.record_search(false);
        stats.record_search(true);
        assert_eq!(stats.path_searches(), 3);
        assert_eq!(stats.failed_searches(), 1);
    }
}
