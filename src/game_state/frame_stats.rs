//! Frame rate tracking.

use log::info;

/// Weight of the newest sample in the moving average.
const FPS_SMOOTHING: f32 = 0.01;

/// Value the average starts from.
const INITIAL_FPS: f32 = 60.0;

/// Exponential moving average of frames per second.
#[derive(Debug, Clone)]
pub struct FrameStats {
    average_fps: f32,
    frames: u64,
    report_every: u64,
}

impl FrameStats {
    /// Creates stats that log the average every `report_every` frames (0 disables logging).
    pub fn new(report_every: u64) -> Self {
        Self {
            average_fps: INITIAL_FPS,
            frames: 0,
            report_every,
        }
    }

    /// Folds in a frame that took `dt` seconds.
    pub fn record(&mut self, dt: f32) {
        if dt <= 0.0 {
            return;
        }
        self.average_fps = FPS_SMOOTHING * (1.0 / dt) + (1.0 - FPS_SMOOTHING) * self.average_fps;
        self.frames += 1;
        if self.report_every > 0 && self.frames % self.report_every == 0 {
            info!("Average FPS: {:.1}", self.average_fps);
        }
    }

    /// Current smoothed frame rate.
    pub fn average_fps(&self) -> f32 {
        self.average_fps
    }

    /// Frames recorded so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_moves_towards_samples() {
        let mut stats = FrameStats::new(0);
        stats.record(1.0 / 120.0);
        assert!((stats.average_fps() - 60.6).abs() < 1e-3);
        for _ in 0..2000 {
            stats.record(1.0 / 120.0);
        }
        assert!((stats.average_fps() - 120.0).abs() < 0.1);
    }

    #[test]
    fn zero_length_frames_are_ignored() {
        let mut stats = FrameStats::new(0);
        stats.record(0.0);
        assert_eq!(stats.frames(), 0);
        assert_eq!(stats.average_fps(), INITIAL_FPS);
    }
}
