use std::time::{Duration, Instant};

use super::tween::Easing;

/// Braille dots walking clockwise around a cell.
const FRAMES: [&str; 8] = ["⠁", "⠈", "⠐", "⠠", "⢀", "⡀", "⠄", "⠂"];

/// Looping rotation shown while a request is in flight.
///
/// The spinner holds only its start instant. Stopping it drops that instant,
/// so there is nothing left running once the busy state clears.
#[derive(Debug, Clone)]
pub struct Spinner {
    period: Duration,
    easing: Easing,
    started_at: Option<Instant>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl Spinner {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            easing: Easing::Linear,
            started_at: None,
        }
    }

    /// Start rotating from 0°. Calling this while already running keeps the
    /// current phase.
    pub fn start(&mut self, now: Instant) {
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
    }

    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Rotation in degrees, `[0, 360)`. Zero when stopped.
    pub fn angle_at(&self, now: Instant) -> f64 {
        let Some(started_at) = self.started_at else {
            return 0.0;
        };
        if self.period.is_zero() {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(started_at).as_secs_f64();
        let period = self.period.as_secs_f64();
        let phase = (elapsed % period) / period;
        self.easing.apply(phase) * 360.0
    }

    /// Glyph for the current angle, or `None` when stopped.
    pub fn frame_at(&self, now: Instant) -> Option<&'static str> {
        if !self.is_running() {
            return None;
        }
        let slot = (self.angle_at(now) / 360.0 * FRAMES.len() as f64) as usize;
        Some(FRAMES[slot.min(FRAMES.len() - 1)])
    }
}
