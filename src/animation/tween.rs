use std::time::{Duration, Instant};

/// Easing curve applied to a tween's linear progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Smoothstep: 3t^2 - 2t^3
    EaseInOut,
    /// Quadratic deceleration.
    EaseOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => t * t * (3.0 - 2.0 * t),
            Easing::EaseOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// A one-shot interpolation between two values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: f64,
    pub to: f64,
    pub duration: Duration,
    pub easing: Easing,
}

impl Tween {
    pub const fn new(from: f64, to: f64, duration: Duration, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration,
            easing,
        }
    }

    /// Linear progress in `[0, 1]` after `elapsed`.
    pub fn progress(&self, elapsed: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Eased value after `elapsed`.
    pub fn value(&self, elapsed: Duration) -> f64 {
        let eased = self.easing.apply(self.progress(elapsed));
        self.from + (self.to - self.from) * eased
    }

    /// Value for a tween started at `started_at`, sampled at `now`.
    pub fn sample(&self, started_at: Instant, now: Instant) -> f64 {
        self.value(now.saturating_duration_since(started_at))
    }

    pub fn is_complete(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_easing_endpoints() {
        for easing in [Easing::Linear, Easing::EaseInOut, Easing::EaseOut] {
            assert!((easing.apply(0.0)).abs() < EPS, "{easing:?} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_easing_clamps_out_of_range() {
        assert!((Easing::EaseInOut.apply(-2.0)).abs() < EPS);
        assert!((Easing::EaseInOut.apply(3.0) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ease_in_out_is_symmetric_at_midpoint() {
        assert!((Easing::EaseInOut.apply(0.5) - 0.5).abs() < EPS);
        assert!(Easing::EaseInOut.apply(0.25) < 0.25);
        assert!(Easing::EaseInOut.apply(0.75) > 0.75);
    }

    #[test]
    fn test_ease_out_leads_linear() {
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
    }

    #[test]
    fn test_tween_interpolates_and_holds() {
        let tween = Tween::new(100.0, 0.0, Duration::from_secs(2), Easing::Linear);
        assert!((tween.value(Duration::ZERO) - 100.0).abs() < EPS);
        assert!((tween.value(Duration::from_secs(1)) - 50.0).abs() < EPS);
        assert!((tween.value(Duration::from_secs(2))).abs() < EPS);
        assert!((tween.value(Duration::from_secs(60))).abs() < EPS);
        assert!(tween.is_complete(Duration::from_secs(2)));
        assert!(!tween.is_complete(Duration::from_millis(1999)));
    }

    #[test]
    fn test_zero_duration_jumps_to_end() {
        let tween = Tween::new(0.0, 1.0, Duration::ZERO, Easing::EaseInOut);
        assert!((tween.value(Duration::ZERO) - 1.0).abs() < EPS);
    }

    #[test]
    fn test_sample_before_start_is_initial() {
        let now = Instant::now();
        let later = now + Duration::from_secs(1);
        let tween = Tween::new(0.0, 1.0, Duration::from_secs(1), Easing::Linear);
        assert!((tween.sample(later, now)).abs() < EPS);
    }
}
