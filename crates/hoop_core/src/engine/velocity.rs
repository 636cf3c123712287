//! Per-tick velocity estimation from discrete position samples
//!
//! A rolling single most-recent estimate, not a history buffer: velocity is
//! `(current - previous) / dt`, recomputed every tick while the corresponding
//! grasp mode is active. The estimate is deliberately raw (no smoothing
//! window), trading noise for responsiveness.

use nalgebra::Vector3;

/// Single-sample velocity estimator.
///
/// One instance exists for the single active hand and one for the two-hand
/// midpoint. Estimates are undefined across a grasp-mode switch; callers must
/// `reset()` on every mode change so a stale previous sample is never read.
#[derive(Debug, Clone, Default)]
pub struct VelocityEstimator {
    previous: Option<Vector3<f32>>,
    estimate: Vector3<f32>,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current position and get the refreshed estimate.
    ///
    /// Fails silently to the zero vector when `dt` is zero/negative or no
    /// previous sample exists yet (first tick after attach); never divides
    /// by zero.
    pub fn sample(&mut self, current: Vector3<f32>, dt: f32) -> Vector3<f32> {
        self.estimate = match self.previous {
            Some(previous) if dt > 0.0 => (current - previous) / dt,
            _ => Vector3::zeros(),
        };
        self.previous = Some(current);
        self.estimate
    }

    /// The most recent estimate, zero before the first valid sample pair
    pub fn current(&self) -> Vector3<f32> {
        self.estimate
    }

    /// Discard history; mandatory on every grasp-mode switch
    pub fn reset(&mut self) {
        self.previous = None;
        self.estimate = Vector3::zeros();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_is_zero() {
        let mut est = VelocityEstimator::new();
        assert_eq!(est.sample(Vector3::new(1.0, 2.0, 3.0), 0.02), Vector3::zeros());
    }

    #[test]
    fn test_difference_over_dt() {
        let mut est = VelocityEstimator::new();
        est.sample(Vector3::zeros(), 0.02);
        let v = est.sample(Vector3::new(0.0, 0.0, 0.04), 0.02);
        assert!((v - Vector3::new(0.0, 0.0, 2.0)).norm() < 1.0e-5);
        assert_eq!(est.current(), v);
    }

    #[test]
    fn test_zero_dt_never_divides() {
        let mut est = VelocityEstimator::new();
        est.sample(Vector3::zeros(), 0.02);
        assert_eq!(est.sample(Vector3::new(1.0, 0.0, 0.0), 0.0), Vector3::zeros());
        assert_eq!(est.sample(Vector3::new(2.0, 0.0, 0.0), -0.01), Vector3::zeros());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut est = VelocityEstimator::new();
        est.sample(Vector3::zeros(), 0.02);
        est.sample(Vector3::new(1.0, 0.0, 0.0), 0.02);
        est.reset();
        assert_eq!(est.current(), Vector3::zeros());
        // First sample after reset must not difference against stale state
        assert_eq!(est.sample(Vector3::new(5.0, 0.0, 0.0), 0.02), Vector3::zeros());
    }
}
