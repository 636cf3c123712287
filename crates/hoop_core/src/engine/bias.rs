//! Trajectory-bias assist
//!
//! Two independent, config-gated mechanisms nudge a throw toward the target
//! when the unassisted outcome is already close:
//!
//! - **At-release correction**: when the predicted landing point falls within
//!   a tolerance radius of the target, the release velocity is blended toward
//!   an elevated arc waypoint. Direction changes, speed does not.
//! - **In-flight steering**: while un-held, a small per-tick nudge toward the
//!   same waypoint, gated by distance and approach angle.
//!
//! Both paths go through the waypoint rather than aiming straight at the
//! target, producing an arcing correction. Outside their trigger conditions
//! velocity is left untouched; bias is an assist, never an override.

use nalgebra::Vector3;

use crate::config::BiasConfig;

const EPSILON: f32 = 1.0e-6;

/// Velocity corrector steering throws toward a target region
#[derive(Debug, Clone)]
pub struct BiasCorrector {
    config: BiasConfig,
}

impl BiasCorrector {
    pub fn new(config: BiasConfig) -> Self {
        Self { config }
    }

    pub fn enabled(&self) -> bool {
        self.config.enabled
    }

    /// Elevated arc waypoint between a release point and the target
    pub fn arc_waypoint(&self, from: Vector3<f32>, target: Vector3<f32>) -> Vector3<f32> {
        from.lerp(&target, self.config.waypoint_progress)
            + Vector3::new(0.0, self.config.waypoint_lift_m, 0.0)
    }

    /// Whether a predicted landing point, projected onto the target's height,
    /// lies within the tolerance radius of the target
    pub fn in_tolerance(&self, predicted: Vector3<f32>, target: Vector3<f32>) -> bool {
        let projected = Vector3::new(predicted.x, target.y, predicted.z);
        (projected - target).norm() <= self.config.tolerance_m
    }

    /// Blend a release velocity toward the arc waypoint.
    ///
    /// The blend interpolates direction only: the result keeps the original
    /// speed exactly, so for strength in (0, 1) the direction lies strictly
    /// between the unbiased direction and the waypoint direction. Degenerate
    /// inputs (zero speed, waypoint at the release point) return the velocity
    /// unchanged.
    pub fn correct_release(
        &self,
        velocity: Vector3<f32>,
        release_pos: Vector3<f32>,
        target: Vector3<f32>,
    ) -> Vector3<f32> {
        let speed = velocity.norm();
        if speed <= EPSILON {
            return velocity;
        }

        let waypoint = self.arc_waypoint(release_pos, target);
        let desired_dir = match (waypoint - release_pos).try_normalize(EPSILON) {
            Some(dir) => dir,
            None => return velocity,
        };

        let blended = velocity.lerp(&(desired_dir * speed), self.config.correction_strength);
        match blended.try_normalize(EPSILON) {
            Some(dir) => dir * speed,
            None => velocity,
        }
    }

    /// Per-tick in-flight steering nudge.
    ///
    /// Engages only when the ball is within the activation distance of the
    /// target and its velocity points within the angle tolerance of the
    /// to-target vector. Returns `None` (velocity untouched) otherwise.
    pub fn steer_in_flight(
        &self,
        velocity: Vector3<f32>,
        ball_pos: Vector3<f32>,
        target: Vector3<f32>,
        dt: f32,
    ) -> Option<Vector3<f32>> {
        if !self.config.enabled || dt <= 0.0 {
            return None;
        }

        let to_target = target - ball_pos;
        let distance = to_target.norm();
        if distance >= self.config.activation_distance_m || distance <= EPSILON {
            return None;
        }

        let speed = velocity.norm();
        if speed <= EPSILON {
            return None;
        }

        let cos_angle = (velocity.dot(&to_target) / (speed * distance)).clamp(-1.0, 1.0);
        if cos_angle.acos().to_degrees() >= self.config.angle_tolerance_deg {
            return None;
        }

        let waypoint = self.arc_waypoint(ball_pos, target);
        let desired_dir = (waypoint - ball_pos).try_normalize(EPSILON)?;
        let desired = desired_dir * speed;

        let gain = (dt * self.config.correction_strength).clamp(0.0, 1.0);
        Some(velocity + (desired - velocity) * gain)
    }
}
