//! Interaction tuning configuration
//!
//! All named tunables of the interaction core live here. Instead of hardcoded
//! magic numbers, values can be configured via presets, a YAML file, or an
//! environment variable.
//!
//! ## Usage
//!
//! ```rust
//! use hoop_core::InteractionConfig;
//!
//! // Default tunables
//! let config = InteractionConfig::default();
//!
//! // Assist disabled (competitive preset)
//! let raw = InteractionConfig::unassisted();
//!
//! // From environment variable
//! let from_env = InteractionConfig::from_env_or_default();
//! ```
//!
//! ## Environment Variables
//!
//! - `HOOP_ASSIST_PROFILE`: Select preset (assisted, unassisted, default)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Top-level interaction configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Grasp entry/continuation thresholds
    pub grasp: GraspConfig,
    /// Throw production tunables
    pub throw: ThrowConfig,
    /// Trajectory-bias assist tunables
    pub bias: BiasConfig,
    /// Ballistic landing prediction tunables
    pub predictor: PredictorConfig,
    /// Make/miss resolution tunables
    pub outcome: OutcomeConfig,
}

/// Grasp entry/continuation thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraspConfig {
    /// Max hand separation for two-hand entry and continuation (meters)
    pub two_hand_attach_distance_m: f32,
    /// Max tick-time gap between the two hands' trigger edges to count as
    /// simultaneous (seconds)
    pub coordination_window_s: f32,
    /// Minimum idle time after a release before re-grasp is allowed
    /// (seconds, zero disables the gate)
    pub release_grace_period_s: f32,
}

impl Default for GraspConfig {
    fn default() -> Self {
        Self {
            two_hand_attach_distance_m: 1.0,
            coordination_window_s: 0.15,
            release_grace_period_s: 0.0,
        }
    }
}

/// Throw production tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThrowConfig {
    /// Scales hand velocity into throw velocity
    pub force_multiplier: f32,
    /// Hand-velocity magnitude that triggers a throw while still held (m/s)
    pub release_force_threshold: f32,
    /// Magnitude of the random spin applied on release (rad/s)
    pub spin_magnitude: f32,
}

impl Default for ThrowConfig {
    fn default() -> Self {
        Self {
            force_multiplier: 2.5,
            release_force_threshold: 10.0,
            spin_magnitude: 2.0,
        }
    }
}

/// Trajectory-bias assist tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BiasConfig {
    /// Master switch; bias never touches velocity when disabled
    pub enabled: bool,
    /// Horizontal radius around the target within which a predicted landing
    /// engages the at-release correction (meters)
    pub tolerance_m: f32,
    /// Blend factor toward the arc waypoint, in [0, 1]
    pub correction_strength: f32,
    /// In-flight steering only engages under this distance to target (meters)
    pub activation_distance_m: f32,
    /// In-flight steering only engages under this angle between velocity and
    /// the to-target vector (degrees)
    pub angle_tolerance_deg: f32,
    /// Fraction of the release-to-target segment where the arc waypoint sits
    pub waypoint_progress: f32,
    /// Upward offset of the arc waypoint (meters)
    pub waypoint_lift_m: f32,
}

impl Default for BiasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tolerance_m: 0.5,
            correction_strength: 0.2,
            activation_distance_m: 5.0,
            angle_tolerance_deg: 45.0,
            waypoint_progress: 0.8,
            waypoint_lift_m: 2.0,
        }
    }
}

/// Ballistic landing prediction tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Fixed integration step (seconds)
    pub time_step_s: f32,
    /// Downward acceleration magnitude (m/s^2)
    pub gravity: f32,
    /// Upper bound on simulated flight time (seconds)
    pub max_simulation_time_s: f32,
    /// Ground/rim reference height that terminates the simulation (meters)
    pub landing_height_m: f32,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            time_step_s: 0.02,
            gravity: 9.81,
            max_simulation_time_s: 5.0,
            landing_height_m: 0.5,
        }
    }
}

/// Make/miss resolution tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeConfig {
    /// Miss-detection timeout after a throw (seconds)
    pub wait_time_s: f32,
}

impl Default for OutcomeConfig {
    fn default() -> Self {
        Self { wait_time_s: 2.5 }
    }
}

impl InteractionConfig {
    /// Assisted preset - bias on, generous engagement gates
    pub fn assisted() -> Self {
        Self {
            bias: BiasConfig {
                enabled: true,
                tolerance_m: 0.75,
                correction_strength: 0.3,
                ..BiasConfig::default()
            },
            ..Self::default()
        }
    }

    /// Unassisted preset - raw throws, no correction of any kind
    pub fn unassisted() -> Self {
        Self {
            bias: BiasConfig {
                enabled: false,
                ..BiasConfig::default()
            },
            ..Self::default()
        }
    }

    /// Select a preset from `HOOP_ASSIST_PROFILE`, falling back to defaults
    pub fn from_env_or_default() -> Self {
        match env::var("HOOP_ASSIST_PROFILE").as_deref() {
            Ok("assisted") => Self::assisted(),
            Ok("unassisted") => Self::unassisted(),
            _ => Self::default(),
        }
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the interaction loop's invariants
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.bias.correction_strength) {
            return Err(CoreError::InvalidParameter(format!(
                "bias.correction_strength must be in [0, 1], got {}",
                self.bias.correction_strength
            )));
        }
        if !(0.0..=1.0).contains(&self.bias.waypoint_progress) {
            return Err(CoreError::InvalidParameter(format!(
                "bias.waypoint_progress must be in [0, 1], got {}",
                self.bias.waypoint_progress
            )));
        }
        if self.predictor.time_step_s <= 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "predictor.time_step_s must be positive, got {}",
                self.predictor.time_step_s
            )));
        }
        if self.grasp.two_hand_attach_distance_m <= 0.0 {
            return Err(CoreError::InvalidParameter(format!(
                "grasp.two_hand_attach_distance_m must be positive, got {}",
                self.grasp.two_hand_attach_distance_m
            )));
        }
        if self.grasp.coordination_window_s < 0.0
            || self.grasp.release_grace_period_s < 0.0
            || self.outcome.wait_time_s < 0.0
        {
            return Err(CoreError::InvalidParameter(
                "time windows must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_tuned_values() {
        let config = InteractionConfig::default();
        assert_eq!(config.throw.force_multiplier, 2.5);
        assert_eq!(config.grasp.two_hand_attach_distance_m, 1.0);
        assert_eq!(config.outcome.wait_time_s, 2.5);
        assert!(config.bias.enabled);
        assert_eq!(config.bias.tolerance_m, 0.5);
        assert_eq!(config.predictor.time_step_s, 0.02);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unassisted_preset_disables_bias() {
        let config = InteractionConfig::unassisted();
        assert!(!config.bias.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_strength() {
        let mut config = InteractionConfig::default();
        config.bias.correction_strength = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_time_step() {
        let mut config = InteractionConfig::default();
        config.predictor.time_step_s = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "grasp:\n  two_hand_attach_distance_m: 0.8\n  coordination_window_s: 0.2\n  release_grace_period_s: 0.5\nthrow:\n  force_multiplier: 3.0\n  release_force_threshold: 12.0\n  spin_magnitude: 2.0\nbias:\n  enabled: false\n  tolerance_m: 0.5\n  correction_strength: 0.2\n  activation_distance_m: 5.0\n  angle_tolerance_deg: 45.0\n  waypoint_progress: 0.8\n  waypoint_lift_m: 2.0\npredictor:\n  time_step_s: 0.02\n  gravity: 9.81\n  max_simulation_time_s: 5.0\n  landing_height_m: 0.5\noutcome:\n  wait_time_s: 2.0"
        )
        .unwrap();

        let config = InteractionConfig::load(file.path()).unwrap();
        assert_eq!(config.throw.force_multiplier, 3.0);
        assert_eq!(config.grasp.release_grace_period_s, 0.5);
        assert!(!config.bias.enabled);
        assert_eq!(config.outcome.wait_time_s, 2.0);
    }
}
