//! # hoop_core - Hand-Tracked Ball Interaction Core
//!
//! This library provides the interaction core of a hand-tracked
//! object-manipulation and scoring mechanic: a ball can be grasped by one or
//! two independently tracked hand poses, thrown with hand-derived velocity,
//! optionally assisted toward a target by a trajectory-bias corrector, and its
//! flight outcome (make/miss) resolved through an ordered sequence of trigger
//! volumes with a timeout.
//!
//! ## Features
//! - Deterministic, single-threaded tick loop (same inputs = same directives)
//! - No engine coupling: consumes hand poses + trigger booleans, produces
//!   attachment directives and velocity vectors
//! - Cooperative, cancellable outcome watch (no threads, no timers)

// Game engine APIs often require many parameters for physics, state, etc.
#![allow(clippy::too_many_arguments)]

pub mod config;
pub mod engine;
pub mod error;

// Re-export the main interaction surface
pub use config::{BiasConfig, GraspConfig, InteractionConfig, OutcomeConfig, PredictorConfig, ThrowConfig};
pub use engine::ball_rig::{BallRig, TickOutput};
pub use engine::bias::BiasCorrector;
pub use engine::grasp::{GraspState, GraspStateMachine, GraspUpdate, ThrowRequest};
pub use engine::outcome::{GoalSequencer, MissReport, OutcomeDetector, SequenceProgress};
pub use engine::trajectory::TrajectoryPredictor;
pub use engine::velocity::VelocityEstimator;
pub use engine::score::{NullDisplay, ScoreDisplay, ScoreState, ScoreTracker};
pub use engine::types::{
    BodyDirective, FrameInput, Hand, HandInput, HandPose, InteractionEvent, ThrowEvent, TriggerId,
};
pub use error::{CoreError, Result};
