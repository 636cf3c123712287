//! Core value types of the interaction loop
//!
//! Everything the host engine exchanges with the core per tick lives here:
//! hand poses and trigger booleans in, attachment directives and throw
//! velocities out. The core never touches the host's scene graph or physics
//! solver; parenting is modelled as an explicit "follow" relation resolved by
//! the host each tick.

use nalgebra::{UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// One of exactly two tracked hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hand {
    Left,
    Right,
}

impl Hand {
    /// The opposite hand
    pub fn other(&self) -> Hand {
        match self {
            Hand::Left => Hand::Right,
            Hand::Right => Hand::Left,
        }
    }
}

/// World-space pose of one tracked hand, updated externally every tick.
/// Read-only to the core.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandPose {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl HandPose {
    pub fn new(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self { position, orientation }
    }

    /// Pose at the given position with identity orientation
    pub fn at(position: Vector3<f32>) -> Self {
        Self {
            position,
            orientation: UnitQuaternion::identity(),
        }
    }

    /// Distance to another hand (meters)
    pub fn distance_to(&self, other: &HandPose) -> f32 {
        (self.position - other.position).norm()
    }

    /// Midpoint position between two hands
    pub fn midpoint_with(&self, other: &HandPose) -> Vector3<f32> {
        (self.position + other.position) * 0.5
    }

    /// Equal-weight spherical interpolation of both orientations.
    /// Falls back to this hand's orientation when the quaternions are
    /// antipodal and no shortest path exists.
    pub fn blended_orientation_with(&self, other: &HandPose) -> UnitQuaternion<f32> {
        self.orientation
            .try_slerp(&other.orientation, 0.5, 1.0e-6)
            .unwrap_or(self.orientation)
    }
}

/// Per-tick input for one hand
#[derive(Debug, Clone, Copy)]
pub struct HandInput {
    pub pose: HandPose,
    pub trigger_pressed: bool,
}

/// Per-tick input bundle: both hands plus the tick duration
#[derive(Debug, Clone, Copy)]
pub struct FrameInput {
    pub left: HandInput,
    pub right: HandInput,
    /// Tick duration in seconds; zero or negative values degrade to zero
    /// velocity estimates rather than faulting
    pub dt: f32,
}

impl FrameInput {
    pub fn hand(&self, hand: Hand) -> &HandInput {
        match hand {
            Hand::Left => &self.left,
            Hand::Right => &self.right,
        }
    }
}

/// Identifier of a trigger volume in the external collision system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

/// A throw, produced exactly once per release-with-sufficient-velocity or
/// release-via-trigger-transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowEvent {
    /// Monotonic throw counter; keys the outcome watch this throw armed
    pub throw_id: u64,
    /// Release position (world space)
    pub position: Vector3<f32>,
    /// Release velocity, post bias correction
    pub velocity: Vector3<f32>,
    /// Spin handed to physics integration on release
    pub angular_velocity: Vector3<f32>,
    /// Interaction-clock time of the release (seconds)
    pub time_s: f32,
}

/// Attachment/physics directives handed to the host engine.
///
/// `Follow` is a weak relation (object follows the named hand); the host
/// resolves it against its own transforms each tick. The core re-teleports the
/// object itself, so a host may also ignore `Follow` and rely on `Teleport`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BodyDirective {
    /// Bind the object's motion to the given hand
    Follow(Hand),
    /// Sever any follow relation
    Unfollow,
    /// Toggle the kinematic (non-physical) flag on the object's body
    SetKinematic(bool),
    /// Snap the object to a pose
    Teleport {
        position: Vector3<f32>,
        orientation: UnitQuaternion<f32>,
    },
    /// Hand velocity and spin to physics integration
    SetVelocity {
        linear: Vector3<f32>,
        angular: Vector3<f32>,
    },
}

/// Events surfaced to the host per tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InteractionEvent {
    /// Object attached to a single hand
    Grabbed(Hand),
    /// Object attached to both hands (directly or promoted from one)
    GrabbedTwoHanded,
    /// Throw released; an outcome watch is now pending
    Thrown(ThrowEvent),
    /// Released without a throw (intentional drop or hands separated)
    Dropped,
    /// Full goal sequence completed before the watch deadline
    Made { throw_id: u64 },
    /// Watch deadline elapsed without a completed sequence
    Missed { throw_id: u64 },
}
