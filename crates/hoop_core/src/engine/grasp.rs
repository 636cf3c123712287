//! Grasp State Machine
//!
//! Owns the attachment state of one manipulable object and decides
//! attach/promote/release/throw transitions from per-tick trigger booleans
//! and hand poses.
//!
//! ## State Flow
//! ```text
//! Unattached ──one trigger──▶ OneHand ──other trigger in range──▶ TwoHand
//!     ▲  ▲                      │                                   │
//!     │  └──────both triggers coordinated + hands close─────────────┤
//!     │                         │                                   │
//!     └──────throw / drop───────┴───────────────────────────────────┘
//! ```
//!
//! Naive two-hand detection on "both triggers currently down" creates false
//! positives when a user grabs with one hand while still releasing the other
//! from an unrelated motion. Both two-hand entry and two-hand release are
//! therefore bounded by a coordination window over the triggers' most recent
//! press/release times.

use nalgebra::Vector3;
use tracing::{debug, info};

use crate::config::{GraspConfig, ThrowConfig};
use crate::engine::types::{BodyDirective, FrameInput, Hand, InteractionEvent};
use crate::engine::velocity::VelocityEstimator;

/// Attachment state; exactly one instance exists per manipulable object
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GraspState {
    Unattached,
    OneHand { hand: Hand, attached_at_s: f32 },
    TwoHand { attached_at_s: f32 },
}

/// Most recent trigger edge times for one hand.
///
/// Sentinel `NEG_INFINITY` means "never", which naturally fails every
/// coordination-window comparison.
#[derive(Debug, Clone, Copy)]
struct TriggerEdges {
    pressed: bool,
    last_press_s: f32,
    last_release_s: f32,
}

impl Default for TriggerEdges {
    fn default() -> Self {
        Self {
            pressed: false,
            last_press_s: f32::NEG_INFINITY,
            last_release_s: f32::NEG_INFINITY,
        }
    }
}

impl TriggerEdges {
    fn track(&mut self, pressed: bool, now_s: f32) {
        if pressed && !self.pressed {
            self.last_press_s = now_s;
        } else if !pressed && self.pressed {
            self.last_release_s = now_s;
        }
        self.pressed = pressed;
    }
}

/// A throw decided by the state machine, before bias correction and spin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowRequest {
    /// Release position (object position at the deciding tick)
    pub position: Vector3<f32>,
    /// Hand-derived velocity, already scaled by the force multiplier
    pub velocity: Vector3<f32>,
    /// Interaction-clock time of the release
    pub time_s: f32,
}

/// Per-tick result of the state machine
#[derive(Debug, Clone, Default)]
pub struct GraspUpdate {
    pub directives: Vec<BodyDirective>,
    pub events: Vec<InteractionEvent>,
    /// Present on throw ticks only; the caller finishes the throw pipeline
    /// (bias correction, spin, outcome watch)
    pub throw: Option<ThrowRequest>,
}

/// Grasp state machine for a single object
#[derive(Debug, Clone)]
pub struct GraspStateMachine {
    grasp_cfg: GraspConfig,
    throw_cfg: ThrowConfig,
    state: GraspState,
    clock_s: f32,
    left: TriggerEdges,
    right: TriggerEdges,
    /// Single active hand estimate; stale across mode switches
    hand_velocity: VelocityEstimator,
    /// Two-hand midpoint estimate; stale across mode switches
    midpoint_velocity: VelocityEstimator,
    last_release_s: f32,
}

impl GraspStateMachine {
    pub fn new(grasp_cfg: GraspConfig, throw_cfg: ThrowConfig) -> Self {
        Self {
            grasp_cfg,
            throw_cfg,
            state: GraspState::Unattached,
            clock_s: 0.0,
            left: TriggerEdges::default(),
            right: TriggerEdges::default(),
            hand_velocity: VelocityEstimator::new(),
            midpoint_velocity: VelocityEstimator::new(),
            last_release_s: f32::NEG_INFINITY,
        }
    }

    pub fn state(&self) -> GraspState {
        self.state
    }

    pub fn is_held(&self) -> bool {
        !matches!(self.state, GraspState::Unattached)
    }

    /// Interaction-clock time, accumulated from tick durations
    pub fn clock_s(&self) -> f32 {
        self.clock_s
    }

    /// Advance one simulation tick
    pub fn update(&mut self, input: &FrameInput) -> GraspUpdate {
        self.clock_s += input.dt.max(0.0);
        self.left.track(input.left.trigger_pressed, self.clock_s);
        self.right.track(input.right.trigger_pressed, self.clock_s);

        let mut out = GraspUpdate::default();
        match self.state {
            GraspState::Unattached => self.update_unattached(input, &mut out),
            GraspState::OneHand { hand, .. } => self.update_one_hand(hand, input, &mut out),
            GraspState::TwoHand { .. } => self.update_two_hand(input, &mut out),
        }
        out
    }

    fn update_unattached(&mut self, input: &FrameInput, out: &mut GraspUpdate) {
        // Release grace period gates any re-grasp after a release
        if self.clock_s - self.last_release_s < self.grasp_cfg.release_grace_period_s {
            return;
        }

        let left = input.left.trigger_pressed;
        let right = input.right.trigger_pressed;

        if left && right {
            let press_gap = (self.left.last_press_s - self.right.last_press_s).abs();
            let separation = input.left.pose.distance_to(&input.right.pose);
            if press_gap <= self.grasp_cfg.coordination_window_s
                && separation <= self.grasp_cfg.two_hand_attach_distance_m
            {
                self.attach_two_hands(input, out);
            }
            // Uncoordinated overlap: coincidental, not a grasp
        } else if left {
            self.attach_one_hand(Hand::Left, input, out);
        } else if right {
            self.attach_one_hand(Hand::Right, input, out);
        }
    }

    fn attach_one_hand(&mut self, hand: Hand, input: &FrameInput, out: &mut GraspUpdate) {
        let pose = input.hand(hand).pose;
        self.state = GraspState::OneHand {
            hand,
            attached_at_s: self.clock_s,
        };
        self.hand_velocity.reset();
        self.hand_velocity.sample(pose.position, input.dt);

        info!(?hand, t = self.clock_s, "ball attached to hand");
        out.directives.extend([
            BodyDirective::SetKinematic(true),
            BodyDirective::SetVelocity {
                linear: Vector3::zeros(),
                angular: Vector3::zeros(),
            },
            BodyDirective::Teleport {
                position: pose.position,
                orientation: pose.orientation,
            },
            BodyDirective::Follow(hand),
        ]);
        out.events.push(InteractionEvent::Grabbed(hand));
    }

    fn attach_two_hands(&mut self, input: &FrameInput, out: &mut GraspUpdate) {
        let midpoint = input.left.pose.midpoint_with(&input.right.pose);
        self.state = GraspState::TwoHand {
            attached_at_s: self.clock_s,
        };
        self.midpoint_velocity.reset();
        self.midpoint_velocity.sample(midpoint, input.dt);

        info!(t = self.clock_s, "ball attached to both hands");
        out.directives.extend([
            BodyDirective::Unfollow,
            BodyDirective::SetKinematic(true),
            BodyDirective::SetVelocity {
                linear: Vector3::zeros(),
                angular: Vector3::zeros(),
            },
            BodyDirective::Teleport {
                position: midpoint,
                orientation: input.left.pose.blended_orientation_with(&input.right.pose),
            },
        ]);
        out.events.push(InteractionEvent::GrabbedTwoHanded);
    }

    fn update_one_hand(&mut self, hand: Hand, input: &FrameInput, out: &mut GraspUpdate) {
        let pose = input.hand(hand).pose;
        let other = input.hand(hand.other());

        // Promotion takes precedence over release
        if other.trigger_pressed
            && input.left.pose.distance_to(&input.right.pose)
                <= self.grasp_cfg.two_hand_attach_distance_m
        {
            self.hand_velocity.reset();
            self.attach_two_hands(input, out);
            return;
        }

        let estimate = self.hand_velocity.sample(pose.position, input.dt);

        if !input.hand(hand).trigger_pressed {
            self.begin_throw(pose.position, estimate, out);
            return;
        }

        // Held hand moving fast enough counts as a throw on its own
        if estimate.norm() > self.throw_cfg.release_force_threshold {
            self.begin_throw(pose.position, estimate, out);
            return;
        }

        out.directives.push(BodyDirective::Teleport {
            position: pose.position,
            orientation: pose.orientation,
        });
    }

    fn update_two_hand(&mut self, input: &FrameInput, out: &mut GraspUpdate) {
        let separation = input.left.pose.distance_to(&input.right.pose);
        let midpoint = input.left.pose.midpoint_with(&input.right.pose);

        if separation > self.grasp_cfg.two_hand_attach_distance_m {
            debug!(separation, "hands separated beyond grasp distance");
            self.release_without_throw(out);
            return;
        }

        let estimate = self.midpoint_velocity.sample(midpoint, input.dt);

        match (self.left.pressed, self.right.pressed) {
            (false, false) => {
                // Both up: throw only if the releases were coordinated
                let release_gap = (self.left.last_release_s - self.right.last_release_s).abs();
                if release_gap <= self.grasp_cfg.coordination_window_s {
                    self.begin_throw(midpoint, estimate, out);
                } else {
                    self.release_without_throw(out);
                }
                return;
            }
            (true, false) | (false, true) => {
                // One up: wait out the coordination window for the other.
                // A sequential release (window elapsed, other still held) is
                // an intentional drop, not a throw.
                let first_release_s = self.left.last_release_s.max(self.right.last_release_s);
                if self.clock_s - first_release_s > self.grasp_cfg.coordination_window_s {
                    self.release_without_throw(out);
                    return;
                }
            }
            (true, true) => {}
        }

        // Velocity spike throws the ball even with both triggers still down
        if estimate.norm() > self.throw_cfg.release_force_threshold {
            self.begin_throw(midpoint, estimate, out);
            return;
        }

        out.directives.push(BodyDirective::Teleport {
            position: midpoint,
            orientation: input.left.pose.blended_orientation_with(&input.right.pose),
        });
    }

    fn begin_throw(&mut self, position: Vector3<f32>, estimate: Vector3<f32>, out: &mut GraspUpdate) {
        let velocity = estimate * self.throw_cfg.force_multiplier;
        info!(speed = velocity.norm(), t = self.clock_s, "ball thrown");

        self.detach();
        out.directives.extend([
            BodyDirective::Unfollow,
            BodyDirective::SetKinematic(false),
        ]);
        out.throw = Some(ThrowRequest {
            position,
            velocity,
            time_s: self.clock_s,
        });
    }

    fn release_without_throw(&mut self, out: &mut GraspUpdate) {
        info!(t = self.clock_s, "ball dropped");

        self.detach();
        out.directives.extend([
            BodyDirective::Unfollow,
            BodyDirective::SetKinematic(false),
            BodyDirective::SetVelocity {
                linear: Vector3::zeros(),
                angular: Vector3::zeros(),
            },
        ]);
        out.events.push(InteractionEvent::Dropped);
    }

    fn detach(&mut self) {
        self.state = GraspState::Unattached;
        self.last_release_s = self.clock_s;
        self.hand_velocity.reset();
        self.midpoint_velocity.reset();
    }
}
