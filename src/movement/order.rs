/// Orders: the units of work in an agent's queue
///
/// Three closed variants share one contract: `advance` moves the agent a
/// single tick, `cancel` drops the order early, and the completion flag only
/// ever goes from false to true. Orders never hold their agent; the agent
/// lends its [`Motion`] to the head order for the duration of a tick.

use glam::DVec3;
use hecs::Entity;
use serde::{Deserialize, Serialize};

use super::agent::Motion;
use super::feedback::{Feedback, FeedbackSlot};
use super::steering::{look_rotation, move_towards, rotate_towards, vector_angle_degrees};
use super::target::{OrderTarget, TargetLookup};
use crate::error::{FleetError, FleetResult};

/// Squared distance under which an agent counts as arrived
pub const ARRIVAL_EPSILON_SQ: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderKind {
    Position,
    Directional,
    Follow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    Pending,
    Active,
    Completed,
}

/// Outcome of one `advance` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Progressed,
    /// The followed entity is gone; the queue must cancel this order
    TargetLost,
}

/// What the selection layer asks for; turned into an [`Order`] by [`Order::from_request`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrderRequest {
    Position { target: DVec3 },
    Directional { target: DVec3, facing: DVec3 },
    Follow { target: OrderTarget },
}

impl OrderRequest {
    pub fn kind(&self) -> OrderKind {
        match self {
            OrderRequest::Position { .. } => OrderKind::Position,
            OrderRequest::Directional { .. } => OrderKind::Directional,
            OrderRequest::Follow { .. } => OrderKind::Follow,
        }
    }
}

fn arrived(position: DVec3, target: DVec3) -> bool {
    position.distance_squared(target) < ARRIVAL_EPSILON_SQ
}

/// Move to a point at the agent's nominal speed
#[derive(Debug)]
pub struct PositionOrder {
    pub target: DVec3,
    state: OrderState,
    feedback: FeedbackSlot,
}

impl PositionOrder {
    pub fn new(target: DVec3, feedback: Option<Box<dyn Feedback>>) -> Self {
        Self {
            target,
            state: OrderState::Pending,
            feedback: FeedbackSlot::new(feedback),
        }
    }

    fn advance(&mut self, dt: f64, motion: &mut Motion) {
        self.state = OrderState::Active;
        motion.position = move_towards(motion.position, self.target, motion.linear_speed * dt);

        if arrived(motion.position, self.target) {
            self.feedback.release();
            self.state = OrderState::Completed;
        }
    }
}

/// Speeds rescaled so translation and rotation finish together
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncedSpeeds {
    /// Units per second
    pub linear: f64,
    /// Degrees per second
    pub angular: f64,
}

impl SyncedSpeeds {
    /// Rescale `motion`'s nominal speeds for a move to `target` facing `facing`.
    ///
    /// The slower leg keeps its nominal speed and the faster one is slowed
    /// down to match it. With nothing to do on either leg the nominal speeds
    /// are returned unchanged.
    pub fn compute(motion: &Motion, target: DVec3, facing: DVec3) -> Self {
        let distance = motion.position.distance(target);
        let time_to_move = distance / motion.linear_speed;

        let angle_to_rotate = vector_angle_degrees(motion.forward(), facing);
        let time_to_rotate = angle_to_rotate / motion.angular_speed;

        let longest_time = time_to_move.max(time_to_rotate);
        if longest_time <= 0.0 || !longest_time.is_finite() {
            return Self {
                linear: motion.linear_speed,
                angular: motion.angular_speed,
            };
        }

        Self {
            linear: distance / longest_time,
            angular: angle_to_rotate / longest_time,
        }
    }
}

/// Move to a point and end up facing a direction, both legs finishing together
///
/// The first `advance` only computes the synchronized speeds; motion starts on
/// the second one. That one-tick pause is intentional and observable.
#[derive(Debug)]
pub struct DirectionalPositionOrder {
    pub target: DVec3,
    pub facing: DVec3,
    speeds: Option<SyncedSpeeds>,
    state: OrderState,
    feedback: FeedbackSlot,
}

impl DirectionalPositionOrder {
    pub fn new(target: DVec3, facing: DVec3, feedback: Option<Box<dyn Feedback>>) -> Self {
        Self {
            target,
            facing,
            speeds: None,
            state: OrderState::Pending,
            feedback: FeedbackSlot::new(feedback),
        }
    }

    /// Synchronized speeds, available after the first `advance`
    pub fn synced_speeds(&self) -> Option<SyncedSpeeds> {
        self.speeds
    }

    fn advance(&mut self, dt: f64, motion: &mut Motion) {
        let Some(speeds) = self.speeds else {
            let speeds = SyncedSpeeds::compute(motion, self.target, self.facing);
            log::trace!(
                "Directional order synchronized: linear {:.4}/s, angular {:.4} deg/s",
                speeds.linear,
                speeds.angular
            );
            self.speeds = Some(speeds);
            self.state = OrderState::Active;
            return;
        };

        motion.position = move_towards(motion.position, self.target, speeds.linear * dt);

        if let Some(goal) = look_rotation(self.facing, motion.up(), motion.rotation) {
            motion.rotation = rotate_towards(motion.rotation, goal, speeds.angular * dt);
        }

        // Rotation is paced to finish no later than the move, so position decides
        if arrived(motion.position, self.target) {
            self.feedback.release();
            self.state = OrderState::Completed;
        }
    }
}

/// Hold a fixed offset from a target for as long as the target exists
///
/// Never completes on its own; it ends when replaced, or when its target
/// disappears.
#[derive(Debug)]
pub struct FollowOrder {
    pub target: OrderTarget,
    /// Owner position minus target position, captured at creation
    pub offset: DVec3,
    state: OrderState,
    feedback: FeedbackSlot,
}

impl FollowOrder {
    pub fn new(
        owner_position: DVec3,
        target: OrderTarget,
        target_position: DVec3,
        feedback: Option<Box<dyn Feedback>>,
    ) -> Self {
        Self {
            target,
            offset: owner_position - target_position,
            state: OrderState::Pending,
            feedback: FeedbackSlot::new(feedback),
        }
    }

    fn advance(&mut self, motion: &mut Motion, targets: &dyn TargetLookup) -> Step {
        let Some(target_position) = self.target.resolve(targets) else {
            return Step::TargetLost;
        };

        self.state = OrderState::Active;
        self.feedback.track(motion.position, target_position);
        motion.position = target_position + self.offset;
        Step::Progressed
    }
}

#[derive(Debug)]
pub enum Order {
    Position(PositionOrder),
    Directional(DirectionalPositionOrder),
    Follow(FollowOrder),
}

impl Order {
    pub fn position(target: DVec3, feedback: Option<Box<dyn Feedback>>) -> Self {
        Order::Position(PositionOrder::new(target, feedback))
    }

    pub fn directional(target: DVec3, facing: DVec3, feedback: Option<Box<dyn Feedback>>) -> Self {
        Order::Directional(DirectionalPositionOrder::new(target, facing, feedback))
    }

    pub fn follow(
        owner_position: DVec3,
        target: OrderTarget,
        target_position: DVec3,
        feedback: Option<Box<dyn Feedback>>,
    ) -> Self {
        Order::Follow(FollowOrder::new(owner_position, target, target_position, feedback))
    }

    /// Build an order for the agent currently described by `owner`
    ///
    /// Follow orders capture their offset here, so the target has to resolve
    /// now. A rejected request still releases `feedback`.
    pub fn from_request(
        request: OrderRequest,
        owner: &Motion,
        feedback: Option<Box<dyn Feedback>>,
        targets: &dyn TargetLookup,
    ) -> FleetResult<Self> {
        match request {
            OrderRequest::Position { target } => Ok(Self::position(target, feedback)),
            OrderRequest::Directional { target, facing } => {
                Ok(Self::directional(target, facing, feedback))
            }
            OrderRequest::Follow { target } => {
                let Some(target_position) = target.resolve(targets) else {
                    FeedbackSlot::new(feedback).release();
                    let id = target.entity().map(entity_id).unwrap_or_default();
                    return Err(FleetError::UnknownTarget { id });
                };
                Ok(Self::follow(owner.position, target, target_position, feedback))
            }
        }
    }

    pub fn kind(&self) -> OrderKind {
        match self {
            Order::Position(_) => OrderKind::Position,
            Order::Directional(_) => OrderKind::Directional,
            Order::Follow(_) => OrderKind::Follow,
        }
    }

    pub fn state(&self) -> OrderState {
        match self {
            Order::Position(order) => order.state,
            Order::Directional(order) => order.state,
            Order::Follow(order) => order.state,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state() == OrderState::Completed
    }

    /// Entity this order keeps track of, if any
    pub fn tracked_entity(&self) -> Option<Entity> {
        match self {
            Order::Follow(order) => order.target.entity(),
            _ => None,
        }
    }

    /// Run one tick of this order against the owner's motion
    ///
    /// # Panics
    ///
    /// If the order has already completed; the queue retires completed orders
    /// before they can be advanced again.
    pub fn advance(&mut self, dt: f64, motion: &mut Motion, targets: &dyn TargetLookup) -> Step {
        assert!(
            !self.is_completed(),
            "advance called on a completed {:?} order",
            self.kind()
        );

        match self {
            Order::Position(order) => {
                order.advance(dt, motion);
                Step::Progressed
            }
            Order::Directional(order) => {
                order.advance(dt, motion);
                Step::Progressed
            }
            Order::Follow(order) => order.advance(motion, targets),
        }
    }

    /// Drop the order without completing it; releases feedback once
    pub fn cancel(&mut self) {
        match self {
            Order::Position(order) => order.feedback.release(),
            Order::Directional(order) => order.feedback.release(),
            Order::Follow(order) => order.feedback.release(),
        }
    }
}

/// Stable numeric id of an entity, as used in logs and events
pub fn entity_id(entity: Entity) -> u64 {
    entity.to_bits().get()
}
